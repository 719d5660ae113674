//! Grievance lifecycle: storage, state machine and dashboard counts.

pub mod dashboard;
pub mod machine;
pub mod store;

pub use dashboard::{DashboardAggregator, DashboardStats};
pub use machine::GrievanceStateMachine;
pub use store::{GrievanceFilter, GrievanceStore, GrievanceView, NewGrievance};
