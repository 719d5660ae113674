pub mod grievance;
pub mod officer;
