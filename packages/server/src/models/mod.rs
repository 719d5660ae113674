pub mod auth;
pub mod dashboard;
pub mod grievance;
pub mod profile;
