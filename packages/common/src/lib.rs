//! Domain vocabulary shared by the grievance service and its clients.

pub mod grievance_status;
pub mod retry;
pub mod storage;

pub use grievance_status::{GrievanceStatus, ParseStatusError};
pub use retry::{RetryPolicy, calculate_backoff, retry_transient};
