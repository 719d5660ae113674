//! Shared failure taxonomy and call discipline for every store-backed service.
//!
//! Each store round trip runs under a deadline. Failures to reach the database are retried
//! with bounded backoff; everything else surfaces to the caller unchanged.

use std::future::Future;
use std::time::Duration;

use common::{RetryPolicy, retry_transient};
use sea_orm::DbErr;

use crate::config::AppConfig;

/// Typed outcome of a failed service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error("{0}")]
    NotFound(String),
    /// A race was lost or a uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    /// The operation is not legal for the record's current status.
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Validation(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store call exceeded {0:?}")]
    Timeout(Duration),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("photo storage error: {0}")]
    Storage(#[from] common::storage::StorageError),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::ConnectionAcquire(e) => ServiceError::Unavailable(e.to_string()),
            DbErr::Conn(e) => ServiceError::Unavailable(e.to_string()),
            other => ServiceError::Database(other),
        }
    }
}

impl ServiceError {
    fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_))
    }
}

/// Deadline and retry budget applied to store calls.
#[derive(Debug, Clone, Copy)]
pub struct StorePolicy {
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl StorePolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout: config.store_timeout(),
            retry: RetryPolicy {
                max_retries: config.database.max_retries,
                base_ms: config.database.retry_base_ms,
                max_ms: config.database.retry_max_ms,
            },
        }
    }

    /// Await one store call under the deadline.
    pub async fn bounded<T, F>(&self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout(self.timeout)),
        }
    }

    /// Like [`StorePolicy::bounded`], retrying while the store is unreachable.
    pub async fn with_retry<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, ServiceError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        retry_transient(self.retry, label, ServiceError::is_transient, || {
            self.bounded(op())
        })
        .await
    }
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::default(),
        }
    }
}
