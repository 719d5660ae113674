use common::GrievanceStatus;
use sea_orm::ConnectionTrait;

use super::store::GrievanceStore;
use crate::store::ServiceError;

/// Counts shown on an officer's dashboard.
///
/// `pending_available` is global; every other counter, `total` included, only covers grievances
/// handled by the requesting officer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: u64,
    pub pending_available: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub rejected: u64,
}

impl DashboardStats {
    pub fn tally<I>(rows: I, officer_id: i32) -> Self
    where
        I: IntoIterator<Item = (GrievanceStatus, Option<i32>)>,
    {
        rows.into_iter()
            .fold(Self::default(), |mut stats, (status, handled_by)| {
                let mine = handled_by == Some(officer_id);
                if mine {
                    stats.total += 1;
                }
                match status {
                    GrievanceStatus::Pending if handled_by.is_none() => {
                        stats.pending_available += 1
                    }
                    GrievanceStatus::InProgress if mine => stats.in_progress += 1,
                    GrievanceStatus::Resolved if mine => stats.resolved += 1,
                    GrievanceStatus::Rejected if mine => stats.rejected += 1,
                    _ => {}
                }
                stats
            })
    }
}

/// Recomputes dashboard counts from the store on every call.
pub struct DashboardAggregator<'a, C: ConnectionTrait> {
    store: GrievanceStore<'a, C>,
}

impl<'a, C: ConnectionTrait> DashboardAggregator<'a, C> {
    pub fn new(store: GrievanceStore<'a, C>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, officer_id: i32) -> Result<DashboardStats, ServiceError> {
        let rows = self.store.status_snapshot().await?;
        Ok(DashboardStats::tally(rows, officer_id))
    }
}
