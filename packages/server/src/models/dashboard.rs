use serde::Serialize;

use crate::grievance::DashboardStats;

/// Dashboard counters for the calling officer.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DashboardStatsResponse {
    /// Grievances the caller has handled, in any status.
    #[schema(example = 45)]
    pub total: u64,
    /// Unclaimed grievances any officer may claim.
    #[schema(example = 14)]
    pub pending_available: u64,
    /// Grievances the caller has claimed and not yet closed.
    #[schema(example = 3)]
    pub in_progress: u64,
    /// Grievances the caller resolved.
    #[schema(example = 40)]
    pub resolved: u64,
    /// Grievances the caller rejected.
    #[schema(example = 2)]
    pub rejected: u64,
}

impl From<DashboardStats> for DashboardStatsResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total: stats.total,
            pending_available: stats.pending_available,
            in_progress: stats.in_progress,
            resolved: stats.resolved,
            rejected: stats.rejected,
        }
    }
}
