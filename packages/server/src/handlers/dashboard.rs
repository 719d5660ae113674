use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthOfficer;
use crate::models::dashboard::DashboardStatsResponse;
use crate::state::AppState;

/// Dashboard counters, recomputed on every call.
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Dashboard",
    operation_id = "getDashboardStats",
    summary = "Get dashboard statistics",
    description = "`pending_available` covers all unclaimed grievances; the other counters, \
        `total` included, only count grievances handled by the caller.",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStatsResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(officer_id = auth.officer_id))]
pub async fn dashboard_stats(
    auth: AuthOfficer,
    State(state): State<AppState>,
) -> Result<Json<DashboardStatsResponse>, AppError> {
    state.officers().require(auth.officer_id).await?;
    let stats = state.dashboard().stats(auth.officer_id).await?;
    Ok(Json(stats.into()))
}
