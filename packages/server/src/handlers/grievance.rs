use axum::{
    Json,
    extract::{Path, Query, State},
};
use common::GrievanceStatus;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthOfficer;
use crate::extractors::json::AppJson;
use crate::models::grievance::{GrievanceResponse, ListGrievancesParams, ResolveRequest};
use crate::state::AppState;

fn parse_status(raw: &str) -> Result<GrievanceStatus, AppError> {
    raw.parse::<GrievanceStatus>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// List grievances in creation order.
#[utoipa::path(
    get,
    path = "",
    tag = "Grievances",
    operation_id = "listGrievances",
    summary = "List grievances",
    description = "Returns every grievance in creation order. All officers see the full queue \
        unless `mine=true` is given.",
    params(ListGrievancesParams),
    responses(
        (status = 200, description = "Grievances", body = Vec<GrievanceResponse>),
        (status = 400, description = "Unknown status filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(officer_id = auth.officer_id))]
pub async fn list_grievances(
    auth: AuthOfficer,
    State(state): State<AppState>,
    Query(params): Query<ListGrievancesParams>,
) -> Result<Json<Vec<GrievanceResponse>>, AppError> {
    let status = params.status.as_deref().map(parse_status).transpose()?;

    let views = state
        .grievances()
        .list(auth.officer_id, status, params.mine.unwrap_or(false))
        .await?;

    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// Get a single grievance.
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Grievances",
    operation_id = "getGrievance",
    summary = "Get grievance",
    params(("id" = i32, Path, description = "Grievance ID")),
    responses(
        (status = 200, description = "Grievance", body = GrievanceResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Grievance not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(officer_id = auth.officer_id))]
pub async fn get_grievance(
    auth: AuthOfficer,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GrievanceResponse>, AppError> {
    let view = state.grievances().get(auth.officer_id, id).await?;
    Ok(Json(view.into()))
}

/// Claim a pending grievance.
#[utoipa::path(
    patch,
    path = "/{id}/claim",
    tag = "Grievances",
    operation_id = "claimGrievance",
    summary = "Claim grievance",
    description = "Moves a `Pending` grievance to `InProgress` and records the caller as its \
        handler. When several officers claim at once exactly one succeeds; the others receive \
        `CONFLICT` and should refresh rather than retry.",
    params(("id" = i32, Path, description = "Grievance ID")),
    responses(
        (status = 200, description = "Claimed", body = GrievanceResponse),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 404, description = "Grievance not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "No longer pending (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(officer_id = auth.officer_id))]
pub async fn claim_grievance(
    auth: AuthOfficer,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GrievanceResponse>, AppError> {
    let view = state.grievances().claim(auth.officer_id, id).await?;
    Ok(Json(view.into()))
}

/// Resolve or reject a grievance the caller is handling.
#[utoipa::path(
    patch,
    path = "/{id}/resolve",
    tag = "Grievances",
    operation_id = "resolveGrievance",
    summary = "Resolve grievance",
    description = "Closes an `InProgress` grievance handled by the caller as `Resolved` or \
        `Rejected`, recording remarks and the resolution time.",
    params(("id" = i32, Path, description = "Grievance ID")),
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Closed", body = GrievanceResponse),
        (status = 400, description = "Blank remarks or bad status (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
        (status = 403, description = "Handled by another officer (FORBIDDEN)", body = ErrorBody),
        (status = 404, description = "Grievance not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not in progress (INVALID_STATE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, payload), fields(officer_id = auth.officer_id, status = %payload.status))]
pub async fn resolve_grievance(
    auth: AuthOfficer,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<ResolveRequest>,
) -> Result<Json<GrievanceResponse>, AppError> {
    let outcome = parse_status(&payload.status)?;

    let view = state
        .grievances()
        .resolve(auth.officer_id, id, outcome, &payload.remarks)
        .await?;

    Ok(Json(view.into()))
}
