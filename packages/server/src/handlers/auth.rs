use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthOfficer;
use crate::extractors::json::AppJson;
use crate::models::auth::{LoginRequest, LoginResponse, OfficerProfile, validate_login_request};
use crate::state::AppState;
use crate::store::ServiceError;

/// Exchange mobile number and password for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    operation_id = "login",
    summary = "Log in",
    description = "Verifies the officer's credentials and returns a bearer token with its expiry. \
        There is no logout endpoint; a token stays valid until it expires.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong mobile or password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(mobile = %payload.mobile))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_login_request(&payload)?;

    let session = state
        .sessions()
        .login(&payload.mobile, &payload.password)
        .await
        .map_err(|e| match e {
            ServiceError::Unauthenticated => AppError::InvalidCredentials,
            other => other.into(),
        })?;

    Ok(Json(session.into()))
}

/// Return the authenticated officer's profile.
#[utoipa::path(
    get,
    path = "/me",
    tag = "Auth",
    operation_id = "getCurrentOfficer",
    summary = "Get current officer",
    responses(
        (status = 200, description = "Current officer", body = OfficerProfile),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth), fields(officer_id = auth.officer_id))]
pub async fn me(
    auth: AuthOfficer,
    State(state): State<AppState>,
) -> Result<Json<OfficerProfile>, AppError> {
    let officer = state.officers().require(auth.officer_id).await?;
    Ok(Json(officer.into()))
}
