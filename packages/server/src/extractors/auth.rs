use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Authenticated officer session extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. Handlers pass it explicitly to
/// the services; nothing in the core keeps ambient session state.
#[derive(Debug, Clone)]
pub struct AuthOfficer {
    pub officer_id: i32,
    pub mobile: String,
}

impl FromRequestParts<AppState> for AuthOfficer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let claims = jwt::verify(token.trim(), &state.config.auth.jwt_secret).map_err(|e| {
            tracing::debug!("Rejected bearer token: {}", e);
            AppError::TokenInvalid
        })?;

        Ok(AuthOfficer {
            officer_id: claims.uid,
            mobile: claims.sub,
        })
    }
}
