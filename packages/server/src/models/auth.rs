use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for officer login.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    /// Registered mobile number.
    #[schema(example = "9876543210")]
    pub mobile: String,
    /// Account password.
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.mobile.trim().is_empty() {
        return Err(AppError::Validation("Mobile number must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Full profile of an officer. The password hash is never included.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OfficerProfile {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "9876543210")]
    pub mobile: String,
    #[schema(example = "asha.verma@example.edu")]
    pub email: String,
    #[schema(example = "Warden")]
    pub designation: String,
    #[schema(example = "Hostel Administration")]
    pub department: String,
    /// URI of the profile photo, if one has been uploaded.
    #[schema(example = "/api/v1/photos/9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08.png")]
    pub profile_photo: Option<String>,
}

impl From<crate::entity::officer::Model> for OfficerProfile {
    fn from(officer: crate::entity::officer::Model) -> Self {
        Self {
            id: officer.id,
            name: officer.name,
            mobile: officer.mobile,
            email: officer.email,
            designation: officer.designation,
            department: officer.department,
            profile_photo: officer.profile_photo,
        }
    }
}

/// Successful login response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Bearer token to send as `Authorization: Bearer <token>`.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    pub officer: OfficerProfile,
}

impl From<crate::officer::Session> for LoginResponse {
    fn from(session: crate::officer::Session) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
            officer: session.officer.into(),
        }
    }
}
