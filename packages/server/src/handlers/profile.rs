use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use common::storage::ContentHash;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthOfficer;
use crate::models::auth::OfficerProfile;
use crate::models::profile::UpdateProfileForm;
use crate::officer::{PhotoUpload, ProfileUpdate};
use crate::state::AppState;
use crate::store::ServiceError;

/// Room for the text fields and multipart framing on top of the photo itself.
const FORM_OVERHEAD: usize = 64 * 1024;

pub fn profile_body_limit(max_photo_size: u64) -> DefaultBodyLimit {
    let photo = usize::try_from(max_photo_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(photo.saturating_add(FORM_OVERHEAD))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Update the caller's profile. Only supplied, non-empty fields change.
#[utoipa::path(
    patch,
    path = "/me",
    tag = "Officers",
    operation_id = "updateProfile",
    summary = "Update own profile",
    description = "Partial update of name, email, password and profile photo. Empty fields are \
        ignored. A new password is re-hashed; a photo is stored by content hash and its URI \
        returned in `profile_photo`.",
    request_body(content = UpdateProfileForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated profile", body = OfficerProfile),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthenticated (UNAUTHENTICATED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth, multipart), fields(officer_id = auth.officer_id))]
pub async fn update_profile(
    auth: AuthOfficer,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<OfficerProfile>, AppError> {
    let mut update = ProfileUpdate::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("name") => update.name = Some(read_text(field).await?),
            Some("email") => update.email = Some(read_text(field).await?),
            Some("password") => update.password = Some(read_text(field).await?),
            Some("profile_photo") => {
                let file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;
                // An empty file input is the same as not choosing a photo.
                if !bytes.is_empty() {
                    update.photo = Some(PhotoUpload::new(file_name.as_deref(), bytes.to_vec())?);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let officer = state
        .profiles()
        .update_profile(auth.officer_id, update)
        .await?;

    Ok(Json(officer.into()))
}

/// Serve a stored profile photo by `{hash}.{ext}`.
#[utoipa::path(
    get,
    path = "/{file}",
    tag = "Officers",
    operation_id = "getProfilePhoto",
    summary = "Get profile photo",
    params(("file" = String, Path, description = "Photo file name: SHA-256 hex plus extension")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn serve_photo(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound("Photo not found".into());

    let (stem, _) = file.split_once('.').ok_or_else(not_found)?;
    let hash = ContentHash::from_hex(stem).map_err(|_| not_found())?;
    let mime = mime_guess::from_path(&file)
        .first()
        .filter(|m| m.type_() == mime_guess::mime::IMAGE)
        .ok_or_else(not_found)?;

    let content = state.photos.get(&hash).await.map_err(ServiceError::from)?;

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(Body::from(content))
        .map_err(|e| AppError::Internal(e.to_string()))
}
