use sea_orm::ConnectionTrait;

use super::directory::{
    OfficerDirectory, ProfileChanges, validate_email, validate_name, validate_password,
};
use crate::entity::officer;
use crate::store::ServiceError;
use crate::utils::hash;
use common::storage::{BlobStore, ContentHash};

/// Route prefix under which stored photos are served.
pub const PHOTO_ROUTE_PREFIX: &str = "/api/v1/photos";

const ALLOWED_PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/png", "png"),
    ("image/jpeg", "jpg"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// An uploaded photo whose type has been recognised from its file name.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub extension: &'static str,
}

impl PhotoUpload {
    pub fn new(file_name: Option<&str>, bytes: Vec<u8>) -> Result<Self, ServiceError> {
        if bytes.is_empty() {
            return Err(ServiceError::Validation("Profile photo is empty".into()));
        }

        let mime = file_name
            .and_then(|name| mime_guess::from_path(name).first())
            .ok_or_else(|| {
                ServiceError::Validation("Profile photo needs a file name with an extension".into())
            })?;

        let extension = ALLOWED_PHOTO_TYPES
            .iter()
            .find(|(allowed, _)| *allowed == mime.essence_str())
            .map(|(_, ext)| *ext)
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "Unsupported photo type {mime}; use PNG, JPEG, GIF or WebP"
                ))
            })?;

        Ok(Self { bytes, extension })
    }
}

/// Requested profile changes, as received. Blank text fields count as not supplied.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub photo: Option<PhotoUpload>,
}

/// Applies partial profile updates, re-hashing passwords and storing photos.
pub struct ProfileUpdater<'a, C: ConnectionTrait> {
    directory: OfficerDirectory<'a, C>,
    photos: &'a dyn BlobStore,
}

impl<'a, C: ConnectionTrait> ProfileUpdater<'a, C> {
    pub fn new(directory: OfficerDirectory<'a, C>, photos: &'a dyn BlobStore) -> Self {
        Self { directory, photos }
    }

    pub async fn update_profile(
        &self,
        officer_id: i32,
        update: ProfileUpdate,
    ) -> Result<officer::Model, ServiceError> {
        let mut changes = ProfileChanges::default();

        if let Some(name) = supplied(update.name) {
            changes.name = Some(validate_name(&name)?);
        }
        if let Some(email) = supplied(update.email) {
            changes.email = Some(validate_email(&email)?);
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            validate_password(&password)?;
            let rehashed = hash::hash_password(&password)
                .map_err(|e| ServiceError::Validation(format!("Unusable password: {e}")))?;
            changes.password_hash = Some(rehashed);
        }

        // Validate the officer before writing a blob on their behalf.
        self.directory.require(officer_id).await?;

        if let Some(photo) = update.photo {
            let hash = self.photos.put(&photo.bytes).await?;
            changes.profile_photo = Some(photo_uri(&hash, photo.extension));
        }

        let updated = self.directory.update(officer_id, changes).await?;
        tracing::info!(officer_id, "Officer profile updated");
        Ok(updated)
    }
}

pub fn photo_uri(hash: &ContentHash, extension: &str) -> String {
    format!("{PHOTO_ROUTE_PREFIX}/{hash}.{extension}")
}

fn supplied(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}
