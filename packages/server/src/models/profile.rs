/// Multipart form accepted by the profile update endpoint. Documentation only; the handler
/// reads the fields directly.
#[allow(dead_code)]
#[derive(utoipa::ToSchema)]
pub struct UpdateProfileForm {
    pub name: Option<String>,
    pub email: Option<String>,
    /// New password (8-128 characters); re-hashed before storage.
    pub password: Option<String>,
    /// PNG, JPEG, GIF or WebP image.
    #[schema(value_type = Option<String>, format = Binary)]
    pub profile_photo: Option<Vec<u8>>,
}
