use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff account that claims and resolves grievances.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "officer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Login identifier.
    #[sea_orm(unique)]
    pub mobile: String,

    /// Argon2id PHC string, never the plaintext.
    #[serde(skip_serializing)]
    pub password: String,

    pub email: String,
    pub designation: String,
    pub department: String,

    /// Public URI of the current profile photo.
    pub profile_photo: Option<String>,

    #[sea_orm(has_many)]
    pub grievances: HasMany<super::grievance::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
