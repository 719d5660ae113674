use common::GrievanceStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student-submitted issue tracked through claim and resolution.
///
/// `handled_by` is set iff `status` is not `Pending`; `remarks` and `resolved_at` are set iff
/// `status` is terminal. Only conditional updates in `grievance::store` move these columns.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grievance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Submitting student, owned by the student registry.
    pub student_ref: String,

    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub attachment: Option<String>,

    #[sea_orm(indexed)]
    pub status: GrievanceStatus,

    #[sea_orm(indexed)]
    pub handled_by: Option<i32>,
    #[sea_orm(belongs_to, from = "handled_by", to = "id")]
    pub handler: HasOne<super::officer::Entity>,

    #[sea_orm(column_type = "Text", nullable)]
    pub remarks: Option<String>,

    pub created_at: DateTimeUtc,
    pub deadline: DateTimeUtc,
    pub resolved_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Check the field/status coupling described on the type.
    pub fn check_invariants(&self) -> Result<(), String> {
        let needs_handler = self.status.requires_handler();
        if needs_handler != self.handled_by.is_some() {
            return Err(format!(
                "grievance {} is {} but handled_by is {:?}",
                self.id, self.status, self.handled_by
            ));
        }

        let terminal = self.status.is_terminal();
        if terminal != self.remarks.is_some() || terminal != self.resolved_at.is_some() {
            return Err(format!(
                "grievance {} is {} but remarks/resolved_at presence is {}/{}",
                self.id,
                self.status,
                self.remarks.is_some(),
                self.resolved_at.is_some()
            ));
        }

        Ok(())
    }
}
