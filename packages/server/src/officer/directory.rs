use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr, Value,
};

use crate::entity::officer;
use crate::grievance::GrievanceStore;
use crate::store::{ServiceError, StorePolicy};
use crate::utils::hash;

/// Fields required to provision an officer account.
#[derive(Debug, Clone)]
pub struct NewOfficer {
    pub name: String,
    pub mobile: String,
    pub password: String,
    pub email: String,
    pub designation: String,
    pub department: String,
}

/// Validated partial profile change. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub profile_photo: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Sole owner of officer records.
pub struct OfficerDirectory<'a, C: ConnectionTrait> {
    conn: &'a C,
    policy: &'a StorePolicy,
}

impl<'a, C: ConnectionTrait> OfficerDirectory<'a, C> {
    pub fn new(conn: &'a C, policy: &'a StorePolicy) -> Self {
        Self { conn, policy }
    }

    pub async fn find(&self, id: i32) -> Result<Option<officer::Model>, ServiceError> {
        self.policy
            .with_retry("officer.find", || {
                officer::Entity::find_by_id(id).one(self.conn)
            })
            .await
    }

    pub async fn find_by_mobile(
        &self,
        mobile: &str,
    ) -> Result<Option<officer::Model>, ServiceError> {
        self.policy
            .with_retry("officer.find_by_mobile", || {
                officer::Entity::find()
                    .filter(officer::Column::Mobile.eq(mobile))
                    .one(self.conn)
            })
            .await
    }

    /// Resolve the officer behind a session. A token that outlived its officer is
    /// treated as unauthenticated.
    pub async fn require(&self, id: i32) -> Result<officer::Model, ServiceError> {
        self.find(id).await?.ok_or(ServiceError::Unauthenticated)
    }

    /// Create an officer account. A duplicate mobile number is a `Conflict`.
    pub async fn provision(&self, new: NewOfficer) -> Result<officer::Model, ServiceError> {
        let mobile = new.mobile.trim().to_string();
        validate_mobile(&mobile)?;
        let name = validate_name(&new.name)?;
        let email = validate_email(&new.email)?;
        validate_password(&new.password)?;

        let password_hash = hash::hash_password(&new.password)
            .map_err(|e| ServiceError::Validation(format!("Unusable password: {e}")))?;

        let now = Utc::now();
        let model = officer::ActiveModel {
            name: Set(name),
            mobile: Set(mobile),
            password: Set(password_hash),
            email: Set(email),
            designation: Set(new.designation.trim().to_string()),
            department: Set(new.department.trim().to_string()),
            profile_photo: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let inserted = self
            .policy
            .bounded(model.insert(self.conn))
            .await
            .map_err(|e| match e {
                ServiceError::Database(ref db)
                    if matches!(db.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
                {
                    ServiceError::Conflict("Mobile number is already registered".into())
                }
                other => other,
            })?;

        tracing::info!(officer_id = inserted.id, "Officer provisioned");
        Ok(inserted)
    }

    /// Apply a partial update in one statement and return the fresh record.
    pub async fn update(
        &self,
        id: i32,
        changes: ProfileChanges,
    ) -> Result<officer::Model, ServiceError> {
        if changes.is_empty() {
            return self.require(id).await;
        }

        let mut assignments: Vec<(officer::Column, Value)> = Vec::new();
        if let Some(name) = changes.name {
            assignments.push((officer::Column::Name, name.into()));
        }
        if let Some(email) = changes.email {
            assignments.push((officer::Column::Email, email.into()));
        }
        if let Some(password_hash) = changes.password_hash {
            assignments.push((officer::Column::Password, password_hash.into()));
        }
        if let Some(photo) = changes.profile_photo {
            assignments.push((officer::Column::ProfilePhoto, Some(photo).into()));
        }
        assignments.push((officer::Column::UpdatedAt, Utc::now().into()));

        let result = self
            .policy
            .with_retry("officer.update", || {
                let mut update = officer::Entity::update_many();
                for (column, value) in &assignments {
                    update = update.col_expr(*column, Expr::value(value.clone()));
                }
                update
                    .filter(officer::Column::Id.eq(id))
                    .exec(self.conn)
            })
            .await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Unauthenticated);
        }

        self.require(id).await
    }

    /// Delete an officer who handles no grievances.
    ///
    /// Any grievance, whatever its status, keeps its `handled_by` reference forever, so an
    /// officer who ever claimed anything cannot be removed.
    pub async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        let grievances = GrievanceStore::new(self.conn, self.policy);
        let assigned = grievances.count_handled_by(id).await?;
        if assigned > 0 {
            return Err(ServiceError::Conflict(format!(
                "Officer {id} handles {assigned} grievance(s) and cannot be removed"
            )));
        }

        let result = self
            .policy
            .bounded(officer::Entity::delete_by_id(id).exec(self.conn))
            .await
            .map_err(|e| match e {
                // A claim landed between the count and the delete.
                ServiceError::Database(ref db)
                    if matches!(
                        db.sql_err(),
                        Some(SqlErr::ForeignKeyConstraintViolation(_))
                    ) =>
                {
                    ServiceError::Conflict(format!(
                        "Officer {id} handles grievances and cannot be removed"
                    ))
                }
                other => other,
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Officer {id} not found")));
        }

        tracing::info!(officer_id = id, "Officer removed");
        Ok(())
    }
}

pub(crate) fn validate_name(name: &str) -> Result<String, ServiceError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > 100 {
        return Err(ServiceError::Validation(
            "Name must be 1-100 characters".into(),
        ));
    }
    Ok(name.to_string())
}

pub(crate) fn validate_email(email: &str) -> Result<String, ServiceError> {
    let email = email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed || email.len() > 254 || email.contains(char::is_whitespace) {
        return Err(ServiceError::Validation("Email address is invalid".into()));
    }
    Ok(email.to_string())
}

pub(crate) fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(ServiceError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

fn validate_mobile(mobile: &str) -> Result<(), ServiceError> {
    let digits = mobile.strip_prefix('+').unwrap_or(mobile);
    if digits.len() < 6 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ServiceError::Validation(
            "Mobile number must be 6-15 digits".into(),
        ));
    }
    Ok(())
}
