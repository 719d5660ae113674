use chrono::{DateTime, Duration, Utc};
use common::GrievanceStatus;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entity::{grievance, officer};
use crate::store::{ServiceError, StorePolicy};

/// A grievance together with the officer handling it, if any.
#[derive(Debug, Clone)]
pub struct GrievanceView {
    pub grievance: grievance::Model,
    pub handler: Option<officer::Model>,
}

/// Fields supplied when a student submits a grievance.
#[derive(Debug, Clone)]
pub struct NewGrievance {
    pub student_ref: String,
    pub subject: String,
    pub description: String,
    pub attachment: Option<String>,
}

impl NewGrievance {
    fn validate(&self) -> Result<(), ServiceError> {
        if self.student_ref.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Student reference must not be empty".into(),
            ));
        }
        let subject = self.subject.trim();
        if subject.is_empty() || subject.chars().count() > 256 {
            return Err(ServiceError::Validation(
                "Subject must be 1-256 characters".into(),
            ));
        }
        if self.description.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Description must not be empty".into(),
            ));
        }
        if let Some(uri) = &self.attachment
            && uri.trim().is_empty()
        {
            return Err(ServiceError::Validation(
                "Attachment URI must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Optional narrowing of a grievance listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrievanceFilter {
    pub status: Option<GrievanceStatus>,
    pub handled_by: Option<i32>,
}

/// Sole owner of grievance records.
///
/// Status-changing writes are single conditional `UPDATE`s whose `WHERE` clause carries the
/// expected prior state; the affected row count decides the winner.
pub struct GrievanceStore<'a, C: ConnectionTrait> {
    conn: &'a C,
    policy: &'a StorePolicy,
}

impl<'a, C: ConnectionTrait> GrievanceStore<'a, C> {
    pub fn new(conn: &'a C, policy: &'a StorePolicy) -> Self {
        Self { conn, policy }
    }

    /// Record a new `Pending` grievance. The deadline is advisory only.
    pub async fn submit(
        &self,
        new: NewGrievance,
        deadline_after: Duration,
    ) -> Result<grievance::Model, ServiceError> {
        new.validate()?;

        let now = Utc::now();
        let model = grievance::ActiveModel {
            student_ref: Set(new.student_ref.trim().to_string()),
            subject: Set(new.subject.trim().to_string()),
            description: Set(new.description),
            attachment: Set(new.attachment.map(|a| a.trim().to_string())),
            status: Set(GrievanceStatus::Pending),
            handled_by: Set(None),
            remarks: Set(None),
            created_at: Set(now),
            deadline: Set(now + deadline_after),
            resolved_at: Set(None),
            ..Default::default()
        };

        // Not retried: an insert is not idempotent.
        let inserted = self.policy.bounded(model.insert(self.conn)).await?;
        tracing::info!(grievance_id = inserted.id, "Grievance submitted");
        Ok(inserted)
    }

    /// Read a single record as a consistent snapshot.
    pub async fn find(&self, id: i32) -> Result<Option<grievance::Model>, ServiceError> {
        let found = self
            .policy
            .with_retry("grievance.find", || {
                grievance::Entity::find_by_id(id).one(self.conn)
            })
            .await?;

        found.map(checked).transpose()
    }

    pub async fn get_view(&self, id: i32) -> Result<GrievanceView, ServiceError> {
        let found = self
            .policy
            .with_retry("grievance.get", || {
                grievance::Entity::find_by_id(id)
                    .find_also_related(officer::Entity)
                    .one(self.conn)
            })
            .await?;

        let (grievance, handler) =
            found.ok_or_else(|| ServiceError::NotFound(format!("Grievance {id} not found")))?;

        Ok(GrievanceView {
            grievance: checked(grievance)?,
            handler,
        })
    }

    /// All matching grievances in creation order.
    pub async fn list(&self, filter: GrievanceFilter) -> Result<Vec<GrievanceView>, ServiceError> {
        let rows = self
            .policy
            .with_retry("grievance.list", || {
                let mut select = grievance::Entity::find();
                if let Some(status) = filter.status {
                    select = select.filter(grievance::Column::Status.eq(status));
                }
                if let Some(officer_id) = filter.handled_by {
                    select = select.filter(grievance::Column::HandledBy.eq(officer_id));
                }
                select
                    .find_also_related(officer::Entity)
                    .order_by_asc(grievance::Column::Id)
                    .all(self.conn)
            })
            .await?;

        rows.into_iter()
            .map(|(grievance, handler)| {
                Ok(GrievanceView {
                    grievance: checked(grievance)?,
                    handler,
                })
            })
            .collect()
    }

    /// `Pending -> InProgress`, only if the row is still unclaimed.
    ///
    /// Returns `false` when no row matched: the grievance is missing or someone else got there
    /// first. Callers must re-read to tell which.
    pub async fn try_claim(&self, id: i32, officer_id: i32) -> Result<bool, ServiceError> {
        let result = self
            .policy
            .with_retry("grievance.claim", || {
                grievance::Entity::update_many()
                    .col_expr(
                        grievance::Column::Status,
                        Expr::value(GrievanceStatus::InProgress),
                    )
                    .col_expr(grievance::Column::HandledBy, Expr::value(Some(officer_id)))
                    .filter(grievance::Column::Id.eq(id))
                    .filter(grievance::Column::Status.eq(GrievanceStatus::Pending))
                    .filter(grievance::Column::HandledBy.is_null())
                    .exec(self.conn)
            })
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// `InProgress -> outcome`, only if the row is in progress and handled by `officer_id`.
    pub async fn try_resolve(
        &self,
        id: i32,
        officer_id: i32,
        outcome: GrievanceStatus,
        remarks: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        if !GrievanceStatus::InProgress.can_transition_to(outcome) {
            return Err(ServiceError::Validation(format!(
                "{outcome} is not a resolution outcome"
            )));
        }

        let result = self
            .policy
            .with_retry("grievance.resolve", || {
                grievance::Entity::update_many()
                    .col_expr(grievance::Column::Status, Expr::value(outcome))
                    .col_expr(
                        grievance::Column::Remarks,
                        Expr::value(Some(remarks.to_string())),
                    )
                    .col_expr(grievance::Column::ResolvedAt, Expr::value(Some(at)))
                    .filter(grievance::Column::Id.eq(id))
                    .filter(grievance::Column::Status.eq(GrievanceStatus::InProgress))
                    .filter(grievance::Column::HandledBy.eq(officer_id))
                    .exec(self.conn)
            })
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// `(status, handled_by)` for every grievance, read in one statement.
    pub async fn status_snapshot(
        &self,
    ) -> Result<Vec<(GrievanceStatus, Option<i32>)>, ServiceError> {
        self.policy
            .with_retry("grievance.snapshot", || {
                grievance::Entity::find()
                    .select_only()
                    .column(grievance::Column::Status)
                    .column(grievance::Column::HandledBy)
                    .into_tuple::<(GrievanceStatus, Option<i32>)>()
                    .all(self.conn)
            })
            .await
    }

    /// Number of grievances, in any status, that reference `officer_id`.
    pub async fn count_handled_by(&self, officer_id: i32) -> Result<u64, ServiceError> {
        self.policy
            .with_retry("grievance.count_handled_by", || {
                grievance::Entity::find()
                    .filter(grievance::Column::HandledBy.eq(officer_id))
                    .count(self.conn)
            })
            .await
    }
}

/// Reject records whose status and optional fields disagree.
fn checked(model: grievance::Model) -> Result<grievance::Model, ServiceError> {
    model.check_invariants().map_err(|detail| {
        tracing::error!(grievance_id = model.id, %detail, "Grievance record violates invariants");
        ServiceError::Corrupt(detail)
    })?;
    Ok(model)
}
