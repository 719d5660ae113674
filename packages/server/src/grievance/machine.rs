use chrono::Utc;
use common::GrievanceStatus;
use sea_orm::ConnectionTrait;

use super::store::{GrievanceFilter, GrievanceStore, GrievanceView};
use crate::entity::grievance;
use crate::officer::OfficerDirectory;
use crate::store::ServiceError;

const MAX_REMARKS_CHARS: usize = 2000;

/// Enforces the grievance lifecycle on behalf of an authenticated officer.
///
/// `Pending -> InProgress -> {Resolved, Rejected}`; no other transition is reachable. Every
/// status change is a single conditional write, so concurrent callers never both win.
pub struct GrievanceStateMachine<'a, C: ConnectionTrait> {
    store: GrievanceStore<'a, C>,
    officers: OfficerDirectory<'a, C>,
}

impl<'a, C: ConnectionTrait> GrievanceStateMachine<'a, C> {
    pub fn new(store: GrievanceStore<'a, C>, officers: OfficerDirectory<'a, C>) -> Self {
        Self { store, officers }
    }

    /// Grievances visible to `officer_id`. With `mine`, only those they handle.
    pub async fn list(
        &self,
        officer_id: i32,
        status: Option<GrievanceStatus>,
        mine: bool,
    ) -> Result<Vec<GrievanceView>, ServiceError> {
        self.officers.require(officer_id).await?;
        let filter = GrievanceFilter {
            status,
            handled_by: mine.then_some(officer_id),
        };
        self.store.list(filter).await
    }

    pub async fn get(&self, officer_id: i32, id: i32) -> Result<GrievanceView, ServiceError> {
        self.officers.require(officer_id).await?;
        self.store.get_view(id).await
    }

    /// Take ownership of a pending grievance. Exactly one concurrent caller succeeds.
    pub async fn claim(&self, officer_id: i32, id: i32) -> Result<GrievanceView, ServiceError> {
        self.officers.require(officer_id).await?;

        if self.store.try_claim(id, officer_id).await? {
            tracing::info!(grievance_id = id, officer_id, "Grievance claimed");
            return self.store.get_view(id).await;
        }

        let current = self.store.find(id).await?;
        let err = claim_miss(id, current.as_ref().map(state_of));
        tracing::debug!(grievance_id = id, officer_id, error = %err, "Claim lost");
        Err(err)
    }

    /// Close a grievance the caller holds, recording remarks and the outcome.
    pub async fn resolve(
        &self,
        officer_id: i32,
        id: i32,
        outcome: GrievanceStatus,
        remarks: &str,
    ) -> Result<GrievanceView, ServiceError> {
        let remarks = validate_remarks(remarks)?;
        if !outcome.is_terminal() {
            return Err(ServiceError::Validation(format!(
                "Status must be Resolved or Rejected, got {outcome}"
            )));
        }

        self.officers.require(officer_id).await?;

        if self
            .store
            .try_resolve(id, officer_id, outcome, remarks, Utc::now())
            .await?
        {
            tracing::info!(grievance_id = id, officer_id, %outcome, "Grievance resolved");
            return self.store.get_view(id).await;
        }

        let current = self.store.find(id).await?;
        let err = resolve_miss(id, officer_id, current.as_ref().map(state_of));
        match &err {
            ServiceError::Forbidden(_) => {
                tracing::warn!(grievance_id = id, officer_id, "Resolve attempted by non-handler")
            }
            _ => tracing::debug!(grievance_id = id, officer_id, error = %err, "Resolve rejected"),
        }
        Err(err)
    }
}

fn validate_remarks(remarks: &str) -> Result<&str, ServiceError> {
    let remarks = remarks.trim();
    if remarks.is_empty() {
        return Err(ServiceError::Validation("Remarks are required".into()));
    }
    if remarks.chars().count() > MAX_REMARKS_CHARS {
        return Err(ServiceError::Validation(format!(
            "Remarks must be at most {MAX_REMARKS_CHARS} characters"
        )));
    }
    Ok(remarks)
}

fn state_of(g: &grievance::Model) -> (GrievanceStatus, Option<i32>) {
    (g.status, g.handled_by)
}

/// Explain why a conditional claim matched no row, from a fresh read.
fn claim_miss(id: i32, current: Option<(GrievanceStatus, Option<i32>)>) -> ServiceError {
    match current {
        None => ServiceError::NotFound(format!("Grievance {id} not found")),
        Some((GrievanceStatus::InProgress, _)) => {
            ServiceError::Conflict("Grievance has already been claimed".into())
        }
        Some((status, _)) if status.is_terminal() => {
            ServiceError::Conflict(format!("Grievance is already {status}"))
        }
        // Still pending: the winner's write is not visible yet.
        Some(_) => ServiceError::Conflict("Grievance was claimed concurrently".into()),
    }
}

/// Explain why a conditional resolve matched no row, from a fresh read.
fn resolve_miss(
    id: i32,
    officer_id: i32,
    current: Option<(GrievanceStatus, Option<i32>)>,
) -> ServiceError {
    match current {
        None => ServiceError::NotFound(format!("Grievance {id} not found")),
        Some((GrievanceStatus::Pending, _)) => {
            ServiceError::InvalidState("Grievance must be claimed before it can be resolved".into())
        }
        Some((status, _)) if status.is_terminal() => {
            ServiceError::InvalidState(format!("Grievance is already {status}"))
        }
        Some((_, handler)) if handler != Some(officer_id) => {
            ServiceError::Forbidden("Grievance is handled by another officer".into())
        }
        Some(_) => ServiceError::InvalidState("Grievance changed concurrently".into()),
    }
}
