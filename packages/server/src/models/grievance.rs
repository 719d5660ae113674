use chrono::{DateTime, Utc};
use common::GrievanceStatus;
use serde::{Deserialize, Serialize};

use crate::grievance::GrievanceView;

/// The officer handling a grievance, as shown alongside it.
#[derive(Serialize, utoipa::ToSchema)]
pub struct OfficerSummary {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Asha Verma")]
    pub name: String,
    #[schema(example = "Warden")]
    pub designation: String,
    #[schema(example = "Hostel Administration")]
    pub department: String,
}

impl From<crate::entity::officer::Model> for OfficerSummary {
    fn from(officer: crate::entity::officer::Model) -> Self {
        Self {
            id: officer.id,
            name: officer.name,
            designation: officer.designation,
            department: officer.department,
        }
    }
}

/// A grievance as returned by every grievance endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct GrievanceResponse {
    #[schema(example = 42)]
    pub id: i32,
    /// Reference of the submitting student.
    #[schema(example = "2023CS101")]
    pub student_ref: String,
    #[schema(example = "No hot water in Block C")]
    pub subject: String,
    pub description: String,
    pub attachment: Option<String>,
    pub status: GrievanceStatus,
    /// Set once the grievance has been claimed.
    pub handled_by: Option<OfficerSummary>,
    /// Set once the grievance has been resolved or rejected.
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Advisory only; nothing escalates when it passes.
    pub deadline: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl From<GrievanceView> for GrievanceResponse {
    fn from(view: GrievanceView) -> Self {
        let g = view.grievance;
        Self {
            id: g.id,
            student_ref: g.student_ref,
            subject: g.subject,
            description: g.description,
            attachment: g.attachment,
            status: g.status,
            handled_by: view.handler.map(Into::into),
            remarks: g.remarks,
            created_at: g.created_at,
            deadline: g.deadline,
            resolved_at: g.resolved_at,
        }
    }
}

/// Query parameters for listing grievances.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListGrievancesParams {
    /// Only grievances in this status (`Pending`, `In Progress`, `Resolved`, `Rejected`).
    #[param(example = "Pending")]
    pub status: Option<String>,
    /// Only grievances handled by the caller.
    #[param(example = false)]
    pub mine: Option<bool>,
}

/// Request body for resolving a claimed grievance.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ResolveRequest {
    /// Outcome notes; required and not blank.
    #[schema(example = "Geyser replaced on 12 March")]
    pub remarks: String,
    /// Final status: `Resolved` or `Rejected`.
    #[schema(example = "Resolved")]
    pub status: String,
}
