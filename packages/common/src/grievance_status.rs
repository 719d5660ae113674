#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a grievance.
///
/// `Pending -> InProgress -> {Resolved, Rejected}`. The two resolution states are terminal,
/// and no transition skips `InProgress`.
///
/// JSON spells `InProgress` as `"In Progress"`, the label officers see; the stored column
/// value and [`GrievanceStatus::as_str`] keep the unspaced form.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")
)]
#[serde(rename_all = "PascalCase")]
pub enum GrievanceStatus {
    /// Submitted and not yet claimed by any officer.
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Pending"))]
    Pending,
    /// Claimed by exactly one officer who is working on it.
    #[serde(rename = "In Progress", alias = "InProgress")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "InProgress"))]
    InProgress,
    /// Closed with a favourable outcome.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Resolved"))]
    Resolved,
    /// Closed without action.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "Rejected"))]
    Rejected,
}

impl GrievanceStatus {
    pub const ALL: &'static [GrievanceStatus] = &[
        Self::Pending,
        Self::InProgress,
        Self::Resolved,
        Self::Rejected,
    ];

    /// Statuses an officer may choose when resolving.
    pub const OUTCOMES: &'static [GrievanceStatus] = &[Self::Resolved, Self::Rejected];

    /// Returns true once no further transition is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected)
    }

    /// Returns true for the states in which `handled_by` must be set.
    pub fn requires_handler(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether `self -> next` is an edge of the lifecycle graph.
    pub fn can_transition_to(&self, next: GrievanceStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Resolved)
                | (Self::InProgress, Self::Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for GrievanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{invalid}'. Valid values: Pending, In Progress, Resolved, Rejected")]
pub struct ParseStatusError {
    invalid: String,
}

impl FromStr for GrievanceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(Self::Pending),
            "InProgress" | "In Progress" => Ok(Self::InProgress),
            "Resolved" => Ok(Self::Resolved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseStatusError {
                invalid: other.to_string(),
            }),
        }
    }
}
