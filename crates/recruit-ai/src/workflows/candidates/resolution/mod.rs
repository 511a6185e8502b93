//! Pipeline status resolution from accumulated sales and tech validations.
//!
//! Resolution is a pure function of the validation history and the
//! candidate's technical-review requirement. Only the latest record per track
//! counts; see [`LatestDecisions`] for the selection and tie-break rule.

mod latest;
mod policy;

pub use latest::LatestDecisions;

use super::domain::{CandidateStatus, ReviewTrack, ValidationDecision, ValidationRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status produced by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedStatus {
    PendingTech,
    PendingSales,
    Validated,
    Rejected,
    Pending,
}

impl ResolvedStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ResolvedStatus::PendingTech => "pending_tech",
            ResolvedStatus::PendingSales => "pending_sales",
            ResolvedStatus::Validated => "validated",
            ResolvedStatus::Rejected => "rejected",
            ResolvedStatus::Pending => "pending",
        }
    }

    /// Initial state for a candidate with no validations yet.
    pub const fn initial(requires_technical: bool) -> Self {
        if requires_technical {
            ResolvedStatus::PendingTech
        } else {
            ResolvedStatus::PendingSales
        }
    }
}

impl fmt::Display for ResolvedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<ResolvedStatus> for CandidateStatus {
    fn from(status: ResolvedStatus) -> Self {
        match status {
            ResolvedStatus::PendingTech => CandidateStatus::PendingTech,
            ResolvedStatus::PendingSales => CandidateStatus::PendingSales,
            ResolvedStatus::Validated => CandidateStatus::Validated,
            ResolvedStatus::Rejected => CandidateStatus::Rejected,
            ResolvedStatus::Pending => CandidateStatus::Pending,
        }
    }
}

/// Compute the current pipeline status for a validation history.
///
/// Total over all inputs: records may be empty, unordered, or contain several
/// entries per track.
pub fn resolve_status(records: &[ValidationRecord], requires_technical: bool) -> ResolvedStatus {
    let latest = LatestDecisions::collect(records);
    policy::decide_status(&latest, requires_technical)
}

/// Resolution output with the decisions that drove it, for audit trails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub status: ResolvedStatus,
    pub requires_technical: bool,
    pub sales: Option<ValidationDecision>,
    pub tech: Option<ValidationDecision>,
    pub rationale: String,
}

/// Stateless resolver handle so services can hold it alongside other collaborators.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusResolver;

impl StatusResolver {
    pub fn resolve(
        &self,
        records: &[ValidationRecord],
        requires_technical: bool,
    ) -> ResolvedStatus {
        resolve_status(records, requires_technical)
    }

    pub fn explain(&self, records: &[ValidationRecord], requires_technical: bool) -> Resolution {
        let latest = LatestDecisions::collect(records);
        let status = policy::decide_status(&latest, requires_technical);

        Resolution {
            status,
            requires_technical,
            sales: latest.decision(ReviewTrack::Sales),
            tech: latest.decision(ReviewTrack::Tech),
            rationale: policy::rationale(status, &latest, requires_technical),
        }
    }
}
