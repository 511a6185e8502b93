use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidates tracked by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier of the person who submitted a validation or an override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review track a validation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewTrack {
    Sales,
    Tech,
}

impl ReviewTrack {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewTrack::Sales => "sales",
            ReviewTrack::Tech => "tech",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sales" => Some(Self::Sales),
            "tech" => Some(Self::Tech),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationDecision {
    Approved,
    Rejected,
}

impl ValidationDecision {
    pub const fn label(self) -> &'static str {
        match self {
            ValidationDecision::Approved => "approved",
            ValidationDecision::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A single reviewer's decision on a candidate. Records are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub id: ValidationId,
    pub candidate_id: CandidateId,
    pub reviewer_id: ReviewerId,
    pub track: ReviewTrack,
    pub decision: ValidationDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reviewer input before the record is stamped and stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSubmission {
    pub reviewer_id: ReviewerId,
    pub track: ReviewTrack,
    pub decision: ValidationDecision,
    #[serde(default)]
    pub justification: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Intake payload for a new candidate; the identifier is assigned on registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    pub full_name: String,
    pub position: String,
    #[serde(default)]
    pub is_technical_position: bool,
}

/// Candidate attributes the validation workflow needs. Contact details and
/// documents live in the external candidate store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub position: String,
    pub is_technical_position: bool,
}

/// Lifecycle status persisted on the candidate entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Draft,
    Pending,
    PendingSales,
    PendingTech,
    Validated,
    Rejected,
    Hired,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Draft => "draft",
            CandidateStatus::Pending => "pending",
            CandidateStatus::PendingSales => "pending_sales",
            CandidateStatus::PendingTech => "pending_tech",
            CandidateStatus::Validated => "validated",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Hired => "hired",
        }
    }

    /// Statuses in which reviewers may still submit validations.
    pub const fn accepts_validations(self) -> bool {
        matches!(
            self,
            CandidateStatus::Pending | CandidateStatus::PendingSales | CandidateStatus::PendingTech
        )
    }

    /// Statuses surfaced in a reviewer's queue for the given track.
    pub const fn queue_for(track: ReviewTrack) -> [Self; 2] {
        match track {
            ReviewTrack::Sales => [CandidateStatus::Pending, CandidateStatus::PendingSales],
            ReviewTrack::Tech => [CandidateStatus::Pending, CandidateStatus::PendingTech],
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Manual status change recorded on the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverride {
    pub actor: ReviewerId,
    pub reason: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOverrideRequest {
    pub actor: ReviewerId,
    pub status: CandidateStatus,
    pub reason: String,
}

/// Old and new status of a candidate after a workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: CandidateStatus,
    pub to: CandidateStatus,
}

impl StatusTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}
