use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    CandidateId, CandidateProfile, CandidateStatus, ReviewerId, StatusOverride, StatusTransition,
    ValidationRecord,
};
use super::resolution::{Resolution, StatusResolver};

/// Repository record holding the candidate, its status, and its validation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub profile: CandidateProfile,
    pub status: CandidateStatus,
    pub validations: Vec<ValidationRecord>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status_override: Option<StatusOverride>,
    /// Bumped by the repository on every successful update.
    #[serde(default)]
    pub revision: u64,
}

impl CandidateRecord {
    pub fn draft(profile: CandidateProfile) -> Self {
        Self {
            profile,
            status: CandidateStatus::Draft,
            validations: Vec::new(),
            submitted_at: None,
            status_override: None,
            revision: 0,
        }
    }

    pub fn requires_technical(&self) -> bool {
        self.profile.is_technical_position
    }

    /// Ordering key for review queues: oldest submission first.
    pub fn queue_key(&self) -> (Option<DateTime<Utc>>, &CandidateId) {
        (self.submitted_at, &self.profile.candidate_id)
    }

    pub fn resolution(&self) -> Resolution {
        StatusResolver.explain(&self.validations, self.requires_technical())
    }

    pub fn status_view(&self) -> CandidateStatusView {
        let rationale = match (self.status, &self.status_override) {
            (CandidateStatus::Draft, _) => "not yet submitted for review".to_string(),
            (CandidateStatus::Hired, _) => "hired".to_string(),
            (_, Some(status_override)) => format!("overridden: {}", status_override.reason),
            _ => self.resolution().rationale,
        };

        CandidateStatusView {
            candidate_id: self.profile.candidate_id.clone(),
            full_name: self.profile.full_name.clone(),
            position: self.profile.position.clone(),
            is_technical_position: self.profile.is_technical_position,
            status: self.status.label(),
            rationale,
            validation_count: self.validations.len(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait CandidateRepository: Send + Sync {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError>;
    /// Compare-and-swap on `revision`: stores `record` only when the stored revision still
    /// matches, returning it with the revision bumped. A stale write yields `Conflict`.
    fn update(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError>;
    /// Up to `limit` candidates in any of `statuses`, oldest `submitted_at` first.
    fn with_statuses(
        &self,
        statuses: &[CandidateStatus],
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for notifications and the action log.
pub trait ActivityPublisher: Send + Sync {
    fn publish(&self, activity: CandidateActivity) -> Result<(), ActivityError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CreateCandidate,
    SubmitCandidate,
    ValidateCandidate,
    RejectCandidate,
    OverrideCandidate,
    HireCandidate,
    StatusChanged,
}

/// Activity payload so routes and tests can assert integration boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateActivity {
    pub kind: ActivityKind,
    pub candidate_id: CandidateId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<ReviewerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<StatusTransition>,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("activity transport unavailable: {0}")]
    Transport(String),
}

/// Public representation of a candidate's pipeline position.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateStatusView {
    pub candidate_id: CandidateId,
    pub full_name: String,
    pub position: String,
    pub is_technical_position: bool,
    pub status: &'static str,
    pub rationale: String,
    pub validation_count: usize,
}
