//! Candidate validation workflow: intake of reviewer decisions, status
//! resolution, lifecycle transitions, and the HTTP surface over them.

pub mod domain;
pub(crate) mod intake;
pub mod repository;
pub mod resolution;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    CandidateId, CandidateProfile, CandidateStatus, NewCandidate, ReviewTrack, ReviewerId,
    StatusOverride, StatusOverrideRequest, StatusTransition, ValidationDecision, ValidationId,
    ValidationRecord, ValidationSubmission,
};
pub use intake::SubmissionViolation;
pub use repository::{
    ActivityError, ActivityKind, ActivityPublisher, CandidateActivity, CandidateRecord,
    CandidateRepository, CandidateStatusView, RepositoryError,
};
pub use resolution::{resolve_status, LatestDecisions, Resolution, ResolvedStatus, StatusResolver};
pub use router::candidate_router;
pub use service::{CandidateServiceError, CandidateValidationService, ValidationReceipt};
