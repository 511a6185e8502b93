use chrono::{DateTime, Utc};

use super::domain::{
    CandidateStatus, ReviewTrack, ValidationDecision, ValidationId, ValidationRecord,
    ValidationSubmission,
};
use super::repository::CandidateRecord;

/// Policy violations raised before a validation or override is stored.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionViolation {
    #[error("a justification is required when rejecting a candidate")]
    MissingJustification,
    #[error("reviewer has already submitted a {track} validation for this candidate")]
    DuplicateValidation { track: ReviewTrack },
    #[error("candidate position does not require a technical review")]
    TechnicalReviewNotRequired,
    #[error("candidate is not under review (status {status})")]
    NotUnderReview { status: CandidateStatus },
    #[error("a reason is required to override a candidate status")]
    MissingOverrideReason,
}

/// Guard turning reviewer submissions into stamped validation records.
#[derive(Debug, Clone, Default)]
pub struct ValidationGuard;

impl ValidationGuard {
    pub fn record_from_submission(
        &self,
        candidate: &CandidateRecord,
        submission: ValidationSubmission,
        id: ValidationId,
        now: DateTime<Utc>,
    ) -> Result<ValidationRecord, SubmissionViolation> {
        if !candidate.status.accepts_validations() {
            return Err(SubmissionViolation::NotUnderReview {
                status: candidate.status,
            });
        }

        if submission.track == ReviewTrack::Tech && !candidate.requires_technical() {
            return Err(SubmissionViolation::TechnicalReviewNotRequired);
        }

        let justification = non_blank(submission.justification.as_deref());
        if submission.decision == ValidationDecision::Rejected && justification.is_none() {
            return Err(SubmissionViolation::MissingJustification);
        }

        let duplicate = candidate.validations.iter().any(|existing| {
            existing.reviewer_id == submission.reviewer_id && existing.track == submission.track
        });
        if duplicate {
            return Err(SubmissionViolation::DuplicateValidation {
                track: submission.track,
            });
        }

        Ok(ValidationRecord {
            id,
            candidate_id: candidate.profile.candidate_id.clone(),
            reviewer_id: submission.reviewer_id,
            track: submission.track,
            decision: submission.decision,
            justification,
            created_at: submission.submitted_at.unwrap_or(now),
        })
    }

    pub fn override_reason(&self, reason: &str) -> Result<String, SubmissionViolation> {
        non_blank(Some(reason)).ok_or(SubmissionViolation::MissingOverrideReason)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}
