use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{
    CandidateId, CandidateProfile, CandidateStatus, NewCandidate, ReviewTrack, ReviewerId,
    StatusOverride, StatusOverrideRequest, StatusTransition, ValidationDecision, ValidationId,
    ValidationRecord, ValidationSubmission,
};
use super::intake::{SubmissionViolation, ValidationGuard};
use super::repository::{
    ActivityError, ActivityKind, ActivityPublisher, CandidateActivity, CandidateRecord,
    CandidateRepository, RepositoryError,
};
use super::resolution::StatusResolver;

/// Service composing the intake guard, repository, status resolver, and activity sink.
pub struct CandidateValidationService<R, P> {
    guard: ValidationGuard,
    resolver: StatusResolver,
    repository: Arc<R>,
    activity: Arc<P>,
}

/// Attempts at appending a validation before a concurrent writer wins outright.
const MAX_WRITE_ATTEMPTS: u32 = 5;

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static VALIDATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

fn next_validation_id() -> ValidationId {
    let id = VALIDATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ValidationId(format!("val-{id:06}"))
}

/// Outcome of recording a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReceipt {
    pub record: ValidationRecord,
    pub previous_status: CandidateStatus,
    pub status: CandidateStatus,
}

impl ValidationReceipt {
    pub fn transition(&self) -> StatusTransition {
        StatusTransition {
            from: self.previous_status,
            to: self.status,
        }
    }
}

impl<R, P> CandidateValidationService<R, P>
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    pub fn new(repository: Arc<R>, activity: Arc<P>) -> Self {
        Self {
            guard: ValidationGuard,
            resolver: StatusResolver,
            repository,
            activity,
        }
    }

    /// Register a new candidate in `draft`.
    pub fn register(
        &self,
        candidate: NewCandidate,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        let profile = CandidateProfile {
            candidate_id: next_candidate_id(),
            full_name: candidate.full_name.trim().to_string(),
            position: candidate.position.trim().to_string(),
            is_technical_position: candidate.is_technical_position,
        };

        let stored = self.repository.insert(CandidateRecord::draft(profile))?;
        debug!(candidate_id = %stored.profile.candidate_id, "candidate registered");

        let mut details = BTreeMap::new();
        details.insert("position".to_string(), stored.profile.position.clone());
        self.publish(ActivityKind::CreateCandidate, &stored, None, None, details)?;

        Ok(stored)
    }

    /// Hand a draft over to reviewers.
    pub fn submit_for_review(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        let mut record = self.fetch_existing(candidate_id)?;
        let transition = StatusTransition {
            from: record.status,
            to: CandidateStatus::Pending,
        };
        if record.status != CandidateStatus::Draft {
            return Err(CandidateServiceError::InvalidTransition {
                from: transition.from,
                to: transition.to,
            });
        }

        record.status = CandidateStatus::Pending;
        record.submitted_at = Some(Utc::now());
        let record = self.repository.update(record)?;

        info!(candidate_id = %candidate_id, "candidate submitted for review");
        self.publish(
            ActivityKind::SubmitCandidate,
            &record,
            None,
            Some(transition),
            BTreeMap::new(),
        )?;

        Ok(record)
    }

    /// Append a reviewer's validation and persist the re-resolved status.
    ///
    /// A write that loses a race with another update is retried against the fresh record, so
    /// concurrent reviewers never drop each other's validations.
    pub fn record_validation(
        &self,
        candidate_id: &CandidateId,
        submission: ValidationSubmission,
    ) -> Result<ValidationReceipt, CandidateServiceError> {
        let mut attempt = 1;
        let (record, receipt) = loop {
            match self.append_validation(candidate_id, submission.clone()) {
                Err(CandidateServiceError::Repository(RepositoryError::Conflict))
                    if attempt < MAX_WRITE_ATTEMPTS =>
                {
                    warn!(
                        candidate_id = %candidate_id,
                        attempt,
                        "candidate changed while recording validation; retrying"
                    );
                    attempt += 1;
                }
                outcome => break outcome?,
            }
        };

        info!(
            candidate_id = %candidate_id,
            track = %receipt.record.track,
            decision = receipt.record.decision.label(),
            from = %receipt.previous_status,
            to = %receipt.status,
            "validation recorded"
        );

        let kind = match receipt.record.decision {
            ValidationDecision::Approved => ActivityKind::ValidateCandidate,
            ValidationDecision::Rejected => ActivityKind::RejectCandidate,
        };
        let mut details = BTreeMap::new();
        details.insert(
            "validation_type".to_string(),
            receipt.record.track.label().to_string(),
        );
        if let Some(justification) = &receipt.record.justification {
            details.insert("justification".to_string(), justification.clone());
        }
        self.publish(
            kind,
            &record,
            Some(receipt.record.reviewer_id.clone()),
            None,
            details,
        )?;

        let transition = receipt.transition();
        if transition.changed() {
            self.publish(
                ActivityKind::StatusChanged,
                &record,
                None,
                Some(transition),
                BTreeMap::new(),
            )?;
        }

        Ok(receipt)
    }

    /// Force a status, bypassing resolution. Requires a reason.
    pub fn override_status(
        &self,
        candidate_id: &CandidateId,
        request: StatusOverrideRequest,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        let reason = self.guard.override_reason(&request.reason)?;
        let mut record = self.fetch_existing(candidate_id)?;

        let transition = StatusTransition {
            from: record.status,
            to: request.status,
        };
        record.status = request.status;
        record.status_override = Some(StatusOverride {
            actor: request.actor.clone(),
            reason: reason.clone(),
            at: Utc::now(),
        });
        let record = self.repository.update(record)?;

        info!(
            candidate_id = %candidate_id,
            actor = %request.actor,
            from = %transition.from,
            to = %transition.to,
            "candidate status overridden"
        );

        let mut details = BTreeMap::new();
        details.insert("reason".to_string(), reason);
        self.publish(
            ActivityKind::OverrideCandidate,
            &record,
            Some(request.actor),
            Some(transition),
            details,
        )?;

        Ok(record)
    }

    /// Mark a validated candidate as hired.
    pub fn mark_hired(
        &self,
        candidate_id: &CandidateId,
        actor: ReviewerId,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        let mut record = self.fetch_existing(candidate_id)?;
        let transition = StatusTransition {
            from: record.status,
            to: CandidateStatus::Hired,
        };
        if record.status != CandidateStatus::Validated {
            return Err(CandidateServiceError::InvalidTransition {
                from: transition.from,
                to: transition.to,
            });
        }

        record.status = CandidateStatus::Hired;
        let record = self.repository.update(record)?;

        info!(candidate_id = %candidate_id, actor = %actor, "candidate hired");
        self.publish(
            ActivityKind::HireCandidate,
            &record,
            Some(actor),
            Some(transition),
            BTreeMap::new(),
        )?;

        Ok(record)
    }

    /// Candidates awaiting a decision on the given track, oldest submissions first.
    pub fn review_queue(
        &self,
        track: ReviewTrack,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, CandidateServiceError> {
        let statuses = CandidateStatus::queue_for(track);
        let records = self.repository.with_statuses(&statuses, limit)?;
        Ok(records)
    }

    /// Fetch a candidate and current status for API responses.
    pub fn get(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        self.fetch_existing(candidate_id)
    }

    fn append_validation(
        &self,
        candidate_id: &CandidateId,
        submission: ValidationSubmission,
    ) -> Result<(CandidateRecord, ValidationReceipt), CandidateServiceError> {
        let mut record = self.fetch_existing(candidate_id)?;
        let validation = self.guard.record_from_submission(
            &record,
            submission,
            next_validation_id(),
            Utc::now(),
        )?;

        let previous_status = record.status;
        record.validations.push(validation.clone());
        let status = CandidateStatus::from(
            self.resolver
                .resolve(&record.validations, record.requires_technical()),
        );
        record.status = status;
        if status != previous_status {
            record.status_override = None;
        }
        let record = self.repository.update(record)?;

        let receipt = ValidationReceipt {
            record: validation,
            previous_status,
            status,
        };
        Ok((record, receipt))
    }

    fn fetch_existing(
        &self,
        candidate_id: &CandidateId,
    ) -> Result<CandidateRecord, CandidateServiceError> {
        let record = self
            .repository
            .fetch(candidate_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    fn publish(
        &self,
        kind: ActivityKind,
        record: &CandidateRecord,
        actor: Option<ReviewerId>,
        transition: Option<StatusTransition>,
        details: BTreeMap<String, String>,
    ) -> Result<(), ActivityError> {
        self.activity.publish(CandidateActivity {
            kind,
            candidate_id: record.profile.candidate_id.clone(),
            actor,
            transition,
            details,
        })
    }
}

/// Error raised by the candidate validation service.
#[derive(Debug, thiserror::Error)]
pub enum CandidateServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionViolation),
    #[error("cannot move candidate from {from} to {to}")]
    InvalidTransition {
        from: CandidateStatus,
        to: CandidateStatus,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Activity(#[from] ActivityError),
}
