use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::candidates::domain::{
    CandidateId, CandidateProfile, CandidateStatus, NewCandidate, ReviewTrack, ReviewerId,
    ValidationDecision, ValidationId, ValidationRecord, ValidationSubmission,
};
use crate::workflows::candidates::repository::{
    ActivityError, ActivityKind, ActivityPublisher, CandidateActivity, CandidateRecord,
    CandidateRepository, RepositoryError,
};
use crate::workflows::candidates::CandidateValidationService;

pub(super) fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::minutes(minutes)
}

pub(super) fn validation(
    track: ReviewTrack,
    decision: ValidationDecision,
    minutes: i64,
) -> ValidationRecord {
    ValidationRecord {
        id: ValidationId(format!("val-{}-{minutes}", track.label())),
        candidate_id: CandidateId("cand-test".to_string()),
        reviewer_id: ReviewerId(format!("{}-reviewer", track.label())),
        track,
        decision,
        justification: match decision {
            ValidationDecision::Approved => None,
            ValidationDecision::Rejected => Some("not a fit".to_string()),
        },
        created_at: at(minutes),
    }
}

pub(super) fn sales(decision: ValidationDecision, minutes: i64) -> ValidationRecord {
    validation(ReviewTrack::Sales, decision, minutes)
}

pub(super) fn tech(decision: ValidationDecision, minutes: i64) -> ValidationRecord {
    validation(ReviewTrack::Tech, decision, minutes)
}

pub(super) fn submission(
    reviewer: &str,
    track: ReviewTrack,
    decision: ValidationDecision,
) -> ValidationSubmission {
    ValidationSubmission {
        reviewer_id: ReviewerId(reviewer.to_string()),
        track,
        decision,
        justification: None,
        submitted_at: None,
    }
}

pub(super) fn rejection(reviewer: &str, track: ReviewTrack, reason: &str) -> ValidationSubmission {
    ValidationSubmission {
        justification: Some(reason.to_string()),
        ..submission(reviewer, track, ValidationDecision::Rejected)
    }
}

pub(super) fn new_candidate(technical: bool) -> NewCandidate {
    NewCandidate {
        full_name: "Camille Durand".to_string(),
        position: if technical {
            "Backend Engineer".to_string()
        } else {
            "Account Manager".to_string()
        },
        is_technical_position: technical,
    }
}

pub(super) fn candidate_record(technical: bool, status: CandidateStatus) -> CandidateRecord {
    CandidateRecord {
        status,
        ..CandidateRecord::draft(CandidateProfile {
            candidate_id: CandidateId("cand-test".to_string()),
            full_name: "Camille Durand".to_string(),
            position: "Backend Engineer".to_string(),
            is_technical_position: technical,
        })
    }
}

pub(super) fn build_service() -> (
    CandidateValidationService<MemoryRepository, MemoryActivity>,
    Arc<MemoryRepository>,
    Arc<MemoryActivity>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let activity = Arc::new(MemoryActivity::default());
    let service = CandidateValidationService::new(repository.clone(), activity.clone());
    (service, repository, activity)
}

/// Registers and submits a candidate so it is ready for reviewers.
pub(super) fn candidate_under_review(
    service: &CandidateValidationService<MemoryRepository, MemoryActivity>,
    technical: bool,
) -> CandidateRecord {
    let record = service
        .register(new_candidate(technical))
        .expect("registration succeeds");
    service
        .submit_for_review(&record.profile.candidate_id)
        .expect("submission succeeds")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
}

impl CandidateRepository for MemoryRepository {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.profile.candidate_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.profile.candidate_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&record.profile.candidate_id)
            .ok_or(RepositoryError::NotFound)?;
        if stored.revision != record.revision {
            return Err(RepositoryError::Conflict);
        }
        record.revision += 1;
        *stored = record.clone();
        Ok(record)
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn with_statuses(
        &self,
        statuses: &[CandidateStatus],
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| statuses.contains(&record.status))
            .cloned()
            .collect();
        records.sort_by(|left, right| left.queue_key().cmp(&right.queue_key()));
        records.truncate(limit);
        Ok(records)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryActivity {
    events: Arc<Mutex<Vec<CandidateActivity>>>,
}

impl MemoryActivity {
    pub(super) fn events(&self) -> Vec<CandidateActivity> {
        self.events.lock().expect("activity mutex poisoned").clone()
    }

    pub(super) fn kinds(&self) -> Vec<ActivityKind> {
        self.events().into_iter().map(|event| event.kind).collect()
    }
}

impl ActivityPublisher for MemoryActivity {
    fn publish(&self, activity: CandidateActivity) -> Result<(), ActivityError> {
        self.events
            .lock()
            .expect("activity mutex poisoned")
            .push(activity);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn insert(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn with_statuses(
        &self,
        _statuses: &[CandidateStatus],
        _limit: usize,
    ) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
