use metrics_exporter_prometheus::PrometheusHandle;
use recruit_ai::workflows::candidates::{
    ActivityError, ActivityPublisher, CandidateActivity, CandidateId, CandidateRecord,
    CandidateRepository, CandidateStatus, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    records: Arc<Mutex<HashMap<CandidateId, CandidateRecord>>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
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

/// Activity sink that writes every event to the structured log.
#[derive(Default, Clone, Copy)]
pub(crate) struct TracingActivityPublisher;

impl ActivityPublisher for TracingActivityPublisher {
    fn publish(&self, activity: CandidateActivity) -> Result<(), ActivityError> {
        let transition = activity
            .transition
            .map(|transition| format!("{} -> {}", transition.from, transition.to));
        info!(
            kind = ?activity.kind,
            candidate_id = %activity.candidate_id,
            actor = activity.actor.as_ref().map(|actor| actor.0.as_str()),
            transition = transition.as_deref(),
            "candidate activity"
        );
        Ok(())
    }
}

/// Activity sink that keeps events in memory so the demo can print them.
#[derive(Default, Clone)]
pub(crate) struct InMemoryActivityLog {
    events: Arc<Mutex<Vec<CandidateActivity>>>,
}

impl ActivityPublisher for InMemoryActivityLog {
    fn publish(&self, activity: CandidateActivity) -> Result<(), ActivityError> {
        let mut guard = self.events.lock().expect("activity mutex poisoned");
        guard.push(activity);
        Ok(())
    }
}

impl InMemoryActivityLog {
    pub(crate) fn events(&self) -> Vec<CandidateActivity> {
        self.events.lock().expect("activity mutex poisoned").clone()
    }
}
