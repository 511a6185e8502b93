use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    CandidateId, NewCandidate, ReviewTrack, ReviewerId, StatusOverrideRequest, ValidationRecord,
    ValidationSubmission,
};
use super::intake::SubmissionViolation;
use super::repository::{ActivityPublisher, CandidateRepository, RepositoryError};
use super::resolution::{Resolution, StatusResolver};
use super::service::{CandidateServiceError, CandidateValidationService};

/// Shared handler state: the service plus the review queue page size.
pub struct CandidateRoutes<R, P> {
    pub service: Arc<CandidateValidationService<R, P>>,
    pub default_queue_limit: usize,
}

impl<R, P> Clone for CandidateRoutes<R, P> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            default_queue_limit: self.default_queue_limit,
        }
    }
}

/// Router builder exposing candidate lifecycle, validation, and resolution endpoints.
pub fn candidate_router<R, P>(
    service: Arc<CandidateValidationService<R, P>>,
    default_queue_limit: usize,
) -> Router
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    let state = CandidateRoutes {
        service,
        default_queue_limit,
    };

    Router::new()
        .route("/api/v1/candidates", post(register_handler::<R, P>))
        .route(
            "/api/v1/candidates/:candidate_id",
            get(status_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/submit",
            post(submit_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/validations",
            post(validation_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/override",
            post(override_handler::<R, P>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/hire",
            post(hire_handler::<R, P>),
        )
        .route("/api/v1/review-queue/:track", get(queue_handler::<R, P>))
        .route("/api/v1/status/resolve", post(resolve_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct HireRequest {
    pub actor: ReviewerId,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueueParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub validations: Vec<ValidationRecord>,
    #[serde(default)]
    pub requires_technical: bool,
}

pub(crate) async fn register_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Json(candidate): Json<NewCandidate>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    match state.service.register(candidate) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    match state.service.get(&CandidateId(candidate_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Path(candidate_id): Path<String>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    match state.service.submit_for_review(&CandidateId(candidate_id)) {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn validation_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Path(candidate_id): Path<String>,
    Json(submission): Json<ValidationSubmission>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    match state
        .service
        .record_validation(&CandidateId(candidate_id), submission)
    {
        Ok(receipt) => {
            let payload = json!({
                "validation": receipt.record,
                "previous_status": receipt.previous_status,
                "status": receipt.status,
            });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn override_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Path(candidate_id): Path<String>,
    Json(request): Json<StatusOverrideRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    match state
        .service
        .override_status(&CandidateId(candidate_id), request)
    {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn hire_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Path(candidate_id): Path<String>,
    Json(request): Json<HireRequest>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    match state
        .service
        .mark_hired(&CandidateId(candidate_id), request.actor)
    {
        Ok(record) => (StatusCode::OK, Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn queue_handler<R, P>(
    State(state): State<CandidateRoutes<R, P>>,
    Path(track): Path<String>,
    Query(params): Query<QueueParams>,
) -> Response
where
    R: CandidateRepository + 'static,
    P: ActivityPublisher + 'static,
{
    let Some(track) = ReviewTrack::parse(&track) else {
        let payload = json!({ "error": format!("unknown review track '{track}'") });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    let limit = params.limit.unwrap_or(state.default_queue_limit);
    match state.service.review_queue(track, limit) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_handler(Json(request): Json<ResolveRequest>) -> Json<Resolution> {
    Json(StatusResolver.explain(&request.validations, request.requires_technical))
}

fn error_response(error: CandidateServiceError) -> Response {
    let status = match &error {
        CandidateServiceError::Submission(SubmissionViolation::NotUnderReview { .. })
        | CandidateServiceError::InvalidTransition { .. }
        | CandidateServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        CandidateServiceError::Submission(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CandidateServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        CandidateServiceError::Repository(RepositoryError::Unavailable(_))
        | CandidateServiceError::Activity(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}
