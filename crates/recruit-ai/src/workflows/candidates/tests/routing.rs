use super::common::*;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::candidates::domain::ReviewTrack;
use crate::workflows::candidates::domain::ValidationDecision::{Approved, Rejected};
use crate::workflows::candidates::router::{
    queue_handler, status_handler, validation_handler, CandidateRoutes, QueueParams,
};
use crate::workflows::candidates::{candidate_router, CandidateValidationService};

fn routes(
    service: CandidateValidationService<MemoryRepository, MemoryActivity>,
) -> CandidateRoutes<MemoryRepository, MemoryActivity> {
    CandidateRoutes {
        service: Arc::new(service),
        default_queue_limit: 25,
    }
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn register_route_creates_draft_candidates() {
    let (service, _, _) = build_service();
    let router = candidate_router(Arc::new(service), 25);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/candidates",
            json!({
                "full_name": "Ines Moreau",
                "position": "Data Engineer",
                "is_technical_position": true
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("draft")));
    assert_eq!(payload.get("is_technical_position"), Some(&json!(true)));
    assert!(payload.get("candidate_id").is_some());
}

#[tokio::test]
async fn validation_handler_returns_new_status() {
    let (service, _, _) = build_service();
    let candidate = candidate_under_review(&service, true);
    let state = routes(service);

    let response = validation_handler(
        State(state),
        Path(candidate.profile.candidate_id.0.clone()),
        axum::Json(submission("tech-1", ReviewTrack::Tech, Approved)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("previous_status"), Some(&json!("pending")));
    assert_eq!(payload.get("status"), Some(&json!("pending_sales")));
    assert_eq!(
        payload
            .get("validation")
            .and_then(|validation| validation.get("track")),
        Some(&json!("tech"))
    );
}

#[tokio::test]
async fn validation_handler_returns_unprocessable_for_unjustified_rejection() {
    let (service, _, _) = build_service();
    let candidate = candidate_under_review(&service, false);

    let response = validation_handler(
        State(routes(service)),
        Path(candidate.profile.candidate_id.0.clone()),
        axum::Json(submission("sales-1", ReviewTrack::Sales, Rejected)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("justification"));
}

#[tokio::test]
async fn validation_handler_returns_conflict_for_closed_candidates() {
    let (service, _, _) = build_service();
    let candidate = candidate_under_review(&service, false);
    service
        .record_validation(
            &candidate.profile.candidate_id,
            submission("sales-1", ReviewTrack::Sales, Approved),
        )
        .expect("validation recorded");

    let response = validation_handler(
        State(routes(service)),
        Path(candidate.profile.candidate_id.0.clone()),
        axum::Json(submission("sales-2", ReviewTrack::Sales, Approved)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn status_handler_returns_not_found_for_unknown_candidates() {
    let (service, _, _) = build_service();

    let response = status_handler(State(routes(service)), Path("cand-missing".to_string())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_handler_returns_internal_error_when_repository_is_down() {
    let service = CandidateValidationService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryActivity::default()),
    );
    let state = CandidateRoutes {
        service: Arc::new(service),
        default_queue_limit: 25,
    };

    let response = status_handler(State(state), Path("cand-1".to_string())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn queue_handler_rejects_unknown_tracks() {
    let (service, _, _) = build_service();

    let response = queue_handler(
        State(routes(service)),
        Path("legal".to_string()),
        Query(QueueParams::default()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn queue_route_lists_candidates_for_track() {
    let (service, _, _) = build_service();
    let waiting = candidate_under_review(&service, true);
    let router = candidate_router(Arc::new(service), 25);

    let response = router
        .oneshot(
            Request::get("/api/v1/review-queue/tech?limit=5")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].get("candidate_id"),
        Some(&json!(waiting.profile.candidate_id.0))
    );
}

#[tokio::test]
async fn resolve_route_is_stateless() {
    let (service, repository, activity) = build_service();
    let router = candidate_router(Arc::new(service), 25);
    let history = vec![sales(Approved, 1), tech(Rejected, 2)];

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/status/resolve",
            json!({ "validations": history, "requires_technical": true }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("status"), Some(&json!("rejected")));
    assert_eq!(payload.get("tech"), Some(&json!("rejected")));
    assert!(repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .is_empty());
    assert!(activity.events().is_empty());
}

#[tokio::test]
async fn lifecycle_routes_cover_submit_override_and_hire() {
    let (service, _, _) = build_service();
    let draft = service
        .register(new_candidate(false))
        .expect("registration succeeds");
    let id = draft.profile.candidate_id.0.clone();
    let router = candidate_router(Arc::new(service), 25);

    let submitted = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/candidates/{id}/submit"),
            json!({}),
        ))
        .await
        .expect("route executes");
    assert_eq!(submitted.status(), StatusCode::OK);

    let early_hire = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/candidates/{id}/hire"),
            json!({ "actor": "hr-1" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(early_hire.status(), StatusCode::CONFLICT);

    let overridden = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/candidates/{id}/override"),
            json!({
                "actor": "manager-1",
                "status": "validated",
                "reason": "client accepted profile directly"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(overridden.status(), StatusCode::OK);
    let payload = read_json_body(overridden).await;
    assert_eq!(payload.get("status"), Some(&json!("validated")));

    let hired = router
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/candidates/{id}/hire"),
            json!({ "actor": "hr-1" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(hired.status(), StatusCode::OK);
    let payload = read_json_body(hired).await;
    assert_eq!(payload.get("status"), Some(&json!("hired")));
}
