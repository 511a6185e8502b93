use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCandidateRepository, TracingActivityPublisher};
use crate::routes::with_candidate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use recruit_ai::config::AppConfig;
use recruit_ai::error::AppError;
use recruit_ai::telemetry;
use recruit_ai::workflows::candidates::CandidateValidationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryCandidateRepository::default());
    let activity = Arc::new(TracingActivityPublisher);
    let candidate_service = Arc::new(CandidateValidationService::new(repository, activity));

    let app = with_candidate_routes(candidate_service, config.review.queue_limit)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        queue_limit = config.review.queue_limit,
        "candidate validation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
