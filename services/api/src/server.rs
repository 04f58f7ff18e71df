use crate::cli::ServeArgs;
use crate::infra::{smtp_notifier, AppState};
use crate::routes::with_candidate_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_tier::config::AppConfig;
use talent_tier::error::AppError;
use talent_tier::storage::StorageBackend;
use talent_tier::telemetry;
use talent_tier::workflows::admins::AdminStore;
use talent_tier::workflows::candidates::{CandidateService, CandidateStore};
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

    let backend = StorageBackend::detect(&config.storage);
    let durable = backend.is_durable();
    let candidates = Arc::new(CandidateStore::open(backend.clone()));
    let admins = Arc::new(AdminStore::open(backend, &config.admin_seed)?);
    let notifier = smtp_notifier(config.notifications.as_ref());
    let candidate_service = Arc::new(CandidateService::new(candidates, notifier));

    let app = with_candidate_routes(candidate_service, admins)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, durable, "talent tier service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
