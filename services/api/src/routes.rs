use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use talent_tier::workflows::admins::{admin_account_router, AdminStore};
use talent_tier::workflows::candidates::{
    candidate_admin_router, candidate_router, CandidateService, NotificationSender,
};

pub(crate) fn with_candidate_routes<N>(
    service: Arc<CandidateService<N>>,
    admins: Arc<AdminStore>,
) -> axum::Router
where
    N: NotificationSender + 'static,
{
    candidate_router(service.clone())
        .merge(candidate_admin_router(service, admins.clone()))
        .merge(admin_account_router(admins))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use talent_tier::config::AdminSeedConfig;
    use talent_tier::storage::StorageBackend;
    use talent_tier::workflows::admins::CredentialHasher;
    use talent_tier::workflows::candidates::{CandidateStore, SmtpNotifier};
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let store = Arc::new(CandidateStore::open(StorageBackend::Memory));
        let service = Arc::new(CandidateService::<SmtpNotifier>::new(store, None));
        let hasher = CredentialHasher::with_cost(64, 1).expect("cheap argon2 params");
        let admins = Arc::new(
            AdminStore::with_hasher(StorageBackend::Memory, &AdminSeedConfig::default(), hasher)
                .expect("admin store"),
        );
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_candidate_routes(service, admins).layer(Extension(state))
    }

    async fn status_of(router: axum::Router, request: Request<Body>) -> StatusCode {
        router
            .oneshot(request)
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn health_and_readiness_report_state() {
        let get = |uri: &str| Request::get(uri).body(Body::empty()).expect("request");

        assert_eq!(status_of(app(false), get("/health")).await, StatusCode::OK);
        assert_eq!(
            status_of(app(false), get("/ready")).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status_of(app(true), get("/ready")).await, StatusCode::OK);
        assert_eq!(status_of(app(true), get("/metrics")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn public_and_admin_methods_share_candidate_paths() {
        let get = Request::get("/api/v1/candidates/1")
            .body(Body::empty())
            .expect("request");
        assert_eq!(status_of(app(true), get).await, StatusCode::OK);

        let delete = Request::delete("/api/v1/candidates/1")
            .body(Body::empty())
            .expect("request");
        assert_eq!(status_of(app(true), delete).await, StatusCode::UNAUTHORIZED);

        let accounts = Request::get("/api/v1/admin/accounts")
            .body(Body::empty())
            .expect("request");
        assert_eq!(status_of(app(true), accounts).await, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn readiness_flag_is_shared() {
        let flag = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: flag.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        flag.store(true, Ordering::Release);
        assert!(state.readiness.load(Ordering::Acquire));
    }
}
