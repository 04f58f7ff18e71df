use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{CandidateFilter, CandidateId, CandidateView, RegistrationSubmission};
use super::export::{CsvExport, ExportFormat};
use super::notify::NotificationSender;
use super::service::{CandidateService, CandidateServiceError};
use super::tiering::{Tier, TierDefinition, TIER_DEFINITIONS};
use crate::workflows::admins::{protect, AdminStore};

/// Public endpoints: registration, listing, detail, and tier definitions.
pub fn candidate_router<N>(service: Arc<CandidateService<N>>) -> Router
where
    N: NotificationSender + 'static,
{
    Router::new()
        .route(
            "/api/v1/candidates",
            post(register_handler::<N>).get(list_handler::<N>),
        )
        .route("/api/v1/candidates/:candidate_id", get(detail_handler::<N>))
        .route("/api/v1/tiers", get(tiers_handler))
        .with_state(service)
}

/// Administrator endpoints: deletion, notification, analytics, and export.
pub fn candidate_admin_router<N>(
    service: Arc<CandidateService<N>>,
    admins: Arc<AdminStore>,
) -> Router
where
    N: NotificationSender + 'static,
{
    let routes = Router::new()
        .route(
            "/api/v1/candidates/:candidate_id",
            axum::routing::delete(delete_handler::<N>),
        )
        .route(
            "/api/v1/candidates/:candidate_id/notify",
            post(notify_handler::<N>),
        )
        .route("/api/v1/admin/summary", get(summary_handler::<N>))
        .route("/api/v1/admin/export", get(export_handler::<N>))
        .with_state(service);

    protect(routes, admins)
}

// Query strings arrive as text, so the filter fields are spelled out instead of flattened.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ExportQuery {
    tier: Option<Tier>,
    search: Option<String>,
    format: ExportFormat,
}

impl ExportQuery {
    fn filter(&self) -> CandidateFilter {
        CandidateFilter {
            tier: self.tier,
            search: self.search.clone(),
        }
    }
}

pub(crate) async fn register_handler<N>(
    State(service): State<Arc<CandidateService<N>>>,
    Json(submission): Json<RegistrationSubmission>,
) -> Response
where
    N: NotificationSender + 'static,
{
    // Storage writes and the result email both block; keep them off the async workers.
    match run_blocking(move || service.register(submission)).await {
        Ok(Ok(record)) => (StatusCode::CREATED, Json(record.view())).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn list_handler<N>(
    State(service): State<Arc<CandidateService<N>>>,
    Query(filter): Query<CandidateFilter>,
) -> Json<Vec<CandidateView>>
where
    N: NotificationSender + 'static,
{
    Json(service.list(&filter).iter().map(|record| record.view()).collect())
}

pub(crate) async fn detail_handler<N>(
    State(service): State<Arc<CandidateService<N>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    N: NotificationSender + 'static,
{
    match service.get(CandidateId(candidate_id)) {
        Ok(record) => (StatusCode::OK, Json(record.view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn tiers_handler() -> Json<&'static [TierDefinition]> {
    Json(&TIER_DEFINITIONS[..])
}

pub(crate) async fn delete_handler<N>(
    State(service): State<Arc<CandidateService<N>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    N: NotificationSender + 'static,
{
    match service.delete(CandidateId(candidate_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notify_handler<N>(
    State(service): State<Arc<CandidateService<N>>>,
    Path(candidate_id): Path<u64>,
) -> Response
where
    N: NotificationSender + 'static,
{
    match run_blocking(move || service.notify(CandidateId(candidate_id))).await {
        Ok(Ok(())) => (StatusCode::ACCEPTED, Json(json!({ "status": "sent" }))).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn summary_handler<N>(State(service): State<Arc<CandidateService<N>>>) -> Response
where
    N: NotificationSender + 'static,
{
    (StatusCode::OK, Json(service.summary())).into_response()
}

pub(crate) async fn export_handler<N>(
    State(service): State<Arc<CandidateService<N>>>,
    Query(query): Query<ExportQuery>,
) -> Response
where
    N: NotificationSender + 'static,
{
    let today = Utc::now().date_naive();
    match service.export(&query.filter(), query.format, today) {
        Ok(export) => csv_response(export),
        Err(err) => error_response(err),
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, Response>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        tracing::error!(error = %err, "candidate task did not complete");
        let payload = json!({ "error": "internal error" });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    })
}

fn csv_response(export: CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.file_name);
    let mut response = (StatusCode::OK, export.body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CsvExport::CONTENT_TYPE),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

fn error_response(err: CandidateServiceError) -> Response {
    match err {
        CandidateServiceError::Validation(errors) => {
            let payload = json!({
                "error": "Validation failed. Please check the fields.",
                "fields": errors.fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        CandidateServiceError::NotFound(_) => {
            let payload = json!({ "error": "candidate not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        CandidateServiceError::NotificationsDisabled => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        CandidateServiceError::Notify(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
        CandidateServiceError::Export(_) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
