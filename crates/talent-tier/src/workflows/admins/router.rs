use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, put},
    Extension, Json, Router,
};
use serde_json::json;

use super::auth::{protect, AuthenticatedAdmin};
use super::domain::{AdminId, AdminView, NewAdmin, PasswordRotation};
use super::store::{AdminStore, AdminStoreError};

/// Admin account management. Every route requires administrator credentials.
pub fn admin_account_router(admins: Arc<AdminStore>) -> Router {
    let routes = Router::new()
        .route("/api/v1/admin/me", get(whoami_handler))
        .route(
            "/api/v1/admin/accounts",
            get(list_handler).post(create_handler),
        )
        .route("/api/v1/admin/accounts/:admin_id", delete(delete_handler))
        .route(
            "/api/v1/admin/accounts/:admin_id/password",
            put(rotate_password_handler),
        )
        .with_state(admins.clone());

    protect(routes, admins)
}

pub(crate) async fn whoami_handler(Extension(admin): Extension<AuthenticatedAdmin>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "id": admin.id, "name": admin.name })),
    )
        .into_response()
}

pub(crate) async fn list_handler(State(admins): State<Arc<AdminStore>>) -> Json<Vec<AdminView>> {
    Json(admins.load().iter().map(|account| account.view()).collect())
}

pub(crate) async fn create_handler(
    State(admins): State<Arc<AdminStore>>,
    Json(request): Json<NewAdmin>,
) -> Response {
    match tokio::task::spawn_blocking(move || admins.create(request)).await {
        Ok(Ok(account)) => (StatusCode::CREATED, Json(account.view())).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => join_failure(err),
    }
}

pub(crate) async fn delete_handler(
    State(admins): State<Arc<AdminStore>>,
    Path(admin_id): Path<u64>,
) -> Response {
    match admins.delete(AdminId(admin_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn rotate_password_handler(
    State(admins): State<Arc<AdminStore>>,
    Path(admin_id): Path<u64>,
    Json(rotation): Json<PasswordRotation>,
) -> Response {
    let rotated = tokio::task::spawn_blocking(move || {
        admins.rotate_password(AdminId(admin_id), &rotation.password)
    })
    .await;
    match rotated {
        Ok(Ok(())) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(err)) => error_response(err),
        Err(err) => join_failure(err),
    }
}

fn join_failure(err: tokio::task::JoinError) -> Response {
    tracing::error!(error = %err, "password hashing task did not complete");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal error" })),
    )
        .into_response()
}

fn error_response(err: AdminStoreError) -> Response {
    let status = match err {
        AdminStoreError::MissingField(_) | AdminStoreError::InvalidEmail => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AdminStoreError::DuplicateEmail | AdminStoreError::DuplicateUsername => {
            StatusCode::CONFLICT
        }
        AdminStoreError::ProtectedAccount => StatusCode::FORBIDDEN,
        AdminStoreError::NotFound(_) => StatusCode::NOT_FOUND,
        AdminStoreError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
