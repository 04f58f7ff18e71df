use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::admins::AdminStoreError;
use crate::workflows::candidates::{CandidateServiceError, NotifyError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Candidates(CandidateServiceError),
    Admin(AdminStoreError),
    Notify(NotifyError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Candidates(err) => write!(f, "candidate workflow error: {}", err),
            AppError::Admin(err) => write!(f, "admin account error: {}", err),
            AppError::Notify(err) => write!(f, "notification error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Candidates(err) => Some(err),
            AppError::Admin(err) => Some(err),
            AppError::Notify(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Candidates(CandidateServiceError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Candidates(CandidateServiceError::NotFound(_))
            | AppError::Admin(AdminStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Admin(AdminStoreError::ProtectedAccount) => StatusCode::FORBIDDEN,
            AppError::Admin(AdminStoreError::DuplicateEmail | AdminStoreError::DuplicateUsername) => {
                StatusCode::CONFLICT
            }
            AppError::Admin(AdminStoreError::MissingField(_) | AdminStoreError::InvalidEmail) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Notify(_) | AppError::Candidates(CandidateServiceError::Notify(_)) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Candidates(CandidateServiceError::NotificationsDisabled) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Candidates(CandidateServiceError::Export(_))
            | AppError::Admin(AdminStoreError::PasswordHash(_))
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<CandidateServiceError> for AppError {
    fn from(value: CandidateServiceError) -> Self {
        Self::Candidates(value)
    }
}

impl From<AdminStoreError> for AppError {
    fn from(value: AdminStoreError) -> Self {
        Self::Admin(value)
    }
}

impl From<NotifyError> for AppError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}
