//! HTTP Basic authentication for administrator routes.
//!
//! Every protected request carries `Authorization: Basic base64(username:password)`,
//! checked against the admin store. There is no server-side session.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use super::domain::AdminId;
use super::store::AdminStore;

const CHALLENGE: &str = "Basic realm=\"talent-tier admin\", charset=\"UTF-8\"";

/// Administrator resolved for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAdmin {
    pub id: AdminId,
    pub name: String,
}

/// Wrap every route in `router` with the admin credential check.
pub fn protect(router: Router, admins: Arc<AdminStore>) -> Router {
    router.route_layer(middleware::from_fn_with_state(admins, require_admin))
}

pub async fn require_admin(
    State(admins): State<Arc<AdminStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some((username, password)) = basic_credentials(request.headers()) else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_credentials",
            "admin route requested without credentials"
        );
        return unauthorized();
    };

    // argon2 verification is CPU-bound.
    let verified =
        tokio::task::spawn_blocking(move || admins.find_by_credentials(&username, &password)).await;

    match verified {
        Ok(Some(account)) => {
            request.extensions_mut().insert(AuthenticatedAdmin {
                id: account.id,
                name: account.name,
            });
            next.run(request).await
        }
        Ok(None) => {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_credentials",
                "admin authentication failed"
            );
            unauthorized()
        }
        Err(err) => {
            tracing::error!(error = %err, "credential check did not complete");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

/// Decode `Authorization: Basic ...` into username and password.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn unauthorized() -> Response {
    let mut response = (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("valid header"),
        );
        headers
    }

    #[test]
    fn decodes_basic_credentials() {
        let encoded = STANDARD.encode("sirneo:Neo@2025:extra");
        let parsed = basic_credentials(&headers(&format!("Basic {encoded}")));
        assert_eq!(
            parsed,
            Some(("sirneo".to_string(), "Neo@2025:extra".to_string()))
        );
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert_eq!(basic_credentials(&headers("Bearer abc")), None);
        assert_eq!(basic_credentials(&headers("Basic !!!")), None);
        let no_colon = STANDARD.encode("sirneo");
        assert_eq!(basic_credentials(&headers(&format!("Basic {no_colon}"))), None);
        assert_eq!(basic_credentials(&HeaderMap::new()), None);
    }
}
