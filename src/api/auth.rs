//! HTTP Basic authentication for the admin routes.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use tracing::warn;

use crate::config::AdminCredentials;

use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

const CHALLENGE: &str = "Basic realm=\"tax-engine-admin\"";

/// Rejects requests whose `Authorization: Basic` header does not match the
/// configured admin credentials.
///
/// When no credentials are configured every request is rejected.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let authorized = match (state.admin(), basic_credentials(req.headers())) {
        (Some(expected), Some((username, password))) => {
            matches_credentials(expected, &username, &password)
        }
        _ => false,
    };

    if authorized {
        return next.run(req).await;
    }

    warn!(path = %req.uri().path(), "Unauthorized admin request");
    let mut response = ApiErrorResponse {
        status: StatusCode::UNAUTHORIZED,
        error: ApiError::unauthorized(),
    }
    .into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}

/// Decodes the username and password from a Basic `Authorization` header.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))?;

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

fn matches_credentials(expected: &AdminCredentials, username: &str, password: &str) -> bool {
    expected.username == username && expected.password == password
}
