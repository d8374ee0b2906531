//! Response middleware that redacts JSON bodies
//!
//! The handler runs first; its response is buffered, walked with the
//! policy resolved for this request and re-serialized. Any failure withholds
//! the original body and answers 500 instead.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::server::AppState;

pub const FILTERED_HEADER: HeaderName = HeaderName::from_static("x-privacy-filtered");
pub const FAILED_HEADER: HeaderName = HeaderName::from_static("x-privacy-filter");

pub async fn privacy_filter(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let server = &state.server;
    if !server.config.privacy.enabled || !is_json(&response) {
        return response;
    }

    let policy = match server.request_policy() {
        Ok(policy) => policy,
        Err(e) => return filter_failed(&e.to_string()),
    };

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, server.config.server.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => return filter_failed(&format!("could not buffer response body: {}", e)),
    };

    let (value, summary) = match server.redactor.walk_bytes(&bytes, &policy) {
        Ok(walked) => walked,
        Err(e) => return filter_failed(&e.to_string()),
    };
    let body = match serde_json::to_vec(&value) {
        Ok(body) => body,
        Err(e) => return filter_failed(&e.to_string()),
    };

    let total: usize = summary.values().sum();
    debug!(total, "Filtered JSON response");

    parts.headers.remove(header::CONTENT_LENGTH);
    parts
        .headers
        .insert(FILTERED_HEADER, HeaderValue::from(total as u64));
    Response::from_parts(parts, Body::from(body))
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

fn filter_failed(reason: &str) -> Response {
    error!("Privacy filter failed, withholding response: {}", reason);
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "privacy_filter_failed",
            "reason": reason,
        })),
    )
        .into_response();
    response
        .headers_mut()
        .insert(FAILED_HEADER, HeaderValue::from_static("failed"));
    response
}
