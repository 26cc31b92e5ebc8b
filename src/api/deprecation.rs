//! Deprecation notices for the v1 surface.
//!
//! Every v1 response gets RFC 8594 style headers, and JSON object bodies get
//! a `deprecation` member pointing at the v2 replacement.

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{ApiError, AppState};

const SUCCESSOR: &str = "/api/v2/movies";
const WARNING: &str = "299 - \"API v1 is deprecated. Please use API v2 instead.\"";

/// Notices for routes mounted under `/api/v1`.
pub async fn versioned(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    annotate(&state, false, request, next).await
}

/// Notices for the same routes mounted without a version segment.
pub async fn unversioned(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    annotate(&state, true, request, next).await
}

async fn annotate(state: &AppState, unversioned: bool, request: Request, next: Next) -> Response {
    let sunset = state.config().read().await.api.v1_sunset.clone();

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    insert_headers(&mut parts.headers, &sunset, unversioned);

    let is_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if !is_json {
        return Response::from_parts(parts, body);
    }

    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::internal(format!("Failed to buffer v1 body: {e}")).into_response(),
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(with_notice(bytes, &sunset)))
}

fn insert_headers(headers: &mut HeaderMap, sunset: &str, unversioned: bool) {
    headers.insert("Deprecation", HeaderValue::from_static("true"));
    if let Ok(value) = HeaderValue::from_str(sunset) {
        headers.insert("Sunset", value);
    }
    headers.insert(
        header::LINK,
        HeaderValue::from_static("</api/v2/movies>; rel=\"successor-version\""),
    );
    headers.insert(header::WARNING, HeaderValue::from_static(WARNING));
    if unversioned {
        headers.insert("X-Deprecated", HeaderValue::from_static("true"));
    }
}

/// Adds the `deprecation` member to a JSON object body. Anything else is
/// returned untouched.
fn with_notice(bytes: Bytes, sunset: &str) -> Bytes {
    let Ok(Value::Object(mut body)) = serde_json::from_slice::<Value>(&bytes) else {
        return bytes;
    };

    body.insert(
        "deprecation".to_string(),
        json!({
            "warning": "API v1 is deprecated",
            "message": "Please use API v2 instead",
            "sunset": sunset,
            "successor": SUCCESSOR,
        }),
    );

    serde_json::to_vec(&body).map_or(bytes, Bytes::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_added_to_objects_only() {
        let out = with_notice(Bytes::from_static(br#"{"success":true}"#), "2024-12-31");
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["deprecation"]["sunset"], "2024-12-31");
        assert_eq!(value["deprecation"]["successor"], SUCCESSOR);

        let out = with_notice(Bytes::from_static(b"[1,2]"), "2024-12-31");
        assert_eq!(&out[..], b"[1,2]");
    }

    #[test]
    fn test_headers() {
        let mut headers = HeaderMap::new();
        insert_headers(&mut headers, "2024-12-31", true);
        assert_eq!(headers["Deprecation"], "true");
        assert_eq!(headers["Sunset"], "2024-12-31");
        assert_eq!(headers["X-Deprecated"], "true");
        assert!(headers[header::WARNING].to_str().unwrap().starts_with("299"));

        let mut headers = HeaderMap::new();
        insert_headers(&mut headers, "2024-12-31", false);
        assert!(headers.get("X-Deprecated").is_none());
    }
}
