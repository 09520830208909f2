use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use crate::core::http::request_headers::REQUEST_ID_HEADER;

fn new_request_id() -> String {
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Keeps a client-supplied `X-Request-Id` or assigns one, exposes it to
/// handlers and echoes it on the response.
pub async fn request_id_layer(mut req: Request<Body>, next: Next) -> Response {
    let supplied = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| HeaderValue::from_str(v).ok());

    let id = match supplied {
        Some(v) => v,
        // Digits only, always a valid header value.
        None => HeaderValue::from_str(&new_request_id())
            .unwrap_or_else(|_| HeaderValue::from_static("req-unknown")),
    };
    req.headers_mut().insert(REQUEST_ID_HEADER, id.clone());

    let mut res = next.run(req).await;
    res.headers_mut().insert(REQUEST_ID_HEADER, id);
    res
}
