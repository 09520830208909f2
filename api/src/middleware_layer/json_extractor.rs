use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error_handler::ErrorBody;

async fn take_body(res: Response) -> (axum::http::response::Parts, Bytes) {
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    (parts, bytes)
}

fn is_json(parts: &axum::http::response::Parts) -> bool {
    parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}

fn hint_for(message: &str) -> Option<String> {
    if message.contains("expected a sequence") {
        Some("Expected an array for this field (e.g. [\"item1\", \"item2\"]).".into())
    } else if message.contains("expected a map") || message.contains("expected struct") {
        Some("Expected a JSON object here (e.g. { \"field\": \"value\" }).".into())
    } else if message.contains("Content-Type") {
        Some("Send the body with `Content-Type: application/json`.".into())
    } else if message.contains("EOF while parsing") || message.contains("syntax") {
        Some("The request body is not valid JSON.".into())
    } else {
        None
    }
}

/// Error body for a plain-text extractor rejection.
pub fn rejection_body(status: StatusCode, message: &str) -> ErrorBody {
    let code = match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        _ => "UNPROCESSABLE_ENTITY",
    };
    ErrorBody {
        error: message.trim().to_string(),
        code,
        hint: hint_for(message),
    }
}

/// Rewrites axum's plain-text JSON rejections (400/415/422) into the API's
/// JSON error shape. Bodies that are already JSON pass through untouched.
pub async fn json_error_mapper(req: Request<Body>, next: Next) -> Response {
    let res = next.run(req).await;
    let status = res.status();

    if !matches!(
        status,
        StatusCode::BAD_REQUEST
            | StatusCode::UNSUPPORTED_MEDIA_TYPE
            | StatusCode::UNPROCESSABLE_ENTITY
    ) {
        return res;
    }

    let (mut parts, bytes) = take_body(res).await;
    if is_json(&parts) {
        return Response::from_parts(parts, bytes.into());
    }

    let original = String::from_utf8_lossy(&bytes);
    debug!(status = status.as_u16(), rejection = %original.trim(), "mapping extractor rejection");

    let body = match serde_json::to_vec(&rejection_body(status, &original)) {
        Ok(v) => v,
        Err(_) => bytes.to_vec(),
    };

    parts.headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    parts.headers.remove(header::CONTENT_LENGTH);

    Response::from_parts(parts, body.into())
}
