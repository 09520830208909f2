//! Header accessors shared by handlers and middleware.

use axum::http::HeaderMap;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request OpenAI key. Takes precedence over `OPENAI_API_KEY`.
pub const OPENAI_KEY_HEADER: &str = "x-openai-key";

/// Request id attached by the request-id middleware, `"-"` when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
}

/// Non-blank key override sent by the client, if any.
pub fn openai_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(OPENAI_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn reads_headers_with_fallbacks() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "-");
        assert_eq!(openai_key(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-1"));
        headers.insert(OPENAI_KEY_HEADER, HeaderValue::from_static("  sk-user  "));
        assert_eq!(request_id(&headers), "req-1");
        assert_eq!(openai_key(&headers), Some("sk-user"));

        headers.insert(OPENAI_KEY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(openai_key(&headers), None);
    }
}
