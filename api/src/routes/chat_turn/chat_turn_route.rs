use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use context_search::prompt::{DEFAULT_COMPACT_TARGET_TOKENS, build_chat_turn, should_compact};
use tracing::{info, instrument, warn};

use crate::{
    core::{
        app_state::AppState,
        http::request_headers::{openai_key, request_id},
    },
    error_handler::{AppError, AppResult},
    routes::{
        chat_turn::{chat_turn_request::ChatTurnRequest, chat_turn_response::ChatTurnResponse},
        compact::compact_route::compact_text,
    },
};

/// Compacted reply, or `None` when compaction is unavailable or came back empty.
async fn try_compact(state: &AppState, headers: &HeaderMap, reply: &str) -> Option<String> {
    let request_id = request_id(headers);
    let client = match state.llm.client(openai_key(headers)).await {
        Ok(c) => c,
        Err(err) => {
            warn!(request_id, error = %err, "chat_turn_route: compaction skipped");
            return None;
        }
    };
    match compact_text(&client, state.llm.settings(), reply, DEFAULT_COMPACT_TARGET_TOKENS).await {
        Ok(out) => Some(out.text.trim().to_string()).filter(|t| !t.is_empty()),
        Err(err) => {
            warn!(request_id, error = %err, "chat_turn_route: compaction failed, storing full reply");
            None
        }
    }
}

/// Turns the last prompt/reply pair into a new context chunk.
#[instrument(name = "chat_turn_route", skip_all)]
pub async fn chat_turn_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(r): Json<ChatTurnRequest>,
) -> AppResult<Json<ChatTurnResponse>> {
    let reply = r.output.trim();
    if reply.is_empty() {
        return Err(AppError::bad_request("output is required"));
    }

    let compacted = if r.compact && should_compact(reply) {
        try_compact(&state, &headers, reply).await
    } else {
        None
    };

    let stored = compacted.as_deref().unwrap_or(reply);
    let chunk = build_chat_turn(&r.prompt, stored, &r.chunks)
        .ok_or_else(|| AppError::bad_request("output is required"))?;

    info!(
        request_id = request_id(&headers),
        chunk_id = %chunk.id,
        title = %chunk.title,
        compacted = compacted.is_some(),
        "chat_turn_route: chunk created"
    );

    Ok(Json(ChatTurnResponse {
        chunk,
        compacted: compacted.is_some(),
    }))
}
