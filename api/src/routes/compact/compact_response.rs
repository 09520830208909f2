use ai_llm_service::TokenUsage;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactResponse {
    pub compact: String,
    pub usage: Option<TokenUsage>,
    pub duration_ms: u64,
}
