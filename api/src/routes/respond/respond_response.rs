use ai_llm_service::TokenUsage;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondResponse {
    pub output: String,
    pub usage: Option<TokenUsage>,
    pub duration_ms: u64,
    /// Cap sent to the API; the client shows usage against it.
    pub max_output_tokens: u32,
    /// `null` for models without a catalog price.
    pub estimated_cost_usd: Option<f64>,
}
