use context_search::ScenarioChunk;
use serde::Deserialize;

/// Body of `POST /api/chat-turn`.
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    #[serde(default)]
    pub prompt: String,
    /// Assistant reply to store.
    #[serde(default)]
    pub output: String,
    /// Compact long replies before storing them.
    #[serde(default)]
    pub compact: bool,
    /// Chunks currently in the client's context, used for turn numbering.
    #[serde(default)]
    pub chunks: Vec<ScenarioChunk>,
}
