use context_search::ScenarioChunk;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChatTurnResponse {
    pub chunk: ScenarioChunk,
    /// True when the stored reply is the compacted one.
    pub compacted: bool,
}
