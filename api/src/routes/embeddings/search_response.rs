use context_search::{ChunkScore, SearchHit};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Chunks at or above the threshold, best first.
    pub results: Vec<SearchHit>,
    /// Every scored chunk, best first, so the client can re-filter locally.
    pub scores: Vec<ChunkScore>,
}
