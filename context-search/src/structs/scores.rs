use serde::{Deserialize, Serialize};

/// Raw similarity of the query phrase against one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkScore {
    pub chunk_id: String,
    pub dot: f64,
    pub cosine: f64,
}

/// A chunk whose cosine similarity passed the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub chunk_id: String,
    /// Cosine similarity, 0..=1 for typical embedding models.
    pub similarity: f64,
}
