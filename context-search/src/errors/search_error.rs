//! Unified error type for the context-search crate.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Errors produced while loading scenarios or scoring chunks.
#[derive(Debug, Error)]
pub enum SearchError {
    // ── Scenario packs ───────────────────────────────────────────────────────
    /// A scenario directory or file could not be read.
    #[error("failed to read scenarios from {path}: {source}")]
    ScenarioIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scenario file is not a valid pack.
    #[error("invalid scenario pack '{name}': {source}")]
    ScenarioParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Two packs share an id.
    #[error("duplicate scenario id: {0}")]
    DuplicateScenario(String),

    // ── Embeddings backend ──────────────────────────────────────────────────
    /// The OpenAI client failed.
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    /// Any other embedder failed or returned something unusable.
    #[error("embedding error: {0}")]
    Embedding(String),
}
