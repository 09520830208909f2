//! Semantic search over scenario context chunks.
//!
//! Scenario packs supply the chunks; an [`Embedder`] turns chunk text and the
//! query phrase into vectors; [`EmbeddingCache`] keeps chunk vectors keyed by
//! content hash so only edited chunks are re-embedded; [`search`] scores them
//! by cosine and dot product and filters by a similarity threshold.

pub mod cache;
pub mod embedder;
pub mod errors;
pub mod hash;
pub mod prompt;
pub mod scenarios;
pub mod search;
pub mod similarity;
pub mod structs;

pub use cache::EmbeddingCache;
pub use embedder::Embedder;
pub use errors::search_error::SearchError;
pub use scenarios::ScenarioRegistry;
pub use structs::{
    scenario::{ScenarioChunk, ScenarioPack, ScenarioSummary},
    scores::{ChunkScore, SearchHit},
};
