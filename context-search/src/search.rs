//! Phrase search over scenario chunks.
//!
//! Every chunk is scored against the phrase; callers get the full score list
//! (for display) and the subset whose cosine similarity reaches the threshold.
//! Extra chunks supplied by the caller (user-created or edited) are embedded on
//! the fly and replace cached scenario chunks with the same id.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::{
    cache::EmbeddingCache,
    embedder::Embedder,
    errors::search_error::SearchError,
    similarity::{cosine_similarity, dot_product},
    structs::{
        scenario::{ScenarioChunk, ScenarioPack},
        scores::{ChunkScore, SearchHit},
    },
};

pub const DEFAULT_MIN_SIMILARITY: f64 = 0.75;
/// Upper bound on caller-supplied chunks per search.
pub const MAX_EXTRA_CHUNKS: usize = 50;

/// Threshold to use: `requested` when it lies in `[0, 1]`, the default otherwise.
pub fn resolve_threshold(requested: Option<f64>) -> f64 {
    requested
        .filter(|v| (0.0..=1.0).contains(v))
        .unwrap_or(DEFAULT_MIN_SIMILARITY)
}

/// Keeps entries that carry string `id`, `title` and `body`, at most
/// [`MAX_EXTRA_CHUNKS`]. Anything that is not an array yields nothing.
pub fn sanitize_extra_chunks(raw: Option<&Value>) -> Vec<ScenarioChunk> {
    let Some(Value::Array(items)) = raw else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let field = |name: &str| item.get(name).and_then(Value::as_str).map(str::to_string);
            Some(ScenarioChunk {
                id: field("id")?,
                title: field("title")?,
                body: field("body")?,
            })
        })
        .take(MAX_EXTRA_CHUNKS)
        .collect()
}

/// Scores every chunk (scenario + extras) against `phrase`, best cosine first.
///
/// Scenario vectors come from `cache`; the phrase and extras are embedded
/// concurrently with the cache refresh.
pub async fn compute_all_similarities<E>(
    cache: &EmbeddingCache,
    embedder: &E,
    scenario: &ScenarioPack,
    phrase: &str,
    model: &str,
    extra_chunks: &[ScenarioChunk],
) -> Result<Vec<ChunkScore>, SearchError>
where
    E: Embedder + ?Sized,
{
    let extra_texts: Vec<String> = extra_chunks
        .iter()
        .map(ScenarioChunk::embedding_text)
        .collect();

    let (cached, query, extra_vectors) = tokio::try_join!(
        cache.chunk_embeddings(embedder, scenario, model),
        embedder.embed(model, phrase),
        embedder.embed_batch(model, &extra_texts),
    )?;

    let overridden: HashSet<&str> = extra_chunks.iter().map(|c| c.id.as_str()).collect();

    let score = |chunk_id: &str, vector: &[f32]| ChunkScore {
        chunk_id: chunk_id.to_string(),
        dot: dot_product(&query, vector),
        cosine: cosine_similarity(&query, vector),
    };

    let mut all: Vec<ChunkScore> = cached
        .iter()
        .filter(|(id, _)| !overridden.contains(id.as_str()))
        .map(|(id, v)| score(id.as_str(), v.as_slice()))
        .collect();
    all.extend(
        extra_chunks
            .iter()
            .zip(extra_vectors.iter())
            .map(|(c, v)| score(c.id.as_str(), v.as_slice())),
    );

    all.sort_by(|a, b| b.cosine.total_cmp(&a.cosine));

    debug!(
        scenario = %scenario.id,
        model,
        scored = all.len(),
        extras = extra_chunks.len(),
        "computed chunk similarities"
    );

    Ok(all)
}

/// Hits with `cosine >= min_similarity`, keeping the input order.
///
/// Also used to re-apply a new tolerance to scores from an earlier search
/// without calling the embedding API again.
pub fn filter_by_threshold(scores: &[ChunkScore], min_similarity: f64) -> Vec<SearchHit> {
    scores
        .iter()
        .filter(|s| s.cosine >= min_similarity)
        .map(|s| SearchHit {
            chunk_id: s.chunk_id.clone(),
            similarity: s.cosine,
        })
        .collect()
}

/// Chunks similar to `phrase` at or above `min_similarity`, best first.
pub async fn search_chunks_by_phrase<E>(
    cache: &EmbeddingCache,
    embedder: &E,
    scenario: &ScenarioPack,
    phrase: &str,
    min_similarity: f64,
    model: &str,
    extra_chunks: &[ScenarioChunk],
) -> Result<Vec<SearchHit>, SearchError>
where
    E: Embedder + ?Sized,
{
    let all =
        compute_all_similarities(cache, embedder, scenario, phrase, model, extra_chunks).await?;
    Ok(filter_by_threshold(&all, min_similarity))
}
