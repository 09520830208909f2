//! In-memory embedding cache for scenario chunks.
//!
//! Keyed by `"{scenario_id}|{model}"`, then by chunk id. Each entry keeps the
//! content hash of the text it was computed from; a chunk is re-embedded only
//! when it is missing or its hash changed. The lock is never held across a
//! network call.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    embedder::Embedder, errors::search_error::SearchError, hash::content_hash,
    structs::scenario::ScenarioPack,
};

#[derive(Debug, Clone)]
struct CacheEntry {
    vector: Vec<f32>,
    hash: String,
}

type ChunkEntries = HashMap<String, CacheEntry>;

#[derive(Debug, Default)]
pub struct EmbeddingCache {
    inner: RwLock<HashMap<String, ChunkEntries>>,
}

fn cache_key(scenario_id: &str, model: &str) -> String {
    format!("{scenario_id}|{model}")
}

struct Pending {
    id: String,
    text: String,
    hash: String,
}

impl EmbeddingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vectors for every chunk of `scenario` under `model`, in chunk order.
    ///
    /// Missing or stale chunks are embedded in a single batch first.
    ///
    /// # Errors
    /// Propagates embedder failures; the cache is left unchanged in that case.
    pub async fn chunk_embeddings<E>(
        &self,
        embedder: &E,
        scenario: &ScenarioPack,
        model: &str,
    ) -> Result<Vec<(String, Vec<f32>)>, SearchError>
    where
        E: Embedder + ?Sized,
    {
        let key = cache_key(&scenario.id, model);

        let pending: Vec<Pending> = {
            let guard = self.inner.read().await;
            let entries = guard.get(&key);
            scenario
                .chunks
                .iter()
                .filter_map(|c| {
                    let text = c.embedding_text();
                    let hash = content_hash(&text);
                    let fresh = entries
                        .and_then(|e| e.get(&c.id))
                        .is_some_and(|entry| entry.hash == hash);
                    (!fresh).then(|| Pending {
                        id: c.id.clone(),
                        text,
                        hash,
                    })
                })
                .collect()
        };

        if !pending.is_empty() {
            let texts: Vec<String> = pending.iter().map(|p| p.text.clone()).collect();
            let vectors = embedder.embed_batch(model, &texts).await?;
            if vectors.len() != pending.len() {
                return Err(SearchError::Embedding(format!(
                    "expected {} vectors, got {}",
                    pending.len(),
                    vectors.len()
                )));
            }

            let mut guard = self.inner.write().await;
            let entries = guard.entry(key.clone()).or_default();
            for (p, vector) in pending.into_iter().zip(vectors) {
                entries.insert(
                    p.id,
                    CacheEntry {
                        vector,
                        hash: p.hash,
                    },
                );
            }
            info!(
                scenario = %scenario.id,
                model,
                embedded = texts.len(),
                "refreshed chunk embeddings"
            );
        } else {
            debug!(scenario = %scenario.id, model, "chunk embeddings served from cache");
        }

        let guard = self.inner.read().await;
        let entries = guard.get(&key);
        Ok(scenario
            .chunks
            .iter()
            .filter_map(|c| {
                entries
                    .and_then(|e| e.get(&c.id))
                    .map(|entry| (c.id.clone(), entry.vector.clone()))
            })
            .collect())
    }

    /// Number of cached chunk vectors across all scenario/model keys.
    pub async fn len(&self) -> usize {
        self.inner.read().await.values().map(HashMap::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::{
        sync::{Barrier, Notify},
        time::timeout,
    };

    use super::*;
    use crate::{
        embedder::testing::{FailingEmbedder, KeywordEmbedder},
        structs::scenario::ScenarioChunk,
    };

    fn pack(chunks: &[(&str, &str, &str)]) -> ScenarioPack {
        ScenarioPack {
            id: "hr".into(),
            name: "HR".into(),
            sample_prompt: String::new(),
            chunks: chunks
                .iter()
                .map(|(id, title, body)| ScenarioChunk {
                    id: id.to_string(),
                    title: title.to_string(),
                    body: body.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn second_call_hits_cache() {
        let emb = KeywordEmbedder::new(&["vacation", "sick"]);
        let cache = EmbeddingCache::new();
        let p = pack(&[
            ("a", "Vacation", "vacation days"),
            ("b", "Sick", "sick leave"),
        ]);

        let first = cache.chunk_embeddings(&emb, &p, "m").await.unwrap();
        let second = cache.chunk_embeddings(&emb, &p, "m").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0], ("a".to_string(), vec![2.0, 0.0]));
        assert_eq!(*emb.batch_calls.lock().unwrap(), 1);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn edited_chunk_is_reembedded_alone() {
        let emb = KeywordEmbedder::new(&["vacation", "sick"]);
        let cache = EmbeddingCache::new();
        let p = pack(&[
            ("a", "Vacation", "vacation days"),
            ("b", "Sick", "sick leave"),
        ]);
        cache.chunk_embeddings(&emb, &p, "m").await.unwrap();

        let edited = pack(&[
            ("a", "Vacation", "vacation days"),
            ("b", "Sick", "sick leave, sick notes"),
        ]);
        let out = cache.chunk_embeddings(&emb, &edited, "m").await.unwrap();

        assert_eq!(out[1], ("b".to_string(), vec![0.0, 3.0]));
        assert_eq!(*emb.batch_calls.lock().unwrap(), 2);
        let seen = emb.seen();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[2], "Sick\n\nsick leave, sick notes");
    }

    #[tokio::test]
    async fn models_are_cached_separately() {
        let emb = KeywordEmbedder::new(&["vacation"]);
        let cache = EmbeddingCache::new();
        let p = pack(&[("a", "Vacation", "days")]);
        cache.chunk_embeddings(&emb, &p, "small").await.unwrap();
        cache.chunk_embeddings(&emb, &p, "large").await.unwrap();
        assert_eq!(*emb.batch_calls.lock().unwrap(), 2);
        assert_eq!(cache.len().await, 2);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    /// Parks inside `embed_batch` until released, after announcing entry.
    struct GatedEmbedder {
        inner: KeywordEmbedder,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl Embedder for GatedEmbedder {
        async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, SearchError> {
            self.inner.embed(model, text).await
        }

        async fn embed_batch(
            &self,
            model: &str,
            texts: &[String],
        ) -> Result<Vec<Vec<f32>>, SearchError> {
            self.entered.notify_one();
            self.release.notified().await;
            self.inner.embed_batch(model, texts).await
        }
    }

    /// Holds every caller in `embed_batch` until `n` of them have arrived.
    struct RendezvousEmbedder {
        inner: KeywordEmbedder,
        barrier: Barrier,
    }

    #[async_trait]
    impl Embedder for RendezvousEmbedder {
        async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, SearchError> {
            self.inner.embed(model, text).await
        }

        async fn embed_batch(
            &self,
            model: &str,
            texts: &[String],
        ) -> Result<Vec<Vec<f32>>, SearchError> {
            self.barrier.wait().await;
            self.inner.embed_batch(model, texts).await
        }
    }

    #[tokio::test]
    async fn readers_are_not_blocked_while_embedding() {
        let emb = GatedEmbedder {
            inner: KeywordEmbedder::new(&["vacation", "sick"]),
            entered: Notify::new(),
            release: Notify::new(),
        };
        let cache = EmbeddingCache::new();
        let p = pack(&[
            ("a", "Vacation", "vacation days"),
            ("b", "Sick", "sick leave"),
        ]);

        let (out, during) = tokio::join!(cache.chunk_embeddings(&emb, &p, "m"), async {
            emb.entered.notified().await;
            let len = timeout(Duration::from_secs(1), cache.len()).await;
            let empty = timeout(Duration::from_secs(1), cache.is_empty()).await;
            emb.release.notify_one();
            (len, empty)
        });

        assert_eq!(during.0.expect("len blocked by an in-flight embed"), 0);
        assert!(during.1.expect("is_empty blocked by an in-flight embed"));
        assert_eq!(out.unwrap().len(), 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_entry_per_chunk() {
        let emb = RendezvousEmbedder {
            inner: KeywordEmbedder::new(&["vacation", "sick"]),
            barrier: Barrier::new(2),
        };
        let cache = EmbeddingCache::new();
        let p = pack(&[
            ("a", "Vacation", "vacation days"),
            ("b", "Sick", "sick leave"),
        ]);

        let (first, second) = timeout(Duration::from_secs(5), async {
            tokio::join!(
                cache.chunk_embeddings(&emb, &p, "m"),
                cache.chunk_embeddings(&emb, &p, "m"),
            )
        })
        .await
        .expect("concurrent embeds deadlocked");

        let first = first.unwrap();
        assert_eq!(first, second.unwrap());
        assert_eq!(first[1], ("b".to_string(), vec![0.0, 2.0]));
        assert_eq!(*emb.inner.batch_calls.lock().unwrap(), 2);
        assert_eq!(cache.len().await, p.chunks.len());

        cache.chunk_embeddings(&emb.inner, &p, "m").await.unwrap();
        assert_eq!(*emb.inner.batch_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn failure_leaves_cache_untouched() {
        let cache = EmbeddingCache::new();
        let p = pack(&[("a", "Vacation", "days")]);
        let err = cache
            .chunk_embeddings(&FailingEmbedder, &p, "m")
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::Embedding(_)));
        assert!(cache.is_empty().await);
    }
}
