//! Embedding abstraction.
//!
//! Search code depends on this trait rather than on the OpenAI client so
//! the cache and scoring logic can run against any backend.

use ai_llm_service::OpenAiService;
use async_trait::async_trait;

use crate::errors::search_error::SearchError;

/// Provider interface for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Produces an embedding vector for one text.
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, SearchError>;

    /// Produces one vector per text, in the same order.
    async fn embed_batch(&self, model: &str, texts: &[String])
    -> Result<Vec<Vec<f32>>, SearchError>;
}

#[async_trait]
impl Embedder for OpenAiService {
    async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>, SearchError> {
        Ok(OpenAiService::embed(self, model, text).await?)
    }

    async fn embed_batch(
        &self,
        model: &str,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, SearchError> {
        Ok(OpenAiService::embed_batch(self, model, texts).await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Deterministic embedder: one dimension per keyword, counting occurrences.
    /// Records every text it was asked to embed.
    pub(crate) struct KeywordEmbedder {
        keywords: Vec<&'static str>,
        pub(crate) seen: Mutex<Vec<String>>,
        pub(crate) batch_calls: Mutex<usize>,
    }

    impl KeywordEmbedder {
        pub(crate) fn new(keywords: &[&'static str]) -> Self {
            Self {
                keywords: keywords.to_vec(),
                seen: Mutex::new(Vec::new()),
                batch_calls: Mutex::new(0),
            }
        }

        pub(crate) fn vector(&self, text: &str) -> Vec<f32> {
            let lower = text.to_lowercase();
            self.keywords
                .iter()
                .map(|k| lower.matches(k).count() as f32)
                .collect()
        }

        pub(crate) fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed(&self, _model: &str, text: &str) -> Result<Vec<f32>, SearchError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.vector(text))
        }

        async fn embed_batch(
            &self,
            _model: &str,
            texts: &[String],
        ) -> Result<Vec<Vec<f32>>, SearchError> {
            if !texts.is_empty() {
                *self.batch_calls.lock().unwrap() += 1;
            }
            self.seen.lock().unwrap().extend(texts.iter().cloned());
            Ok(texts.iter().map(|t| self.vector(t)).collect())
        }
    }

    /// Embedder that always fails.
    pub(crate) struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _model: &str, _text: &str) -> Result<Vec<f32>, SearchError> {
            Err(SearchError::Embedding("upstream unavailable".into()))
        }

        async fn embed_batch(
            &self,
            _model: &str,
            _texts: &[String],
        ) -> Result<Vec<Vec<f32>>, SearchError> {
            Err(SearchError::Embedding("upstream unavailable".into()))
        }
    }
}
