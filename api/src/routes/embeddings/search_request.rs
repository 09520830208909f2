use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /api/embeddings/search`.
///
/// The optional knobs are kept as raw JSON: wrong types fall back to
/// defaults rather than failing the request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub scenario_id: Option<String>,
    pub phrase: Option<String>,
    pub min_similarity: Option<Value>,
    pub extra_chunks: Option<Value>,
    pub embedding_model: Option<Value>,
}

impl SearchRequest {
    pub fn min_similarity(&self) -> Option<f64> {
        self.min_similarity.as_ref().and_then(Value::as_f64)
    }

    pub fn embedding_model(&self) -> Option<&str> {
        self.embedding_model
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
