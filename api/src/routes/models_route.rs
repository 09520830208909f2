use ai_llm_service::catalog::{
    self, CompletionModel, EmbeddingModel, default_embedding_model, default_model,
};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelsResponse {
    /// Most expensive first.
    pub models: Vec<&'static CompletionModel>,
    pub default_model: &'static str,
    pub embedding_models: Vec<&'static EmbeddingModel>,
    pub default_embedding_model: &'static str,
}

pub async fn models_route() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: catalog::sorted_models(),
        default_model: default_model(),
        embedding_models: catalog::sorted_embedding_models(),
        default_embedding_model: default_embedding_model(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn catalog_is_serialized_camel_case() {
        let Json(r) = models_route().await;
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["defaultModel"], "gpt-4.1-nano");
        assert_eq!(v["defaultEmbeddingModel"], "text-embedding-ada-002");
        assert_eq!(v["models"][0]["id"], "gpt-5-pro");
        assert!(v["embeddingModels"][0]["pricePerMtok"].is_number());
    }
}
