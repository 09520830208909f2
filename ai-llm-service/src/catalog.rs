//! Model catalog: labels, hints and list prices.
//!
//! Prices are USD per one million tokens and are estimates; they are only
//! used to show an approximate cost next to a response.

use serde::Serialize;

use crate::services::open_ai_service::TokenUsage;

/// Input/output price per 1M tokens. A missing side is unknown, not free.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pricing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionModel {
    pub id: &'static str,
    pub label: &'static str,
    pub hint: &'static str,
    pub pricing: Option<Pricing>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingModel {
    pub id: &'static str,
    pub hint: &'static str,
    /// USD per 1M input tokens.
    pub price_per_mtok: f64,
}

const fn priced(input: f64, output: f64) -> Option<Pricing> {
    Some(Pricing {
        input: Some(input),
        output: Some(output),
    })
}

/// Completion models offered for selection, in declaration order.
pub const COMPLETION_MODELS: &[CompletionModel] = &[
    CompletionModel {
        id: "gpt-5.1",
        label: "GPT-5.1",
        hint: "Best for coding and agentic tasks; configurable reasoning.",
        pricing: priced(1.25, 10.0),
    },
    CompletionModel {
        id: "gpt-5-mini",
        label: "GPT-5 mini",
        hint: "Fast, cost-efficient for well-defined tasks.",
        pricing: priced(0.25, 2.0),
    },
    CompletionModel {
        id: "gpt-5-pro",
        label: "GPT-5 pro",
        hint: "Smarter, more precise responses than GPT-5.",
        pricing: priced(15.0, 120.0),
    },
    CompletionModel {
        id: "gpt-4o",
        label: "GPT-4o",
        hint: "Fast multimodal flagship; great quality/cost balance.",
        pricing: priced(5.0, 15.0),
    },
    CompletionModel {
        id: "gpt-4o-mini",
        label: "GPT-4o mini",
        hint: "Very low cost; good for large batch tasks.",
        pricing: priced(0.15, 0.6),
    },
    CompletionModel {
        id: "gpt-4.1",
        label: "GPT-4.1",
        hint: "Strong general model (non-reasoning).",
        pricing: priced(2.0, 8.0),
    },
    CompletionModel {
        id: "gpt-4.1-mini",
        label: "GPT-4.1 mini",
        hint: "Smaller 4.1 variant; good quality at lower cost and latency.",
        pricing: priced(0.40, 0.10),
    },
    CompletionModel {
        id: "gpt-4.1-nano",
        label: "GPT-4.1 nano",
        hint: "Fastest, most cost-efficient 4.1 class for lightweight tasks.",
        pricing: priced(0.10, 0.025),
    },
];

pub const EMBEDDING_MODELS: &[EmbeddingModel] = &[
    EmbeddingModel {
        id: "text-embedding-3-large",
        hint: "2024 model • Highest quality modern embeddings.",
        price_per_mtok: 0.13,
    },
    EmbeddingModel {
        id: "text-embedding-ada-002",
        hint: "2022 model • Legacy ada embeddings, cheaper but older.",
        price_per_mtok: 0.10,
    },
    EmbeddingModel {
        id: "text-embedding-3-small",
        hint: "2024 model • Small, fast, cost-efficient.",
        price_per_mtok: 0.02,
    },
];

const PREFERRED_DEFAULT_MODEL: &str = "gpt-4.1-nano";
const PREFERRED_DEFAULT_EMBEDDING: &str = "text-embedding-ada-002";

pub fn find_model(id: &str) -> Option<&'static CompletionModel> {
    COMPLETION_MODELS.iter().find(|m| m.id == id)
}

pub fn pricing_for(id: &str) -> Option<Pricing> {
    find_model(id).and_then(|m| m.pricing)
}

fn price_score(m: &CompletionModel) -> f64 {
    m.pricing
        .map(|p| p.input.unwrap_or(0.0) + p.output.unwrap_or(0.0))
        .unwrap_or(0.0)
}

/// Completion models ordered from most to least expensive (input + output).
pub fn sorted_models() -> Vec<&'static CompletionModel> {
    let mut models: Vec<_> = COMPLETION_MODELS.iter().collect();
    models.sort_by(|a, b| price_score(b).total_cmp(&price_score(a)));
    models
}

/// `gpt-4.1-nano` when offered, otherwise the cheapest model.
pub fn default_model() -> &'static str {
    let sorted = sorted_models();
    if sorted.iter().any(|m| m.id == PREFERRED_DEFAULT_MODEL) {
        return PREFERRED_DEFAULT_MODEL;
    }
    sorted.last().map(|m| m.id).unwrap_or(PREFERRED_DEFAULT_MODEL)
}

/// Embedding models ordered from most to least expensive.
pub fn sorted_embedding_models() -> Vec<&'static EmbeddingModel> {
    let mut models: Vec<_> = EMBEDDING_MODELS.iter().collect();
    models.sort_by(|a, b| b.price_per_mtok.total_cmp(&a.price_per_mtok));
    models
}

/// `text-embedding-ada-002` when offered, otherwise the cheapest model.
pub fn default_embedding_model() -> &'static str {
    let sorted = sorted_embedding_models();
    if sorted.iter().any(|m| m.id == PREFERRED_DEFAULT_EMBEDDING) {
        return PREFERRED_DEFAULT_EMBEDDING;
    }
    sorted
        .last()
        .map(|m| m.id)
        .unwrap_or(PREFERRED_DEFAULT_EMBEDDING)
}

/// Estimated USD cost of a response. `None` for models without a price.
///
/// Missing token counts count as zero; a missing price side contributes nothing.
pub fn estimate_cost_usd(model: &str, usage: Option<&TokenUsage>) -> Option<f64> {
    let pricing = pricing_for(model)?;
    let input = usage.and_then(|u| u.input_tokens).unwrap_or(0) as f64;
    let output = usage.and_then(|u| u.output_tokens).unwrap_or(0) as f64;
    let in_cost = input * pricing.input.unwrap_or(0.0) / 1_000_000.0;
    let out_cost = output * pricing.output.unwrap_or(0.0) / 1_000_000.0;
    Some(in_cost + out_cost)
}
