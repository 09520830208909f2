//! OpenAI service for text generation (Responses API) and embeddings.
//!
//! Minimal, non-streaming client around the OpenAI REST API.
//! Endpoints are derived from `LlmModelConfig::endpoint`:
//! - POST {endpoint}/v1/responses: single response, optional web search tool
//! - POST {endpoint}/v1/embeddings: one or many embedding vectors
//!
//! Constructor validation:
//! - `cfg.api_key` must be present
//! - `cfg.endpoint` must start with http:// or https://
//!
//! Errors are normalized via unified error types in `error_handler`.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, info};

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{AiLlmError, HttpError, ProviderError, ProviderErrorKind, make_snippet},
};

/// Thin client for the OpenAI API.
///
/// Constructed from a complete [`LlmModelConfig`]. Internally keeps a
/// preconfigured `reqwest::Client` (with timeout and default headers).
///
/// High-level operations:
/// - [`OpenAiService::respond`]: single, non-streaming response
/// - [`OpenAiService::embed`]: one embedding vector
/// - [`OpenAiService::embed_batch`]: many vectors in one request
#[derive(Debug)]
pub struct OpenAiService {
    client: reqwest::Client,
    cfg: LlmModelConfig,
    url_responses: String,
    url_embeddings: String,
}

/// Parameters of one `/v1/responses` call.
#[derive(Debug, Clone)]
pub struct ResponseRequest {
    pub model: String,
    pub input: String,
    pub max_output_tokens: u32,
    /// Attach the hosted `web_search_preview` tool with `tool_choice = auto`.
    pub use_web: bool,
}

/// Token accounting as reported by the API. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

/// Result of [`OpenAiService::respond`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseOutput {
    /// Extracted text; empty when the model produced none.
    pub text: String,
    pub usage: Option<TokenUsage>,
    pub latency: Duration,
}

impl OpenAiService {
    /// Creates a new [`OpenAiService`] from the given config.
    ///
    /// # Errors
    /// - `MissingApiKey` if `cfg.api_key` is `None` or blank
    /// - `InvalidEndpoint` if `cfg.endpoint` is invalid
    /// - [`AiLlmError::HttpTransport`] if the HTTP client cannot be built
    pub fn new(cfg: LlmModelConfig) -> Result<Self, AiLlmError> {
        let api_key = cfg
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::openai(ProviderErrorKind::MissingApiKey))?;

        let endpoint = cfg.endpoint.trim();
        if endpoint.is_empty()
            || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
        {
            return Err(ProviderError::openai(ProviderErrorKind::InvalidEndpoint(
                cfg.endpoint.clone(),
            ))
            .into());
        }

        let timeout = cfg
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
                ProviderError::openai(ProviderErrorKind::Decode(format!(
                    "invalid API key header: {e}"
                )))
            })?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = endpoint.trim_end_matches('/').to_string();
        let url_responses = format!("{base}/v1/responses");
        let url_embeddings = format!("{base}/v1/embeddings");

        info!(
            endpoint = %cfg.endpoint,
            timeout_secs = timeout.as_secs(),
            "OpenAiService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_responses,
            url_embeddings,
        })
    }

    /// Performs a **non-streaming** `/v1/responses` request.
    ///
    /// Output text is taken from `output_text` when the API provides it,
    /// otherwise from the first text part found in `output[*].content[*]`.
    /// Tool-call items (e.g. a web search) carry no content and are skipped.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - `Decode` if the JSON cannot be parsed
    pub async fn respond(&self, req: &ResponseRequest) -> Result<ResponseOutput, AiLlmError> {
        let started = Instant::now();
        let body = ResponsesApiRequest::from_request(req);

        debug!(
            model = %req.model,
            input_len = req.input.len(),
            use_web = req.use_web,
            max_output_tokens = req.max_output_tokens,
            "POST {}", self.url_responses
        );

        let out: ResponsesApiResponse = self
            .post_json(&self.url_responses, &body, started, "`output` or `output_text`")
            .await?;

        let text = out.extract_text();
        let latency = started.elapsed();

        info!(
            model = %req.model,
            output_len = text.len(),
            input_tokens = out.usage.as_ref().and_then(|u| u.input_tokens),
            output_tokens = out.usage.as_ref().and_then(|u| u.output_tokens),
            latency_ms = latency.as_millis(),
            "response completed"
        );

        Ok(ResponseOutput {
            text,
            usage: out.usage,
            latency,
        })
    }

    /// Retrieves a single embeddings vector.
    ///
    /// # Errors
    /// Same as [`OpenAiService::embed_batch`]; additionally `Decode` when
    /// the response holds no vector.
    pub async fn embed(&self, model: &str, input: &str) -> Result<Vec<f32>, AiLlmError> {
        self.try_embed(model, input).await?.ok_or_else(|| {
            ProviderError::openai(ProviderErrorKind::Decode("Failed to embed text".into())).into()
        })
    }

    /// Like [`OpenAiService::embed`], but a successful response without any
    /// `data` entry is `Ok(None)` instead of an error.
    pub async fn try_embed(
        &self,
        model: &str,
        input: &str,
    ) -> Result<Option<Vec<f32>>, AiLlmError> {
        let started = Instant::now();
        let body = EmbeddingsRequest {
            model,
            input: EmbeddingInput::One(input),
        };

        debug!(model, input_len = input.len(), "POST {}", self.url_embeddings);

        let out: EmbeddingsResponse = self
            .post_json(&self.url_embeddings, &body, started, "`data[0].embedding`")
            .await?;

        let first = out.into_ordered().into_iter().next();
        match &first {
            Some(v) => info!(
                model,
                dim = v.len(),
                latency_ms = started.elapsed().as_millis(),
                "embedding completed"
            ),
            None => debug!(model, "embedding response held no data"),
        }

        Ok(first)
    }

    /// Retrieves one vector per input, in input order.
    ///
    /// An empty input slice returns immediately without a network call.
    ///
    /// # Errors
    /// - `HttpStatus` for non-2xx responses
    /// - [`AiLlmError::HttpTransport`] for client/network failures
    /// - `Decode` if the JSON cannot be parsed or the vector count differs
    pub async fn embed_batch(
        &self,
        model: &str,
        inputs: &[String],
    ) -> Result<Vec<Vec<f32>>, AiLlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let body = EmbeddingsRequest {
            model,
            input: EmbeddingInput::Many(inputs),
        };

        debug!(model, batch = inputs.len(), "POST {}", self.url_embeddings);

        let out: EmbeddingsResponse = self
            .post_json(&self.url_embeddings, &body, started, "`data[*].embedding`")
            .await?;

        let vectors = out.into_ordered();
        if vectors.len() != inputs.len() {
            error!(
                model,
                expected = inputs.len(),
                got = vectors.len(),
                "embedding batch size mismatch"
            );
            return Err(ProviderError::openai(ProviderErrorKind::Decode(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                vectors.len()
            )))
            .into());
        }

        info!(
            model,
            batch = inputs.len(),
            latency_ms = started.elapsed().as_millis(),
            "embedding batch completed"
        );

        Ok(vectors)
    }

    /// Endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.cfg.endpoint
    }

    /* --------------------- Internals --------------------- */

    async fn post_json<B, T>(
        &self,
        url: &str,
        body: &B,
        started: Instant,
        expected: &str,
    ) -> Result<T, AiLlmError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!(%url, latency_ms = started.elapsed().as_millis(), "OpenAI request timed out");
                    AiLlmError::Timeout(started.elapsed())
                } else {
                    AiLlmError::HttpTransport(e)
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);

            error!(
                %status,
                %url,
                %snippet,
                endpoint = %self.cfg.endpoint,
                latency_ms = started.elapsed().as_millis(),
                "OpenAI returned non-success status"
            );

            return Err(ProviderError::openai(ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }))
            .into());
        }

        match resp.json::<T>().await {
            Ok(v) => Ok(v),
            Err(e) => {
                error!(
                    error = %e,
                    %url,
                    latency_ms = started.elapsed().as_millis(),
                    "failed to decode OpenAI response"
                );
                Err(ProviderError::openai(ProviderErrorKind::Decode(format!(
                    "serde error: {e}; expected {expected}"
                )))
                .into())
            }
        }
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

#[derive(Debug, Serialize)]
struct ResponsesApiRequest<'a> {
    model: &'a str,
    input: &'a str,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

impl<'a> ResponsesApiRequest<'a> {
    fn from_request(req: &'a ResponseRequest) -> Self {
        let (tools, tool_choice) = if req.use_web {
            (
                Some(vec![ToolSpec {
                    kind: "web_search_preview",
                }]),
                Some("auto"),
            )
        } else {
            (None, None)
        };
        Self {
            model: &req.model,
            input: &req.input,
            max_output_tokens: req.max_output_tokens,
            tools,
            tool_choice,
        }
    }
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

impl ResponsesApiResponse {
    fn extract_text(&self) -> String {
        if let Some(text) = &self.output_text {
            return text.clone();
        }
        self.output
            .iter()
            .filter_map(|item| item.content.as_deref())
            .flatten()
            .find_map(|part| part.text.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Option<Vec<OutputContent>>,
}

#[derive(Debug, Deserialize)]
struct OutputContent {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: EmbeddingInput<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum EmbeddingInput<'a> {
    One(&'a str),
    Many(&'a [String]),
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingItem>,
}

impl EmbeddingsResponse {
    /// Vectors sorted by their `index` field.
    fn into_ordered(mut self) -> Vec<Vec<f32>> {
        self.data.sort_by_key(|d| d.index);
        self.data.into_iter().map(|d| d.embedding).collect()
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}
