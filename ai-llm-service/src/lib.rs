//! OpenAI access for context-lab: one gateway, cached per-key clients,
//! the Responses and Embeddings endpoints, a key probe and the model
//! pricing catalog.

pub mod catalog;
pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::default_config::OpenAiSettings;
pub use error_handler::AiLlmError;
pub use service_profiles::LlmGateway;
pub use services::open_ai_service::{OpenAiService, ResponseOutput, ResponseRequest, TokenUsage};
