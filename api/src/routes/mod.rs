pub mod chat_turn;
pub mod compact;
pub mod embeddings;
pub mod health_route;
pub mod models_route;
pub mod openai;
pub mod respond;
pub mod scenarios;
