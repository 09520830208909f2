use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;
#[cfg(test)]
mod test_support;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::{json_extractor::json_error_mapper, request_id::request_id_layer},
    routes::{
        chat_turn::chat_turn_route::chat_turn_route,
        compact::compact_route::compact_route,
        embeddings::search_route::embedding_search_route,
        health_route::health_route,
        models_route::models_route,
        openai::{openai_config_route::openai_config_route, openai_test_route::openai_test_route},
        respond::respond_route::respond_route,
        scenarios::scenarios_route::{get_scenario_route, list_scenarios_route},
    },
};

/// Builds state from the environment and serves until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let state = Arc::new(AppState::from_env()?);
    let address = state.config.api_address.clone();

    let listener = TcpListener::bind(&address).await.map_err(AppError::Bind)?;
    info!(%address, "api listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("api stopped");
    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_route))
        .route("/api/respond", post(respond_route))
        .route("/api/compact", post(compact_route))
        .route("/api/embeddings/search", post(embedding_search_route))
        .route("/api/chat-turn", post(chat_turn_route))
        .route("/api/openai/config", get(openai_config_route))
        .route("/api/openai/test", get(openai_test_route))
        .route("/api/scenarios", get(list_scenarios_route))
        .route("/api/scenarios/{id}", get(get_scenario_route))
        .route("/api/models", get(models_route))
        .layer(middleware::from_fn(json_error_mapper))
        .layer(middleware::from_fn(request_id_layer))
        .with_state(state)
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server keeps running.
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
