use std::error::Error;

use ai_llm_service::telemetry::{self, TARGET_PREFIX};
use tracing::Level;
use tracing_subscriber::{
    Layer, filter::filter_fn, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; variables may come from the real environment.
    if let Err(err) = dotenvy::dotenv() {
        eprintln!("no .env loaded: {err}");
    }

    let filter = telemetry::env_filter_with_level("info", Level::INFO);

    // The OpenAI client logs through its own layer; keep it out of the app layer.
    let app_layer = fmt::layer()
        .with_target(false)
        .with_filter(filter_fn(|meta| !meta.target().starts_with(TARGET_PREFIX)));

    tracing_subscriber::registry()
        .with(filter)
        .with(app_layer)
        .with(telemetry::layer())
        .try_init()?;

    api::start().await?;

    Ok(())
}
