//! Shared fixtures for handler tests.

use std::sync::Arc;

use ai_llm_service::OpenAiSettings;
use context_search::ScenarioRegistry;

use crate::core::app_state::{AppConfig, AppState};

fn settings(base_url: Option<&str>) -> OpenAiSettings {
    OpenAiSettings::from_lookup(|name| match (name, base_url) {
        ("OPENAI_API_KEY", Some(_)) => Some("sk-test".into()),
        ("OPENAI_BASE_URL", Some(url)) => Some(url.to_string()),
        _ => None,
    })
    .unwrap()
}

fn config() -> AppConfig {
    AppConfig::from_lookup(|_| None)
}

/// Built-in scenarios; with a base URL the env key is `sk-test`, without
/// one no key is configured.
pub(crate) fn state(base_url: Option<&str>) -> Arc<AppState> {
    let scenarios = ScenarioRegistry::builtin().unwrap();
    Arc::new(AppState::new(config(), settings(base_url), scenarios))
}

/// Like [`state`] but with a single custom scenario pack.
pub(crate) fn state_with_scenario(base_url: Option<&str>, pack: serde_json::Value) -> Arc<AppState> {
    let dir = std::env::temp_dir().join(format!(
        "context-lab-test-{}-{}",
        std::process::id(),
        pack["id"].as_str().unwrap()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("pack.json"), pack.to_string()).unwrap();
    let scenarios = ScenarioRegistry::from_dir(&dir).unwrap();
    Arc::new(AppState::new(config(), settings(base_url), scenarios))
}
