use context_search::ScenarioChunk;
use serde::Deserialize;

/// Body of `POST /api/respond`. Fields are optional so missing ones map to
/// the route's own 400 message instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    pub model: Option<String>,
    pub prompt: Option<String>,
    pub context: Option<Vec<ContextItem>>,
    /// Absent and `null` both mean no web search.
    pub use_web: Option<bool>,
}

/// Selected context as sent by the client; only title and body are used.
#[derive(Debug, Deserialize)]
pub struct ContextItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl From<ContextItem> for ScenarioChunk {
    fn from(c: ContextItem) -> Self {
        ScenarioChunk {
            id: c.id,
            title: c.title,
            body: c.body,
        }
    }
}
