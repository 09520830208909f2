use serde::{Deserialize, Serialize};

/// One selectable piece of context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioChunk {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl ScenarioChunk {
    /// Text sent to the embedding model: title, blank line, body.
    pub fn embedding_text(&self) -> String {
        format!("{}\n\n{}", self.title, self.body)
    }
}

/// A named set of chunks with a suggested prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPack {
    pub id: String,
    pub name: String,
    pub sample_prompt: String,
    pub chunks: Vec<ScenarioChunk>,
}

/// Listing entry for a pack, without the chunk bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub sample_prompt: String,
    pub chunk_count: usize,
}

impl From<&ScenarioPack> for ScenarioSummary {
    fn from(p: &ScenarioPack) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            sample_prompt: p.sample_prompt.clone(),
            chunk_count: p.chunks.len(),
        }
    }
}
