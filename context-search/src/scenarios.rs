//! Scenario pack registry.
//!
//! Built-in packs are compiled into the binary. A directory of `*.json`
//! packs can replace them at startup (`SCENARIOS_DIR`).

use std::{collections::HashMap, fs, path::Path};

use tracing::{debug, info};

use crate::{
    errors::search_error::SearchError,
    structs::scenario::{ScenarioPack, ScenarioSummary},
};

/// Built-in packs: foundations, then domains, then applications.
const BUILTIN: &[(&str, &str)] = &[
    ("basic", include_str!("../data/scenarios/basic.json")),
    ("chatbot", include_str!("../data/scenarios/chatbot.json")),
    ("marketing", include_str!("../data/scenarios/marketing.json")),
    ("hr", include_str!("../data/scenarios/hr.json")),
    (
        "cybersecurity",
        include_str!("../data/scenarios/cybersecurity.json"),
    ),
    (
        "email-triage",
        include_str!("../data/scenarios/email-triage.json"),
    ),
];

#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    packs: Vec<ScenarioPack>,
    by_id: HashMap<String, usize>,
}

impl ScenarioRegistry {
    /// Registry of the packs shipped with the crate.
    ///
    /// # Errors
    /// Only if a bundled file is malformed.
    pub fn builtin() -> Result<Self, SearchError> {
        Self::from_sources(BUILTIN.iter().map(|(name, json)| (name.to_string(), *json)))
    }

    /// Loads every `*.json` file in `dir`, ordered by file name.
    ///
    /// # Errors
    /// I/O failures, invalid JSON (naming the file) and duplicate ids.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, SearchError> {
        let dir = dir.as_ref();
        let io_err = |source| SearchError::ScenarioIo {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();

        let mut sources = Vec::with_capacity(files.len());
        for path in &files {
            let text = fs::read_to_string(path).map_err(|source| SearchError::ScenarioIo {
                path: path.clone(),
                source,
            })?;
            sources.push((path.display().to_string(), text));
        }

        let registry =
            Self::from_sources(sources.iter().map(|(name, text)| (name.clone(), text.as_str())))?;
        info!(dir = %dir.display(), packs = registry.len(), "loaded scenario packs");
        Ok(registry)
    }

    fn from_sources<'a, I>(sources: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = (String, &'a str)>,
    {
        let mut registry = Self::default();
        for (name, json) in sources {
            let pack: ScenarioPack = serde_json::from_str(json)
                .map_err(|source| SearchError::ScenarioParse { name, source })?;
            registry.insert(pack)?;
        }
        Ok(registry)
    }

    fn insert(&mut self, pack: ScenarioPack) -> Result<(), SearchError> {
        if self.by_id.contains_key(&pack.id) {
            return Err(SearchError::DuplicateScenario(pack.id));
        }
        debug!(id = %pack.id, chunks = pack.chunks.len(), "registered scenario");
        self.by_id.insert(pack.id.clone(), self.packs.len());
        self.packs.push(pack);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&ScenarioPack> {
        self.by_id.get(id).map(|&i| &self.packs[i])
    }

    pub fn ids(&self) -> Vec<&str> {
        self.packs.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn list(&self) -> Vec<ScenarioSummary> {
        self.packs.iter().map(ScenarioSummary::from).collect()
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACK: &str = r#"{
        "id": "demo",
        "name": "Demo",
        "samplePrompt": "Say hi",
        "chunks": [{ "id": "d1", "title": "T", "body": "B" }]
    }"#;

    #[test]
    fn builtin_packs_load_in_order() {
        let reg = ScenarioRegistry::builtin().unwrap();
        assert_eq!(
            reg.ids(),
            vec![
                "basic",
                "chatbot",
                "marketing",
                "hr",
                "cybersecurity",
                "email-triage"
            ]
        );
        let basic = reg.get("basic").unwrap();
        assert!(!basic.chunks.is_empty());
        assert!(!basic.sample_prompt.is_empty());
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn builtin_chunk_ids_are_unique_per_pack() {
        let reg = ScenarioRegistry::builtin().unwrap();
        for summary in reg.list() {
            let pack = reg.get(&summary.id).unwrap();
            let mut ids: Vec<_> = pack.chunks.iter().map(|c| &c.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), summary.chunk_count, "pack {}", summary.id);
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = ScenarioRegistry::from_sources(vec![
            ("a.json".to_string(), PACK),
            ("b.json".to_string(), PACK),
        ])
        .unwrap_err();
        assert!(matches!(err, SearchError::DuplicateScenario(id) if id == "demo"));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = ScenarioRegistry::from_sources(vec![("broken.json".to_string(), "{")])
            .unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let err = ScenarioRegistry::from_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, SearchError::ScenarioIo { .. }));
    }
}
