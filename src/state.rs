//! Application state: the adaptive engine, question generator, syllabus
//! store, prompt templates, and the optional model client.
//!
//! Everything is owned here and shared via cheap clones (the stores are
//! Arc-backed), so there are no process-wide singletons and tests can build
//! isolated instances.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::load_prompt_config_from_env;
use crate::config::Prompts;
use crate::domain::StructuredSyllabus;
use crate::engine::AdaptiveEngine;
use crate::error::AppError;
use crate::generator::QuestionGenerator;
use crate::llm::{LanguageModel, OpenAI};

/// Structured syllabi keyed by a fresh uuid per structuring call. Kept in
/// memory for serving; optionally mirrored to disk as pretty JSON so results
/// survive a restart.
#[derive(Clone)]
pub struct SyllabusStore {
    by_id: Arc<RwLock<HashMap<String, StructuredSyllabus>>>,
    storage_dir: Option<PathBuf>,
}

impl SyllabusStore {
    pub fn new(storage_dir: Option<PathBuf>) -> Self {
        Self {
            by_id: Arc::new(RwLock::new(HashMap::new())),
            storage_dir,
        }
    }

    /// Assign an id, persist (if a directory is configured), and index.
    #[instrument(level = "debug", skip(self, syllabus))]
    pub async fn insert(&self, syllabus: StructuredSyllabus) -> Result<String, AppError> {
        let id = Uuid::new_v4().to_string();
        if let Some(dir) = &self.storage_dir {
            tokio::fs::create_dir_all(dir).await?;
            let path = dir.join(format!("{id}.json"));
            // A serialization failure here is a storage problem, not bad
            // model output.
            let json = serde_json::to_string_pretty(&syllabus)
                .map_err(std::io::Error::other)?;
            tokio::fs::write(&path, json).await?;
            info!(target: "syllabus", %id, path = %path.display(), "syllabus persisted");
        }
        self.by_id.write().await.insert(id.clone(), syllabus);
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Option<StructuredSyllabus> {
        self.by_id.read().await.get(id).cloned()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: AdaptiveEngine,
    pub generator: QuestionGenerator,
    pub syllabi: SyllabusStore,
    pub prompts: Prompts,
    llm: Option<Arc<dyn LanguageModel>>,
}

impl AppState {
    /// Build state from env: load prompt overrides, init the model client,
    /// pick the syllabus storage directory.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let prompts = load_prompt_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let openai = OpenAI::from_env();
        if let Some(oa) = &openai {
            info!(target: "prepx_backend", base_url = %oa.base_url, model = %oa.model, "OpenAI enabled.");
        } else {
            info!(target: "prepx_backend", "OpenAI disabled (no OPENAI_API_KEY). Generation endpoints will report it.");
        }
        let llm = openai.map(|oa| Arc::new(oa) as Arc<dyn LanguageModel>);

        let storage_dir = std::env::var("SYLLABUS_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("storage/syllabi"));

        Self {
            engine: AdaptiveEngine::new(),
            generator: QuestionGenerator::default(),
            syllabi: SyllabusStore::new(Some(storage_dir)),
            prompts,
            llm,
        }
    }

    /// State with a caller-supplied collaborator and no disk persistence.
    /// This is the constructor tests use.
    #[allow(dead_code)]
    pub fn with_model(llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            engine: AdaptiveEngine::new(),
            generator: QuestionGenerator::default(),
            syllabi: SyllabusStore::new(None),
            prompts: Prompts::default(),
            llm: Some(llm),
        }
    }

    /// The model collaborator, or `NotConfigured` if no API key was present.
    pub fn llm(&self) -> Result<&dyn LanguageModel, AppError> {
        self.llm.as_deref().ok_or(AppError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Module;

    fn sample() -> StructuredSyllabus {
        StructuredSyllabus {
            modules: vec![Module { name: "M1".into(), topics: vec![] }],
        }
    }

    #[tokio::test]
    async fn insert_then_get_roundtrips() {
        let store = SyllabusStore::new(None);
        let id = store.insert(sample()).await.unwrap();
        let got = store.get(&id).await.unwrap();
        assert_eq!(got.modules[0].name, "M1");
        assert!(store.get("no-such-id").await.is_none());
    }

    #[tokio::test]
    async fn ids_are_unique_per_insert() {
        let store = SyllabusStore::new(None);
        let a = store.insert(sample()).await.unwrap();
        let b = store.insert(sample()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn persists_json_to_configured_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = SyllabusStore::new(Some(dir.path().to_path_buf()));
        let id = store.insert(sample()).await.unwrap();
        let written = std::fs::read_to_string(dir.path().join(format!("{id}.json"))).unwrap();
        let parsed: StructuredSyllabus = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.modules.len(), 1);
    }
}
