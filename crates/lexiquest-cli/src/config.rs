//! CLI configuration: the local player profile and engine settings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexiquest_core::engine::{EngineConfig, GameEngine};
use lexiquest_core::model::{Language, User};
use lexiquest_store::MemoryStore;

pub const DEFAULT_CONFIG_FILE: &str = "lexiquest.toml";

/// The `lexiquest.toml` file written by `lexiquest init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub username: String,
    pub user_id: Uuid,
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_user_language")]
    pub user_language: String,
    #[serde(default = "default_supported_languages")]
    pub supported_languages: Vec<String>,
    #[serde(default = "default_max_active_sessions")]
    pub max_active_sessions: usize,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("lexiquest-state.json")
}

fn default_user_language() -> String {
    "english".to_string()
}

fn default_supported_languages() -> Vec<String> {
    vec!["german".to_string(), "italian".to_string()]
}

fn default_max_active_sessions() -> usize {
    10
}

impl CliConfig {
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            username: self.username.clone(),
        }
    }

    pub fn engine_config(&self, seed: Option<u64>) -> EngineConfig {
        EngineConfig {
            max_active_sessions: self.max_active_sessions,
            user_language: Language::new(&self.user_language),
            supported_languages: self
                .supported_languages
                .iter()
                .map(|l| Language::new(l))
                .collect(),
            rng_seed: seed,
            ..EngineConfig::default()
        }
    }
}

/// Load the CLI config, defaulting to `lexiquest.toml` in the working
/// directory.
pub fn load_config_from(path: Option<&Path>) -> Result<CliConfig> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "failed to read config {}; run `lexiquest init` first",
            path.display()
        )
    })?;
    let config: CliConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    Ok(config)
}

/// Open the state file, or start with a fresh store when none exists yet.
pub fn open_store(config: &CliConfig) -> Result<Arc<MemoryStore>> {
    let store = if config.state_file.exists() {
        MemoryStore::load_json(&config.state_file)?
    } else {
        MemoryStore::new()
    };
    Ok(Arc::new(store))
}

/// Build an engine over the store with the config's settings.
pub fn build_engine(
    config: &CliConfig,
    store: Arc<MemoryStore>,
    seed: Option<u64>,
) -> GameEngine {
    GameEngine::new(store.clone(), store, config.engine_config(seed))
}
