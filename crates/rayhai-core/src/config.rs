//! Configuration model.
//!
//! `EngineConfig` is read from `config.toml`; `SecretConfig` from
//! `secret.json`. Every field has a default so a partial file is valid.

use crate::intent::DEFAULT_FOLLOW_UP_THRESHOLD;
use crate::response::DEFAULT_CLARIFICATION_DEPTH;
use crate::session::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Where the persona document lives.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PersonaLocation {
    /// The document compiled into the binary
    #[default]
    Bundled,
    /// A JSON file on disk
    Path(PathBuf),
    /// A JSON document served over HTTP
    Url(String),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of history entries kept in the session context
    pub history_capacity: usize,
    /// Word-overlap ratio above which an unmatched message is a follow-up
    pub follow_up_threshold: f64,
    /// Completed turns after which unmatched messages get a clarification
    pub clarification_depth: u32,
    /// Seed for reply sampling; entropy when absent
    pub seed: Option<u64>,
    pub persona: PersonaLocation,
    /// TOML file overriding individual reply templates
    pub templates: Option<PathBuf>,
    pub remote: RemoteConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            follow_up_threshold: DEFAULT_FOLLOW_UP_THRESHOLD,
            clarification_depth: DEFAULT_CLARIFICATION_DEPTH,
            seed: None,
            persona: PersonaLocation::default(),
            templates: None,
            remote: RemoteConfig::default(),
        }
    }
}

/// Settings of the remote text-generation fallback.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Upper bound on one remote call, in seconds
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OPENAI_ENDPOINT.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.25,
            max_tokens: 700,
            timeout_secs: 20,
        }
    }
}

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretConfig {
    /// OpenAI API configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiSecret>,
}

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct OpenAiSecret {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
}

// Keeps the key out of debug output and logs.
impl std::fmt::Debug for OpenAiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSecret")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}
