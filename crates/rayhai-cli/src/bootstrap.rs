//! Assembles a `ResponseEngine` from the config file, CLI flags and secrets.

use crate::GlobalOptions;
use anyhow::{Context, Result};
use rayhai_application::ResponseEngine;
use rayhai_core::config::{EngineConfig, PersonaLocation};
use rayhai_infrastructure::RayhaiPaths;
use rayhai_infrastructure::storage::{ConfigStorage, SecretStorage, load_templates};
use rayhai_interaction::OpenAiApiAgent;
use std::path::PathBuf;
use std::sync::Arc;

/// Interprets a `--persona` argument: http(s) URLs are fetched, anything
/// else is read from disk.
pub fn persona_location(arg: &str) -> PersonaLocation {
    let arg = arg.trim();
    if arg.starts_with("http://") || arg.starts_with("https://") {
        PersonaLocation::Url(arg.to_string())
    } else {
        PersonaLocation::Path(PathBuf::from(arg))
    }
}

/// `--config`, or `~/.config/rayhai/config.toml`.
pub fn config_path(options: &GlobalOptions) -> Result<PathBuf> {
    match &options.config {
        Some(path) => Ok(path.clone()),
        None => Ok(RayhaiPaths::config_file()?),
    }
}

/// Applies `--persona` and `--seed` on top of a loaded configuration.
pub fn apply_overrides(config: &mut EngineConfig, options: &GlobalOptions) {
    if let Some(persona) = &options.persona {
        config.persona = persona_location(persona);
    }
    if options.seed.is_some() {
        config.seed = options.seed;
    }
}

/// Loads the engine configuration and applies the CLI overrides.
pub fn load_config(options: &GlobalOptions) -> Result<EngineConfig> {
    let path = config_path(options)?;
    let mut config = ConfigStorage::new(path.clone())
        .load()
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    apply_overrides(&mut config, options);
    Ok(config)
}

/// Builds the engine and enables the OpenAI fallback when a key is known.
pub async fn build_engine(options: &GlobalOptions) -> Result<ResponseEngine> {
    let config = load_config(options)?;
    let templates = load_templates(config.templates.as_deref())
        .context("Failed to load reply templates")?;
    let remote_config = config.remote.clone();

    let engine = ResponseEngine::builder()
        .config(config)
        .templates(templates)
        .build();

    match SecretStorage::new().map(|storage| storage.openai_secret()) {
        Ok(Some(secret)) => {
            let agent = OpenAiApiAgent::from_secret(&secret, &remote_config);
            engine.configure_responder(Arc::new(agent)).await;
        }
        Ok(None) => tracing::debug!("[Bootstrap] No OpenAI key; local replies only"),
        Err(e) => tracing::warn!("[Bootstrap] Secret storage unavailable: {}", e),
    }

    Ok(engine)
}
