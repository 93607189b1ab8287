//! Engine configuration file storage.
//!
//! Reads `config.toml` into `EngineConfig` and the optional template
//! override file into a `TemplateSet`. Writes go through a temporary file
//! and an atomic rename.

use rayhai_core::config::EngineConfig;
use rayhai_core::response::TemplateSet;
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Errors that can occur during config storage operations.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    TomlParseError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// The template override file is unusable.
    TemplateError(String),
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::TomlParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            ConfigStorageError::TemplateError(e) => write!(f, "Template file error: {}", e),
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::TomlParseError(e)
    }
}

impl From<toml::ser::Error> for ConfigStorageError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigStorageError::TomlSerError(e)
    }
}

/// Storage for `config.toml`.
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the engine configuration.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(&self) -> Result<EngineConfig, ConfigStorageError> {
        if !self.path.exists() {
            tracing::debug!(
                "[ConfigStorage] {} not found, using defaults",
                self.path.display()
            );
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(EngineConfig::default());
        }

        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration atomically (tmp file + rename).
    pub fn save(&self, config: &EngineConfig) -> Result<(), ConfigStorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(config)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf, ConfigStorageError> {
        let invalid = |what: &str| {
            ConfigStorageError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Path has no {what}"),
            ))
        };
        let parent = self.path.parent().ok_or_else(|| invalid("parent directory"))?;
        let file_name = self.path.file_name().ok_or_else(|| invalid("file name"))?;
        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Loads the built-in templates merged with an optional override file.
pub fn load_templates(overrides: Option<&Path>) -> Result<TemplateSet, ConfigStorageError> {
    let Some(path) = overrides else {
        return Ok(TemplateSet::default());
    };
    let content = fs::read_to_string(path)?;
    let overrides = TemplateSet::from_toml(&content)
        .map_err(|e| ConfigStorageError::TemplateError(e.to_string()))?;
    tracing::info!(
        "[ConfigStorage] Loaded {} template override(s) from {}",
        overrides.keys().count(),
        path.display()
    );
    Ok(TemplateSet::default().merged(overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("config.toml"));
        assert_eq!(storage.load().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::new(temp_dir.path().join("rayhai").join("config.toml"));

        let mut config = EngineConfig::default();
        config.seed = Some(42);
        config.history_capacity = 8;
        storage.save(&config).unwrap();

        assert_eq!(storage.load().unwrap(), config);
        assert!(!temp_dir.path().join("rayhai").join(".config.toml.tmp").exists());
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "history_capacity = \"many\"").unwrap();

        let result = ConfigStorage::new(path).load();
        assert!(matches!(result, Err(ConfigStorageError::TomlParseError(_))));
    }

    #[test]
    fn test_template_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("templates.toml");
        fs::write(&path, "ask_age = \"Secret !\"").unwrap();

        let templates = load_templates(Some(&path)).unwrap();
        assert_eq!(templates.get("ask_age").unwrap(), ["Secret !".to_string()]);
        assert!(templates.contains("greeting"));

        fs::write(&path, "ask_age = []").unwrap();
        assert!(matches!(
            load_templates(Some(&path)),
            Err(ConfigStorageError::TemplateError(_))
        ));
    }
}
