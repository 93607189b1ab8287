//! Secret configuration file storage.
//!
//! Loads and (on explicit opt-in) saves `~/.config/rayhai/secret.json`.

use crate::paths::RayhaiPaths;
use rayhai_core::config::{OpenAiSecret, SecretConfig};
use std::env;
use std::fs;
#[cfg(unix)]
use std::io::Write;
use std::path::{Path, PathBuf};

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL_NAME";

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

/// Storage for the secret configuration file (secret.json).
///
/// The engine never persists credentials itself; this storage is used by
/// the front-end when the visitor explicitly asks to save a key.
///
/// # Security Note
///
/// The file is plaintext JSON. `save` restricts it to mode 600 on Unix.
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a storage for the default path (`~/.config/rayhai/secret.json`).
    pub fn new() -> Result<Self, SecretStorageError> {
        let path = RayhaiPaths::secret_file().map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the secret configuration from the JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(SecretConfig)`: Successfully loaded and parsed
    /// - `Err(SecretStorageError::NotFound)`: File doesn't exist
    /// - `Err(SecretStorageError::IoError)`: Failed to read file
    /// - `Err(SecretStorageError::ParseError)`: Invalid JSON format
    pub fn load(&self) -> Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Writes the secret configuration, creating the directory if needed.
    pub fn save(&self, config: &SecretConfig) -> Result<(), SecretStorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(config)?;
        write_private(&self.path, json.as_bytes())?;

        tracing::info!("[SecretStorage] Saved secrets to {}", self.path.display());
        Ok(())
    }

    /// Stores an OpenAI key, keeping any configured model name.
    pub fn save_openai_key(&self, api_key: &str) -> Result<(), SecretStorageError> {
        let mut config = match self.load() {
            Ok(config) => config,
            Err(SecretStorageError::NotFound(_)) => SecretConfig::default(),
            Err(e) => return Err(e),
        };
        let model_name = config.openai.take().and_then(|openai| openai.model_name);
        config.openai = Some(OpenAiSecret {
            api_key: api_key.trim().to_string(),
            model_name,
        });
        self.save(&config)
    }

    /// Resolves the OpenAI credential.
    ///
    /// Priority:
    /// 1. secret.json
    /// 2. Environment variables (`OPENAI_API_KEY`, `OPENAI_MODEL_NAME`)
    ///
    /// Returns `None` when neither holds a non-empty key.
    pub fn openai_secret(&self) -> Option<OpenAiSecret> {
        let from_file = match self.load() {
            Ok(config) => config.openai,
            Err(SecretStorageError::NotFound(_)) => None,
            Err(e) => {
                tracing::warn!("[SecretStorage] Ignoring unreadable secret file: {}", e);
                None
            }
        };
        if let Some(openai) = from_file.filter(|o| !o.api_key.trim().is_empty()) {
            return Some(openai);
        }

        let api_key = env::var(OPENAI_API_KEY_ENV).ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(OpenAiSecret {
            api_key,
            model_name: env::var(OPENAI_MODEL_ENV).ok(),
        })
    }
}

/// Writes `contents` to a file only the owner can read.
///
/// New files are created with mode 600; an existing file is narrowed to 600
/// before it is truncated.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    if path.exists() {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load() {
            Err(SecretStorageError::NotFound(path)) => assert_eq!(path, file_path),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(
            &file_path,
            r#"{ "openai": { "api_key": "test-key-123", "model_name": "gpt-4o-mini" } }"#,
        )
        .unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();
        let openai = config.openai.unwrap();
        assert_eq!(openai.api_key, "test-key-123");
        assert_eq!(openai.model_name, Some("gpt-4o-mini".to_string()));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ invalid json"#).unwrap();

        let result = SecretStorage::with_path(file_path).load();
        assert!(matches!(result, Err(SecretStorageError::ParseError(_))));
    }

    #[test]
    fn test_save_round_trip_keeps_model() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        storage
            .save(&SecretConfig {
                openai: Some(OpenAiSecret {
                    api_key: "old".to_string(),
                    model_name: Some("gpt-4o".to_string()),
                }),
            })
            .unwrap();
        storage.save_openai_key("  new-key  ").unwrap();

        let openai = storage.load().unwrap().openai.unwrap();
        assert_eq!(openai.api_key, "new-key");
        assert_eq!(openai.model_name, Some("gpt-4o".to_string()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_save_narrows_existing_file_to_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, "{}").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o644)).unwrap();

        let storage = SecretStorage::with_path(file_path.clone());
        storage.save_openai_key("sk-private").unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(storage.load().unwrap().openai.unwrap().api_key, "sk-private");
    }

    #[cfg(unix)]
    #[test]
    fn test_new_secret_file_is_created_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        write_private(&file_path, b"{}").unwrap();

        let mode = fs::metadata(&file_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_key_wins_over_environment() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));
        storage.save_openai_key("from-file").unwrap();

        assert_eq!(storage.openai_secret().unwrap().api_key, "from-file");
    }
}
