//! Unified path management for RayhAI files.
//!
//! ```text
//! ~/.config/rayhai/
//! ├── config.toml        # Engine configuration
//! ├── secret.json        # API keys (opt-in)
//! └── transcript.json    # Capped chat transcript
//! ```

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

pub struct RayhaiPaths;

impl RayhaiPaths {
    /// Returns the configuration directory: `~/.config/rayhai/`.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("rayhai"))
    }

    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the secrets file.
    ///
    /// # Security Note
    ///
    /// The file is written with mode 600 on Unix by `SecretStorage::save`.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    pub fn transcript_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("transcript.json"))
    }
}
