//! Error types for RayhAI.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire RayhAI workspace.
///
/// None of these variants ever reaches the visitor: the engine converts
/// every error into a natural-language apology before replying.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum RayhaiError {
    /// The persona document could not be obtained or is unusable
    #[error("Persona error: {0}")]
    Persona(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Template compilation or rendering error
    #[error("Template error: {key} - {message}")]
    Template { key: String, message: String },

    /// Remote text-generation error (transport, HTTP status, or payload)
    #[error("Remote error{}: {message}", format_status(.status_code))]
    Remote {
        status_code: Option<u16>,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RayhaiError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Persona error
    pub fn persona(message: impl Into<String>) -> Self {
        Self::Persona(message.into())
    }

    /// Creates a Template error for the given template key
    pub fn template(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Template {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates a Remote error
    pub fn remote(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self::Remote {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a persona error
    pub fn is_persona(&self) -> bool {
        matches!(self, Self::Persona(_))
    }

    /// Check if this is a template error
    pub fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }

    /// Check if this is a remote error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<serde_json::Error> for RayhaiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for RayhaiError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

fn format_status(status_code: &Option<u16>) -> String {
    match status_code {
        Some(code) => format!(" ({code})"),
        None => String::new(),
    }
}

/// A type alias for `Result<T, RayhaiError>`.
pub type Result<T> = std::result::Result<T, RayhaiError>;
