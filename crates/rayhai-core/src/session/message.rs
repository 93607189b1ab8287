//! Conversation exchange types.

use crate::intent::Intent;
use serde::{Deserialize, Serialize};

/// Who produced an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeRole {
    /// Message typed by the visitor.
    User,
    /// Reply produced by the engine.
    Assistant,
}

/// A single entry of the rolling conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub role: ExchangeRole,
    /// Raw text as typed or as replied.
    pub text: String,
    /// Intent the reply answered; set on assistant entries only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    /// Timestamp when the entry was recorded (RFC 3339).
    pub timestamp: String,
}

impl Exchange {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ExchangeRole::User,
            text: text.into(),
            intent: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn assistant(text: impl Into<String>, intent: Intent) -> Self {
        Self {
            role: ExchangeRole::Assistant,
            text: text.into(),
            intent: Some(intent),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
