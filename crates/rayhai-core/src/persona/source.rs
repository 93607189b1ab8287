//! Persona source trait.
//!
//! Defines where the persona document comes from.

use super::model::PersonaProfile;
use crate::error::Result;

/// An abstract source of the persona profile.
///
/// This trait decouples the engine from the specific location of the
/// persona document (file on disk, HTTP URL, bundled asset).
///
/// # Implementation Notes
///
/// Implementations should return an error for any unusable document
/// (I/O failure, bad status, malformed JSON, missing name). The store
/// turns every error into the fallback profile.
#[async_trait::async_trait]
pub trait PersonaSource: Send + Sync {
    /// Fetches and parses the persona document.
    ///
    /// # Returns
    ///
    /// - `Ok(PersonaProfile)`: a validated profile
    /// - `Err(RayhaiError)`: the document could not be used
    async fn fetch(&self) -> Result<PersonaProfile>;

    /// Human-readable location, used in log messages.
    fn describe(&self) -> String;
}

/// A source serving an already-built profile.
#[derive(Debug, Clone)]
pub struct StaticPersonaSource {
    profile: PersonaProfile,
}

impl StaticPersonaSource {
    pub fn new(profile: PersonaProfile) -> Self {
        Self { profile }
    }
}

#[async_trait::async_trait]
impl PersonaSource for StaticPersonaSource {
    async fn fetch(&self) -> Result<PersonaProfile> {
        self.profile.validate()?;
        Ok(self.profile.clone())
    }

    fn describe(&self) -> String {
        format!("static persona '{}'", self.profile.name)
    }
}
