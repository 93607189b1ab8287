//! Lazily-loaded persona cache.

use super::fallback::fallback_profile;
use super::model::PersonaProfile;
use super::source::PersonaSource;
use crate::keywords::KeywordTable;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Where the cached persona came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaOrigin {
    /// Loaded from the configured source
    Source,
    /// The source failed; the hardcoded fallback is served
    Fallback,
}

/// A persona together with the keyword table derived from it.
#[derive(Debug, Clone)]
pub struct LoadedPersona {
    pub profile: Arc<PersonaProfile>,
    pub keywords: Arc<KeywordTable>,
    pub origin: PersonaOrigin,
}

impl LoadedPersona {
    fn new(profile: PersonaProfile, origin: PersonaOrigin) -> Self {
        let keywords = profile.keyword_table();
        Self {
            profile: Arc::new(profile),
            keywords: Arc::new(keywords),
            origin,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == PersonaOrigin::Fallback
    }
}

/// Loads the persona once and serves it for the rest of the session.
///
/// `PersonaStore` never fails: when the source errors, the fallback profile
/// is cached instead and the engine keeps answering with generic content.
pub struct PersonaStore {
    source: Arc<dyn PersonaSource>,
    cached: OnceCell<LoadedPersona>,
}

impl PersonaStore {
    pub fn new(source: Arc<dyn PersonaSource>) -> Self {
        Self {
            source,
            cached: OnceCell::new(),
        }
    }

    /// Fetches the persona from the source, degrading to the fallback.
    ///
    /// This does not touch the cache; use [`PersonaStore::get`] for the
    /// session persona.
    pub async fn load(&self) -> LoadedPersona {
        match self.source.fetch().await {
            Ok(profile) => {
                tracing::info!(
                    "[PersonaStore] Loaded persona '{}' from {}",
                    profile.name,
                    self.source.describe()
                );
                LoadedPersona::new(profile, PersonaOrigin::Source)
            }
            Err(e) => {
                tracing::warn!(
                    "[PersonaStore] Failed to load persona from {}: {}. Using fallback profile",
                    self.source.describe(),
                    e
                );
                LoadedPersona::new(fallback_profile(), PersonaOrigin::Fallback)
            }
        }
    }

    /// Returns the cached persona, loading it on first use.
    ///
    /// Concurrent first callers share a single load.
    pub async fn get(&self) -> &LoadedPersona {
        self.cached.get_or_init(|| self.load()).await
    }

    /// Returns the cached persona without loading it.
    pub fn cached(&self) -> Option<&LoadedPersona> {
        self.cached.get()
    }
}
