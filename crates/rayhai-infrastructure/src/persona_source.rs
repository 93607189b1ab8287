//! Persona document sources.
//!
//! Every source reads a JSON document and hands it to
//! `PersonaProfile::from_json`; failures surface as `RayhaiError` and are
//! turned into the fallback profile by the `PersonaStore`.

use async_trait::async_trait;
use rayhai_core::config::PersonaLocation;
use rayhai_core::persona::{PersonaProfile, PersonaSource};
use rayhai_core::{RayhaiError, Result};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Persona document shipped inside the binary.
pub const BUNDLED_PERSONA: &str = include_str!("../assets/persona.json");

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Reads the persona from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FilePersonaSource {
    path: PathBuf,
}

impl FilePersonaSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PersonaSource for FilePersonaSource {
    async fn fetch(&self) -> Result<PersonaProfile> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RayhaiError::persona(format!("failed to read {}: {e}", self.path.display()))
        })?;
        PersonaProfile::from_json(&content)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Fetches the persona document over HTTP, bypassing caches.
#[derive(Debug, Clone)]
pub struct HttpPersonaSource {
    client: Client,
    url: String,
}

impl HttpPersonaSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl PersonaSource for HttpPersonaSource {
    async fn fetch(&self) -> Result<PersonaProfile> {
        let response = self
            .client
            .get(&self.url)
            .header("cache-control", "no-store")
            .timeout(HTTP_TIMEOUT)
            .send()
            .await
            .map_err(|e| RayhaiError::persona(format!("request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RayhaiError::persona(format!(
                "{} answered with status {}",
                self.url,
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RayhaiError::persona(format!("failed to read body: {e}")))?;
        PersonaProfile::from_json(&body)
    }

    fn describe(&self) -> String {
        format!("url {}", self.url)
    }
}

/// Serves the persona compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledPersonaSource;

#[async_trait]
impl PersonaSource for BundledPersonaSource {
    async fn fetch(&self) -> Result<PersonaProfile> {
        PersonaProfile::from_json(BUNDLED_PERSONA)
    }

    fn describe(&self) -> String {
        "bundled persona".to_string()
    }
}

/// Builds the source for a configured location.
pub fn persona_source_for(location: &PersonaLocation) -> Arc<dyn PersonaSource> {
    match location {
        PersonaLocation::Bundled => Arc::new(BundledPersonaSource),
        PersonaLocation::Path(path) => Arc::new(FilePersonaSource::new(path.clone())),
        PersonaLocation::Url(url) => Arc::new(HttpPersonaSource::new(url.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_bundled_persona_is_valid() {
        let persona = BundledPersonaSource.fetch().await.unwrap();
        assert_eq!(persona.name, "Rayhan");
        assert_eq!(persona.age, Some(18));
        assert!(persona.passions.iter().any(|p| p == "Valorant"));
        assert_eq!(persona.goals.immediate, "Entrer en BTS SIO option SISR");
    }

    #[tokio::test]
    async fn test_file_source_reads_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("persona.json");
        fs::write(&path, r#"{ "name": "Léa", "skills": { "web": ["HTML"] } }"#).unwrap();

        let persona = FilePersonaSource::new(&path).fetch().await.unwrap();
        assert_eq!(persona.name, "Léa");
        assert_eq!(persona.skills["web"].techs, vec!["HTML"]);
    }

    #[tokio::test]
    async fn test_file_source_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = FilePersonaSource::new(temp_dir.path().join("missing.json"));
        assert!(missing.fetch().await.unwrap_err().is_persona());

        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(FilePersonaSource::new(&path).fetch().await.is_err());
    }

    #[test]
    fn test_source_for_location() {
        let source = persona_source_for(&PersonaLocation::Url("http://localhost/p.json".into()));
        assert_eq!(source.describe(), "url http://localhost/p.json");
        let source = persona_source_for(&PersonaLocation::Bundled);
        assert_eq!(source.describe(), "bundled persona");
    }
}
