//! Hardcoded fallback persona.

use super::model::PersonaProfile;

pub const FALLBACK_NAME: &str = "Rayhan";
pub const FALLBACK_BIO: &str =
    "Étudiant passionné d'informatique, de réseau et de cybersécurité.";

/// Minimal profile served when the persona document cannot be loaded.
pub fn fallback_profile() -> PersonaProfile {
    PersonaProfile {
        name: FALLBACK_NAME.to_string(),
        bio: FALLBACK_BIO.to_string(),
        ..PersonaProfile::default()
    }
}
