//! Visitor name extraction from self-introduction phrases.

use crate::text::capitalize_name;
use once_cell::sync::Lazy;
use regex::Regex;

const NAME: &str = r"([\p{L}][\p{L}-]*)";

/// Self-introduction patterns, tried in order; the first match wins.
static INTRODUCTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"(?i)\bje m'appelle\s+{NAME}"),
        format!(r"(?i)\bon m'appelle\s+{NAME}"),
        format!(r"(?i)\bmon (?:pré)?nom (?:est|c'est)\s+{NAME}"),
        format!(r"(?i)\bmoi c'est\s+{NAME}"),
        format!(r"(?i)\b(?:my name is|i am called|i'm called|call me)\s+{NAME}"),
        format!(r"(?i)^(?:c'est|it's|it is)\s+{NAME}\s*[.!]*$"),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
    .collect()
});

/// Words that follow "c'est" without being a name.
const NOT_A_NAME: &[&str] = &["moi", "toi", "bon", "ok", "cool", "top", "vrai", "super", "quoi", "nul"];

/// Extracts the visitor's first name from `text`, capitalized.
///
/// `text` is expected in normalized form (see `text::normalize`): matching
/// is case-insensitive and the captured name is re-capitalized per hyphen
/// segment, so lowercasing loses nothing but the typed casing.
pub fn extract_user_name(text: &str) -> Option<String> {
    INTRODUCTION_PATTERNS.iter().find_map(|pattern| {
        let candidate = pattern.captures(text)?.get(1)?.as_str();
        let lowered = candidate.to_lowercase();
        if NOT_A_NAME.contains(&lowered.as_str()) {
            return None;
        }
        Some(capitalize_name(candidate))
    })
}
