//! Visitor mood detection.

use crate::keywords::{self, KeywordTable};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Mood inferred from the latest visitor message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Mood {
    #[default]
    Neutral,
    Motivated,
    Frustrated,
    Stressed,
}

static MOTIVATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(je veux (réussir|progresser|apprendre)|on y va|let'?s go|go+ ?!)")
        .expect("valid regex")
});
static DIFFICULTY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(j'?y arrive (pas|plus)|ça marche pas|je comprends (rien|pas)|c'est dur)")
        .expect("valid regex")
});
static STRESS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(j'ai peur|trop de pression|je panique|examen demain)").expect("valid regex")
});

/// Detects the mood of a normalized message.
///
/// Categories are tested in a fixed order (motivation, difficulty, stress);
/// the first one whose keyword set or pattern matches wins.
pub fn detect_mood(normalized: &str, table: &KeywordTable) -> Mood {
    let checks: [(&str, &Lazy<Regex>, Mood); 3] = [
        (keywords::MOTIVATION, &MOTIVATION_RE, Mood::Motivated),
        (keywords::DIFFICULTY, &DIFFICULTY_RE, Mood::Frustrated),
        (keywords::STRESS, &STRESS_RE, Mood::Stressed),
    ];

    checks
        .into_iter()
        .find(|(set, pattern, _)| table.matches(set, normalized) || pattern.is_match(normalized))
        .map(|(_, _, mood)| mood)
        .unwrap_or_default()
}
