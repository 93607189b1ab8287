//! Named keyword sets used for intent, mood and topic matching.
//!
//! The built-in sets can be extended by the persona document through its
//! `triggers` map: a trigger named like a built-in set adds words to it,
//! any other name creates a new set.

use crate::text::contains_keyword;
use std::collections::BTreeMap;

pub const MOTIVATION: &str = "motivation_keywords";
pub const DIFFICULTY: &str = "difficulty_keywords";
pub const STRESS: &str = "stress_keywords";
pub const PERSONAL: &str = "personal_keywords";
pub const TECHNICAL: &str = "technical_keywords";
pub const CAREER: &str = "career_keywords";
pub const PROJECT: &str = "project_keywords";
pub const SKILL: &str = "skill_keywords";
pub const CODE: &str = "code_keywords";
pub const EXPERIENCE: &str = "experience_keywords";
pub const GOAL: &str = "goal_keywords";
pub const CONTACT: &str = "contact_keywords";
pub const SCHOOL: &str = "school_keywords";
pub const PASSION: &str = "passion_keywords";
/// Derived from the persona itself (technologies, project names, passions).
pub const PERSONA_TERMS: &str = "persona_terms";

const DEFAULT_SETS: &[(&str, &[&str])] = &[
    (
        MOTIVATION,
        &["motivé", "motivée", "motivation", "déterminé", "à fond", "j'ai envie", "prêt"],
    ),
    (
        DIFFICULTY,
        &[
            "difficile",
            "galère",
            "galérer",
            "bloqué",
            "bloquée",
            "j'y arrive pas",
            "je n'y arrive pas",
            "compliqué",
            "démotivé",
            "nul",
        ],
    ),
    (
        STRESS,
        &["stress", "stressé", "stressée", "angoisse", "peur", "pression", "inquiet", "inquiète"],
    ),
    (
        PERSONAL,
        &[
            "âge", "age", "ville", "habite", "famille", "passion", "loisir", "hobby", "sport",
            "toi", "qui",
        ],
    ),
    (
        TECHNICAL,
        &[
            "compétence", "skill", "techno", "technologie", "code", "coder", "programmation",
            "réseau", "cybersécurité", "linux", "python", "javascript", "html", "css",
        ],
    ),
    (
        CAREER,
        &[
            "stage", "bts", "objectif", "métier", "avenir", "emploi", "carrière", "alternance",
            "expérience", "travail", "job",
        ],
    ),
    (PROJECT, &["projet", "portfolio", "réalisation", "site", "application"]),
    (
        SKILL,
        &["compétence", "skill", "techno", "technologie", "maîtrise", "sais faire", "stack"],
    ),
    (
        CODE,
        &["code", "coder", "programmer", "programmation", "développement", "développeur", "dev"],
    ),
    (
        EXPERIENCE,
        &["expérience", "stage", "job", "travail", "alternance", "boulot", "emploi"],
    ),
    (
        GOAL,
        &["objectif", "avenir", "futur", "bts", "ambition", "plus tard", "projet professionnel"],
    ),
    (
        CONTACT,
        &["contact", "contacter", "email", "mail", "joindre", "linkedin", "discord", "écrire"],
    ),
    (
        SCHOOL,
        &["école", "études", "lycée", "scolaire", "formation", "bac", "diplôme", "classe"],
    ),
    (
        PASSION,
        &[
            "passion", "loisir", "hobby", "centre d'intérêt", "centres d'intérêt", "intérêt",
            "jeu", "sport", "aime",
        ],
    ),
];

/// A table of named keyword sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    sets: BTreeMap<String, Vec<String>>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        let sets = DEFAULT_SETS
            .iter()
            .map(|(name, words)| {
                (
                    (*name).to_string(),
                    words.iter().map(|w| (*w).to_string()).collect(),
                )
            })
            .collect();
        Self { sets }
    }
}

impl KeywordTable {
    /// Creates an empty table.
    pub fn empty() -> Self {
        Self {
            sets: BTreeMap::new(),
        }
    }

    /// Adds words to the named set, creating it if needed.
    ///
    /// Words are lowercased and duplicates are skipped.
    pub fn extend<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = self.sets.entry(name.to_string()).or_default();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() && !set.contains(&word) {
                set.push(word);
            }
        }
    }

    /// Returns the words of a set (empty when the set is unknown).
    pub fn get(&self, name: &str) -> &[String] {
        self.sets.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the first word of the named set that occurs in `normalized`.
    pub fn find<'a>(&'a self, name: &str, normalized: &str) -> Option<&'a str> {
        self.get(name)
            .iter()
            .find(|word| contains_keyword(normalized, word))
            .map(String::as_str)
    }

    /// Returns true when any word of the named set occurs in `normalized`.
    pub fn matches(&self, name: &str, normalized: &str) -> bool {
        self.find(name, normalized).is_some()
    }

    /// Names of all sets in the table.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }
}
