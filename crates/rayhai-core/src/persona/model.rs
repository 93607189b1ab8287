//! Persona domain model.
//!
//! The profile describing the site owner. Every field defaults when absent
//! from the document, so a sparse persona still loads: consumers treat an
//! empty field as "nothing to say about this", never as an error.

use crate::error::{RayhaiError, Result};
use crate::keywords::{self, KeywordTable};
use crate::text::contains_keyword;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Static profile of the site owner, immutable for the session.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PersonaProfile {
    /// Display name of the owner
    pub name: String,
    pub age: Option<u32>,
    /// Current status, e.g. "Étudiant"
    pub status: String,
    pub school: String,
    pub location: String,
    /// Short presentation used by the identity reply and the remote prompt
    pub bio: String,
    /// One-line curriculum summary
    pub path: String,
    /// Skill categories keyed by category name
    pub skills: BTreeMap<String, SkillCategory>,
    pub projects: Vec<Project>,
    pub experiences: Vec<Experience>,
    #[serde(alias = "objectives")]
    pub goals: Goals,
    pub contact: Contact,
    pub passions: Vec<String>,
    pub languages: Vec<String>,
    /// Named keyword sets extending the built-in matching tables
    pub triggers: BTreeMap<String, Vec<String>>,
}

/// One skill category.
///
/// Accepts either a detailed object or a bare list of technology names.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "SkillCategoryRepr")]
pub struct SkillCategory {
    pub level: String,
    pub description: String,
    pub techs: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SkillCategoryRepr {
    List(Vec<String>),
    Detailed {
        #[serde(default)]
        level: String,
        #[serde(default)]
        description: String,
        #[serde(default, alias = "technologies", alias = "list")]
        techs: Vec<String>,
    },
}

impl From<SkillCategoryRepr> for SkillCategory {
    fn from(repr: SkillCategoryRepr) -> Self {
        match repr {
            SkillCategoryRepr::List(techs) => Self {
                techs,
                ..Self::default()
            },
            SkillCategoryRepr::Detailed {
                level,
                description,
                techs,
            } => Self {
                level,
                description,
                techs,
            },
        }
    }
}

/// A portfolio project. Accepts a bare string (the project name).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(from = "ProjectRepr")]
pub struct Project {
    pub name: String,
    pub year: String,
    pub description: String,
    pub techs: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProjectRepr {
    Name(String),
    Detailed {
        #[serde(default)]
        name: String,
        #[serde(default, deserialize_with = "lenient_string")]
        year: String,
        #[serde(default)]
        description: String,
        #[serde(default, alias = "technologies")]
        techs: Vec<String>,
    },
}

impl From<ProjectRepr> for Project {
    fn from(repr: ProjectRepr) -> Self {
        match repr {
            ProjectRepr::Name(name) => Self {
                name,
                ..Self::default()
            },
            ProjectRepr::Detailed {
                name,
                year,
                description,
                techs,
            } => Self {
                name,
                year,
                description,
                techs,
            },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub location: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(deserialize_with = "lenient_string")]
    pub duration: String,
    pub tasks: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Goals {
    #[serde(alias = "pro")]
    pub immediate: String,
    pub short_term: String,
    pub mid_term: String,
    pub long_term: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Contact {
    pub email: String,
    pub handle: String,
    pub response_time: String,
}

/// Something from the persona that a visitor mentioned by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Mention<'a> {
    Skill {
        category: &'a str,
        tech: &'a str,
        details: &'a SkillCategory,
    },
    Project(&'a Project),
    Passion(&'a str),
}

/// Accepts a string, a number, or null.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    })
}

/// Terms shorter than this are too ambiguous to count as a mention.
const MIN_TERM_LEN: usize = 3;

impl PersonaProfile {
    /// Parses a JSON persona document and checks it is usable.
    pub fn from_json(document: &str) -> Result<Self> {
        let profile: PersonaProfile = serde_json::from_str(document)?;
        profile.validate()?;
        Ok(profile)
    }

    /// A persona needs at least a name to be presented.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RayhaiError::persona("persona document has no name"));
        }
        Ok(())
    }

    /// Returns the skill category, or `None` when absent or empty.
    pub fn skill(&self, category: &str) -> Option<&SkillCategory> {
        self.skills
            .get(category)
            .filter(|skill| !skill.techs.is_empty() || !skill.level.is_empty())
    }

    /// Lowercased technologies, project names and passions of the persona.
    pub fn terms(&self) -> Vec<String> {
        let techs = self.skills.values().flat_map(|s| s.techs.iter());
        let projects = self.projects.iter().map(|p| &p.name);
        techs
            .chain(projects)
            .chain(self.passions.iter())
            .map(|term| term.trim().to_lowercase())
            .filter(|term| term.chars().count() >= MIN_TERM_LEN)
            .collect()
    }

    /// Built-in keyword sets extended with the persona triggers and terms.
    pub fn keyword_table(&self) -> KeywordTable {
        let mut table = KeywordTable::default();
        for (name, words) in &self.triggers {
            table.extend(name, words);
        }
        table.extend(keywords::PERSONA_TERMS, self.terms());
        table
    }

    /// Finds the first persona element named in a normalized message.
    ///
    /// Skills are searched first, then projects, then passions.
    pub fn find_mention(&self, normalized: &str) -> Option<Mention<'_>> {
        let named = |term: &str| {
            let term = term.trim().to_lowercase();
            term.chars().count() >= MIN_TERM_LEN && contains_keyword(normalized, &term)
        };

        for (category, details) in &self.skills {
            if let Some(tech) = details.techs.iter().find(|t| named(t.as_str())) {
                return Some(Mention::Skill {
                    category,
                    tech,
                    details,
                });
            }
        }
        if let Some(project) = self.projects.iter().find(|p| named(p.name.as_str())) {
            return Some(Mention::Project(project));
        }
        self.passions
            .iter()
            .find(|p| named(p.as_str()))
            .map(|p| Mention::Passion(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILED: &str = r#"{
        "name": "Rayhan",
        "age": 18,
        "skills": {
            "web": { "level": "Avancé", "techs": ["HTML", "CSS", "JS"] },
            "reseau": ["Cisco", "VLAN"]
        },
        "projects": [
            "Portfolio",
            { "name": "Bot Discord", "year": 2024, "techs": ["Python"] }
        ],
        "objectives": { "pro": "Entrer en BTS SIO" },
        "triggers": { "code_keywords": ["rust"] }
    }"#;

    #[test]
    fn test_parse_detailed_and_compact_shapes() {
        let persona = PersonaProfile::from_json(DETAILED).unwrap();
        assert_eq!(persona.age, Some(18));
        assert_eq!(persona.skills["web"].level, "Avancé");
        assert_eq!(persona.skills["reseau"].techs, vec!["Cisco", "VLAN"]);
        assert_eq!(persona.projects[0].name, "Portfolio");
        assert_eq!(persona.projects[1].year, "2024");
        assert_eq!(persona.goals.immediate, "Entrer en BTS SIO");
    }

    #[test]
    fn test_missing_fields_default() {
        let persona = PersonaProfile::from_json(r#"{ "name": "Rayhan" }"#).unwrap();
        assert!(persona.skill("ai").is_none());
        assert!(persona.projects.is_empty());
        assert_eq!(persona.contact, Contact::default());
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let err = PersonaProfile::from_json(r#"{ "age": 18 }"#).unwrap_err();
        assert!(err.is_persona());
    }

    #[test]
    fn test_keyword_table_includes_triggers_and_terms() {
        let persona = PersonaProfile::from_json(DETAILED).unwrap();
        let table = persona.keyword_table();
        assert!(table.matches(keywords::CODE, "tu fais du rust ?"));
        assert!(table.matches(keywords::PERSONA_TERMS, "et le bot discord ?"));
        // "JS" is too short to count as a term
        assert!(!table.matches(keywords::PERSONA_TERMS, "du js"));
    }

    #[test]
    fn test_find_mention() {
        let persona = PersonaProfile::from_json(DETAILED).unwrap();
        match persona.find_mention("tu connais les vlan ?") {
            Some(Mention::Skill { category, tech, .. }) => {
                assert_eq!(category, "reseau");
                assert_eq!(tech, "VLAN");
            }
            other => panic!("unexpected mention: {other:?}"),
        }
        assert!(matches!(
            persona.find_mention("parle du bot discord"),
            Some(Mention::Project(p)) if p.name == "Bot Discord"
        ));
        assert_eq!(persona.find_mention("rien à voir"), None);
    }
}
