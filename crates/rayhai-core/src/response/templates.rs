//! Reply template set.
//!
//! Templates are configuration data: each key holds one or more minijinja
//! sources. A key with several candidates is sampled uniformly at reply
//! time. Built-in French defaults ship with the engine and a TOML document
//! can replace individual keys.

use crate::error::{RayhaiError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Fixed reply to empty or whitespace-only input.
pub const EMPTY_INPUT_REPLY: &str = "Écris-moi quelque chose et je te réponds !";

/// Final reply when neither the templates nor the remote fallback could help.
pub const GENERIC_APOLOGY: &str =
    "Désolé, je n'ai pas de réponse complète pour ça en local. Reformule ou demande un autre sujet.";

/// Reply when a template fails to render.
pub const INTERNAL_APOLOGY: &str =
    "Oups, je me suis emmêlé les pinceaux. Tu peux reformuler ta question ?";

/// Message shown once when a transcript starts.
pub const WELCOME_MESSAGE: &str = "Salut, je suis RayhAI. Comment puis-je t'aider ?";

/// Replies to thanks. Plain text, no placeholders.
pub const THANKS_TEMPLATES: &[&str] = &[
    "Avec plaisir !",
    "De rien, n'hésite pas si tu as d'autres questions.",
    "Pas de souci, c'est fait pour ça !",
];

/// Template keys that are not intent names.
pub mod keys {
    pub const CLARIFICATION: &str = "clarification";
    pub const FOLLOW_UP_PREFIX: &str = "follow_up_prefix";
    pub const SKILL_CATEGORY: &str = "skill_category";
    pub const PERSONA_MENTION_SKILL: &str = "persona_mention_skill";
    pub const PERSONA_MENTION_PROJECT: &str = "persona_mention_project";
    pub const PERSONA_MENTION_PASSION: &str = "persona_mention_passion";
}

const DEFAULT_TEMPLATES: &[(&str, &[&str])] = &[
    (
        "greeting",
        &[
            "{{ salutation }}{% if user_name %} {{ user_name }}{% endif %} ! Je suis RayhAI, l'assistant de {{ name }}. Pose-moi tes questions sur son parcours, ses compétences ou ses projets.",
            "{{ salutation }}{% if user_name %} {{ user_name }}{% endif %} ! Ravi de te voir ici. Que veux-tu savoir sur {{ name }} ?",
        ],
    ),
    (
        "farewell",
        &[
            "À bientôt{% if user_name %} {{ user_name }}{% endif %} ! Merci pour ta visite.",
            "Au revoir{% if user_name %} {{ user_name }}{% endif %}, reviens quand tu veux !",
        ],
    ),
    (
        "help",
        &["Je peux te parler de {{ name }} : son âge, sa formation, ses compétences, ses projets, ses expériences, ses objectifs ou comment le contacter. Demande-moi par exemple « quelles sont ses compétences ? »."],
    ),
    (
        "introduction",
        &["Enchanté{% if user_name %} {{ user_name }}{% endif %} ! Je suis RayhAI, l'assistant de {{ name }}. Qu'est-ce qui t'amène ?"],
    ),
    (
        "ask_identity",
        &["Je suis RayhAI, l'assistant de {{ name }}{% if age %}, {{ age }} ans{% endif %}{% if status %}, {{ status }}{% endif %}{% if location %} à {{ location }}{% endif %}. {% if bio %}{{ bio }}{% endif %}{% if passions %} Passions : {{ passions }}.{% endif %}"],
    ),
    (
        "ask_age",
        &["{% if age %}{{ name }} a {{ age }} ans.{% else %}{{ name }} préfère garder son âge pour lui.{% endif %}"],
    ),
    (
        "ask_skills",
        &["{% if skills_summary %}Compétences de {{ name }} : {{ skills_summary }}.{% else %}{{ name }} n'a pas encore détaillé ses compétences ici.{% endif %}"],
    ),
    (
        "skill_category",
        &["En {{ category }}{% if category_level %}, son niveau est {{ category_level }}{% endif %} : {{ category_techs }}.{% if category_description %} {{ category_description }}{% endif %}"],
    ),
    (
        "ask_projects",
        &["{% if projects_summary %}Projets de {{ name }} : {{ projects_summary }}. Lequel veux-tu détailler ?{% else %}{{ name }} n'a pas encore présenté de projets ici.{% endif %}"],
    ),
    (
        "ask_experience",
        &["{% if experiences_summary %}Expériences de {{ name }} : {{ experiences_summary }}.{% else %}{{ name }} n'a pas encore d'expérience professionnelle à présenter.{% endif %}"],
    ),
    (
        "ask_goals",
        &["{% if goal_immediate %}Son objectif : {{ goal_immediate }}.{% if goal_long_term %} À long terme : {{ goal_long_term }}.{% endif %}{% else %}{{ name }} réfléchit encore à la suite de son parcours.{% endif %}"],
    ),
    (
        "ask_contact",
        &["{% if contact_email or contact_handle %}Tu peux joindre {{ name }}{% if contact_email %} par mail à {{ contact_email }}{% endif %}{% if contact_handle %}{% if contact_email %} ou{% endif %} via {{ contact_handle }}{% endif %}.{% if contact_response_time %} Réponse en général sous {{ contact_response_time }}.{% endif %}{% else %}Passe par la section contact du site pour joindre {{ name }}.{% endif %}"],
    ),
    (
        "ask_school",
        &["{% if school %}{{ name }} est en {{ school }}.{% else %}{{ name }} n'a pas précisé sa formation.{% endif %}"],
    ),
    (
        "ask_location",
        &["{% if location %}{{ name }} vit à {{ location }}.{% else %}{{ name }} n'a pas précisé où il vit.{% endif %}"],
    ),
    (
        "ask_languages",
        &["{% if languages %}Langues : {{ languages }}.{% else %}{{ name }} n'a pas listé ses langues.{% endif %}"],
    ),
    (
        "ask_passions",
        &["{% if passions %}{{ name }} aime {{ passions }}.{% else %}{{ name }} n'a pas encore partagé ses passions.{% endif %}"],
    ),
    (
        "encouragement",
        &["Courage{% if user_name %} {{ user_name }}{% endif %}, chaque pas compte !"],
    ),
    (
        "encouragement_motivated",
        &[
            "Cette motivation fait plaisir à voir{% if user_name %} {{ user_name }}{% endif %} ! Continue comme ça.",
            "Super état d'esprit ! {{ name }} dirait : on lâche rien.",
        ],
    ),
    (
        "encouragement_frustrated",
        &[
            "Je comprends, c'est frustrant{% if user_name %} {{ user_name }}{% endif %}. Fais une pause et reprends étape par étape, ça va venir.",
            "Tout le monde bloque parfois, {{ name }} aussi. Découpe le problème en petits morceaux.",
        ],
    ),
    (
        "encouragement_stressed",
        &["Respire un bon coup{% if user_name %} {{ user_name }}{% endif %}. Un pas après l'autre, tu vas y arriver."],
    ),
    (
        "persona_mention",
        &["Je peux te donner plus d'infos sur {{ name }}. Veux-tu un détail précis sur {{ topic }} ?"],
    ),
    (
        "persona_mention_skill",
        &["{{ mention_name }} ? Oui, ça fait partie de ses compétences en {{ mention_category }}{% if mention_level %} (niveau {{ mention_level }}){% endif %}."],
    ),
    (
        "persona_mention_project",
        &["{{ mention_name }} est un de ses projets{% if mention_year %} ({{ mention_year }}){% endif %}.{% if mention_description %} {{ mention_description }}{% endif %}{% if mention_techs %} Technologies : {{ mention_techs }}.{% endif %}"],
    ),
    (
        "persona_mention_passion",
        &["{{ mention_name }} fait partie des passions de {{ name }} !"],
    ),
    (
        "follow_up_prefix",
        &["Pour revenir là-dessus :", "Je reprends :"],
    ),
    (
        "general",
        &["Je suis RayhAI, l'assistant de {{ name }}. Tu peux me demander ses compétences, ses projets, son parcours ou ses objectifs."],
    ),
    (
        "clarification",
        &["Je ne suis pas sûr de comprendre{% if user_name %} {{ user_name }}{% endif %}. Tu veux parler de {{ topic }} ? Essaie de préciser ta question."],
    ),
];

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateEntry {
    One(String),
    Many(Vec<String>),
}

impl From<TemplateEntry> for Vec<String> {
    fn from(entry: TemplateEntry) -> Self {
        match entry {
            TemplateEntry::One(source) => vec![source],
            TemplateEntry::Many(sources) => sources,
        }
    }
}

/// Map of template key to candidate template sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    templates: BTreeMap<String, Vec<String>>,
}

impl Default for TemplateSet {
    fn default() -> Self {
        let mut templates: BTreeMap<String, Vec<String>> = DEFAULT_TEMPLATES
            .iter()
            .map(|(key, sources)| {
                (
                    key.to_string(),
                    sources.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        templates.insert(
            "thanks".to_string(),
            THANKS_TEMPLATES.iter().map(|s| s.to_string()).collect(),
        );
        Self { templates }
    }
}

impl TemplateSet {
    /// Parses a TOML document of template overrides.
    ///
    /// Each top-level key maps to a string or an array of strings:
    ///
    /// ```toml
    /// ask_age = "{{ name }} a {{ age }} ans."
    /// greeting = ["Salut !", "Hello !"]
    /// ```
    pub fn from_toml(document: &str) -> Result<Self> {
        let entries: BTreeMap<String, TemplateEntry> = toml::from_str(document)?;
        let mut templates = BTreeMap::new();
        for (key, entry) in entries {
            let sources: Vec<String> = entry.into();
            if sources.is_empty() {
                return Err(RayhaiError::config(format!(
                    "template key '{key}' has no candidates"
                )));
            }
            templates.insert(key, sources);
        }
        Ok(Self { templates })
    }

    /// Replaces every key present in `overrides`, keeping the others.
    pub fn merged(mut self, overrides: TemplateSet) -> Self {
        self.templates.extend(overrides.templates);
        self
    }

    /// Candidates for a key, if any.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.templates
            .get(key)
            .map(Vec::as_slice)
            .filter(|sources| !sources.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}
