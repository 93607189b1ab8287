//! Template-based reply generation.

use super::templates::{TemplateSet, keys};
use super::time_of_day::TimeOfDay;
use crate::error::{RayhaiError, Result};
use crate::intent::Intent;
use crate::mood::Mood;
use crate::persona::{Mention, PersonaProfile, SkillCategory};
use crate::session::SessionContext;
use crate::text::contains_keyword;
use crate::topic::Topic;
use minijinja::Environment;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value, json};

/// Default number of completed turns after which an unmatched message
/// gets a clarification request instead of the generic introduction.
pub const DEFAULT_CLARIFICATION_DEPTH: u32 = 2;

/// Everything a reply depends on.
#[derive(Debug, Clone, Copy)]
pub struct ReplyRequest<'a> {
    pub intent: Intent,
    pub raw_text: &'a str,
    pub normalized: &'a str,
    pub topic: Topic,
    pub mood: Mood,
    pub persona: &'a PersonaProfile,
    pub session: &'a SessionContext,
    pub time_of_day: TimeOfDay,
}

/// A rendered reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedReply {
    pub text: String,
    /// Intent whose templates produced the text. Differs from the
    /// requested intent for follow-ups.
    pub answered: Intent,
    /// Whether the reply is a confident local answer.
    pub confident: bool,
}

/// Renders replies from a [`TemplateSet`].
///
/// Generation is a pure function of the request and the rng: the same
/// inputs with the same rng state give the same text.
pub struct ResponseGenerator {
    templates: TemplateSet,
    env: Environment<'static>,
    clarification_depth: u32,
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new(TemplateSet::default(), DEFAULT_CLARIFICATION_DEPTH)
    }
}

impl ResponseGenerator {
    pub fn new(templates: TemplateSet, clarification_depth: u32) -> Self {
        Self {
            templates,
            env: Environment::new(),
            clarification_depth,
        }
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: &ReplyRequest<'_>,
        rng: &mut R,
    ) -> Result<GeneratedReply> {
        let mut context = base_context(request);

        if request.intent == Intent::FollowUp {
            let answered = match request.session.last_answered {
                Some(previous) if previous != Intent::FollowUp => previous,
                _ => Intent::General,
            };
            let prefix = self.render_key(keys::FOLLOW_UP_PREFIX, &context, rng)?;
            let body = self.render_intent(answered, request, &mut context, rng)?;
            return Ok(GeneratedReply {
                text: format!("{prefix} {body}"),
                answered,
                confident: answered.is_confident(),
            });
        }

        let text = self.render_intent(request.intent, request, &mut context, rng)?;
        Ok(GeneratedReply {
            text,
            answered: request.intent,
            confident: request.intent.is_confident(),
        })
    }

    fn render_intent<R: Rng + ?Sized>(
        &self,
        intent: Intent,
        request: &ReplyRequest<'_>,
        context: &mut Map<String, Value>,
        rng: &mut R,
    ) -> Result<String> {
        let key = match intent {
            Intent::General if request.session.conversation_depth > self.clarification_depth => {
                keys::CLARIFICATION.to_string()
            }
            Intent::AskSkills => match named_category(request.persona, request.normalized) {
                Some((category, details)) => {
                    insert_category(context, category, details);
                    keys::SKILL_CATEGORY.to_string()
                }
                None => intent.to_string(),
            },
            Intent::Encouragement => {
                let variant = format!("{intent}_{}", request.mood);
                self.first_present(variant, &intent.to_string())
            }
            Intent::PersonaMention => match request.persona.find_mention(request.normalized) {
                Some(mention) => {
                    let variant = insert_mention(context, &mention);
                    self.first_present(variant.to_string(), &intent.to_string())
                }
                None => intent.to_string(),
            },
            _ => intent.to_string(),
        };
        self.render_key(&key, context, rng)
    }

    fn first_present(&self, variant: String, base: &str) -> String {
        if self.templates.contains(&variant) {
            variant
        } else {
            base.to_string()
        }
    }

    fn render_key<R: Rng + ?Sized>(
        &self,
        key: &str,
        context: &Map<String, Value>,
        rng: &mut R,
    ) -> Result<String> {
        let candidates = self
            .templates
            .get(key)
            .ok_or_else(|| RayhaiError::template(key, "no template for key"))?;
        let source = if candidates.len() == 1 {
            &candidates[0]
        } else {
            candidates
                .choose(rng)
                .ok_or_else(|| RayhaiError::template(key, "no template for key"))?
        };
        let rendered = self
            .env
            .render_str(source, context)
            .map_err(|e| RayhaiError::template(key, e.to_string()))?;
        Ok(squash_spaces(&rendered))
    }
}

/// Collapses runs of whitespace left by empty conditional blocks.
fn squash_spaces(rendered: &str) -> String {
    rendered.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn base_context(request: &ReplyRequest<'_>) -> Map<String, Value> {
    let persona = request.persona;
    let session = request.session;
    let context = json!({
        "name": persona.name,
        "age": persona.age,
        "status": persona.status,
        "school": persona.school,
        "location": persona.location,
        "bio": persona.bio,
        "path": persona.path,
        "skills_summary": skills_summary(persona),
        "projects_summary": projects_summary(persona),
        "experiences_summary": experiences_summary(persona),
        "passions": persona.passions.join(", "),
        "languages": persona.languages.join(", "),
        "goal_immediate": persona.goals.immediate,
        "goal_short_term": persona.goals.short_term,
        "goal_mid_term": persona.goals.mid_term,
        "goal_long_term": persona.goals.long_term,
        "contact_email": persona.contact.email,
        "contact_handle": persona.contact.handle,
        "contact_response_time": persona.contact.response_time,
        "user_name": session.user_name,
        "user_text": request.raw_text,
        "salutation": request.time_of_day.salutation(),
        "time_of_day": request.time_of_day.to_string(),
        "topic": request.topic.label(),
        "mood": request.mood.to_string(),
        "depth": session.conversation_depth,
    });
    match context {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `web (Avancé) : HTML, CSS, JS ; reseau : Cisco, VLAN`
fn skills_summary(persona: &PersonaProfile) -> String {
    persona
        .skills
        .iter()
        .filter(|(_, details)| !details.techs.is_empty())
        .map(|(category, details)| {
            if details.level.is_empty() {
                format!("{category} : {}", details.techs.join(", "))
            } else {
                format!("{category} ({}) : {}", details.level, details.techs.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join(" ; ")
}

fn projects_summary(persona: &PersonaProfile) -> String {
    persona
        .projects
        .iter()
        .filter(|p| !p.name.is_empty())
        .map(|p| {
            if p.year.is_empty() {
                p.name.clone()
            } else {
                format!("{} ({})", p.name, p.year)
            }
        })
        .collect::<Vec<_>>()
        .join(" • ")
}

fn experiences_summary(persona: &PersonaProfile) -> String {
    persona
        .experiences
        .iter()
        .filter(|e| !e.title.is_empty())
        .map(|e| {
            let mut line = e.title.clone();
            if !e.location.is_empty() {
                line.push_str(&format!(" à {}", e.location));
            }
            if !e.year.is_empty() {
                line.push_str(&format!(" ({})", e.year));
            }
            line
        })
        .collect::<Vec<_>>()
        .join(" ; ")
}

/// A skill category whose name appears in the message.
fn named_category<'a>(
    persona: &'a PersonaProfile,
    normalized: &str,
) -> Option<(&'a str, &'a SkillCategory)> {
    persona
        .skills
        .iter()
        .filter(|(_, details)| !details.techs.is_empty())
        .find(|(category, _)| contains_keyword(normalized, &category.to_lowercase()))
        .map(|(category, details)| (category.as_str(), details))
}

fn insert_category(context: &mut Map<String, Value>, category: &str, details: &SkillCategory) {
    context.insert("category".into(), json!(category));
    context.insert("category_level".into(), json!(details.level));
    context.insert("category_description".into(), json!(details.description));
    context.insert("category_techs".into(), json!(details.techs.join(", ")));
}

/// Adds the mention fields and returns the template key for its kind.
fn insert_mention(context: &mut Map<String, Value>, mention: &Mention<'_>) -> &'static str {
    match mention {
        Mention::Skill {
            category,
            tech,
            details,
        } => {
            context.insert("mention_name".into(), json!(tech));
            context.insert("mention_category".into(), json!(category));
            context.insert("mention_level".into(), json!(details.level));
            keys::PERSONA_MENTION_SKILL
        }
        Mention::Project(project) => {
            context.insert("mention_name".into(), json!(project.name));
            context.insert("mention_year".into(), json!(project.year));
            context.insert("mention_description".into(), json!(project.description));
            context.insert("mention_techs".into(), json!(project.techs.join(", ")));
            keys::PERSONA_MENTION_PROJECT
        }
        Mention::Passion(passion) => {
            context.insert("mention_name".into(), json!(passion));
            keys::PERSONA_MENTION_PASSION
        }
    }
}
