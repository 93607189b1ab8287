//! Remote text-generation seam.
//!
//! The engine only knows this trait; the OpenAI client lives in
//! `rayhai-interaction`.

use crate::error::Result;
use crate::persona::PersonaProfile;

/// One request to the remote fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    /// System instruction derived from the persona
    pub system_instruction: String,
    /// The visitor's raw message
    pub user_text: String,
}

impl RemoteRequest {
    pub fn new(persona: &PersonaProfile, user_text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction(persona),
            user_text: user_text.into(),
        }
    }
}

/// A remote text generator answering uncertain turns.
///
/// # Implementation Notes
///
/// Implementations make a single attempt: no retries. An empty or
/// malformed answer must be reported as an error.
#[async_trait::async_trait]
pub trait RemoteResponder: Send + Sync {
    async fn respond(&self, request: &RemoteRequest) -> Result<String>;

    /// Short label for log messages, e.g. the model name.
    fn name(&self) -> String;
}

/// Builds the system instruction sent with every remote request.
pub fn system_instruction(persona: &PersonaProfile) -> String {
    let mut instruction = format!(
        "You are RayhAI, assistant for {}. Answer in French. Use persona facts if relevant. Be concise and professional.",
        persona.name
    );

    let mut facts = Vec::new();
    if let Some(age) = persona.age {
        facts.push(format!("age: {age}"));
    }
    for (label, value) in [
        ("status", &persona.status),
        ("school", &persona.school),
        ("location", &persona.location),
        ("bio", &persona.bio),
        ("path", &persona.path),
    ] {
        if !value.is_empty() {
            facts.push(format!("{label}: {value}"));
        }
    }
    let techs: Vec<&str> = persona
        .skills
        .values()
        .flat_map(|s| s.techs.iter().map(String::as_str))
        .collect();
    if !techs.is_empty() {
        facts.push(format!("skills: {}", techs.join(", ")));
    }
    let projects: Vec<&str> = persona.projects.iter().map(|p| p.name.as_str()).collect();
    if !projects.is_empty() {
        facts.push(format!("projects: {}", projects.join(", ")));
    }
    if !persona.passions.is_empty() {
        facts.push(format!("passions: {}", persona.passions.join(", ")));
    }
    if !persona.goals.immediate.is_empty() {
        facts.push(format!("goal: {}", persona.goals.immediate));
    }

    if !facts.is_empty() {
        instruction.push_str("\nPersona facts:\n- ");
        instruction.push_str(&facts.join("\n- "));
    }
    instruction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::fallback_profile;

    #[test]
    fn test_instruction_names_persona_and_lists_facts() {
        let persona = PersonaProfile::from_json(
            r#"{ "name": "Rayhan", "age": 18, "skills": { "web": ["HTML", "CSS"] } }"#,
        )
        .unwrap();
        let instruction = system_instruction(&persona);
        assert!(instruction.starts_with("You are RayhAI, assistant for Rayhan."));
        assert!(instruction.contains("- age: 18"));
        assert!(instruction.contains("- skills: HTML, CSS"));
    }

    #[test]
    fn test_fallback_instruction() {
        let request = RemoteRequest::new(&fallback_profile(), "bonjour");
        assert!(request.system_instruction.contains("Rayhan"));
        assert_eq!(request.user_text, "bonjour");
    }
}
