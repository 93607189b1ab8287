use crate::GlobalOptions;
use crate::bootstrap::build_engine;
use anyhow::Result;
use colored::Colorize;
use rayhai_core::persona::PersonaProfile;

pub async fn run(options: &GlobalOptions, json: bool) -> Result<()> {
    let engine = build_engine(options).await?;
    let persona = engine.persona().await;

    if engine.persona_is_fallback().await {
        eprintln!(
            "{}",
            "Persona document could not be loaded; showing the built-in fallback.".yellow()
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&*persona)?);
    } else {
        for line in summary_lines(&persona) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Human-readable overview, one line per non-empty section.
fn summary_lines(persona: &PersonaProfile) -> Vec<String> {
    let mut lines = vec![persona.name.bold().to_string()];

    let mut push = |label: &str, value: String| {
        if !value.is_empty() {
            lines.push(format!("  {:<10} {}", label, value));
        }
    };

    push("Âge", persona.age.map(|a| format!("{} ans", a)).unwrap_or_default());
    push("Statut", persona.status.clone());
    push("Formation", persona.school.clone());
    push("Ville", persona.location.clone());
    push(
        "Skills",
        persona
            .skills
            .iter()
            .map(|(category, skill)| format!("{} ({})", category, skill.techs.join(", ")))
            .collect::<Vec<_>>()
            .join(" ; "),
    );
    push(
        "Projets",
        persona
            .projects
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>()
            .join(", "),
    );
    push("Passions", persona.passions.join(", "));
    push("Contact", persona.contact.email.clone());

    lines
}
