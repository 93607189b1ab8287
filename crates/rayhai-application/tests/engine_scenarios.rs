//! End-to-end conversations through `ResponseEngine`.

use rayhai_application::ResponseEngine;
use rayhai_core::clock::FixedClock;
use rayhai_core::config::EngineConfig;
use rayhai_core::intent::Intent;
use rayhai_core::mood::Mood;
use rayhai_core::persona::{PersonaProfile, PersonaSource, StaticPersonaSource};
use rayhai_core::remote::{RemoteRequest, RemoteResponder};
use rayhai_core::response::{EMPTY_INPUT_REPLY, GENERIC_APOLOGY, THANKS_TEMPLATES};
use rayhai_core::session::ExchangeRole;
use rayhai_core::{RayhaiError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const PERSONA: &str = r#"{
    "name": "Rayhan",
    "age": 18,
    "location": "Toulon",
    "skills": {
        "web": { "level": "Avancé", "techs": ["HTML", "CSS", "JS"] }
    },
    "projects": [{ "name": "Portfolio", "year": 2025 }],
    "passions": ["Valorant"]
}"#;

struct FailingSource;

#[async_trait::async_trait]
impl PersonaSource for FailingSource {
    async fn fetch(&self) -> Result<PersonaProfile> {
        Err(RayhaiError::persona("persona.json not found"))
    }

    fn describe(&self) -> String {
        "failing source".to_string()
    }
}

enum Behavior {
    Answer(&'static str),
    Fail,
    Hang,
}

struct MockRemote {
    calls: AtomicUsize,
    last_request: std::sync::Mutex<Option<RemoteRequest>>,
    behavior: Behavior,
}

impl MockRemote {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            last_request: std::sync::Mutex::new(None),
            behavior,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RemoteResponder for MockRemote {
    async fn respond(&self, request: &RemoteRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        match self.behavior {
            Behavior::Answer(text) => Ok(text.to_string()),
            Behavior::Fail => Err(RayhaiError::remote(Some(500), "server error")),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }

    fn name(&self) -> String {
        "mock".to_string()
    }
}

fn persona() -> PersonaProfile {
    PersonaProfile::from_json(PERSONA).unwrap()
}

fn engine_with(config: EngineConfig) -> ResponseEngine {
    ResponseEngine::builder()
        .config(config)
        .persona_source(Arc::new(StaticPersonaSource::new(persona())))
        .clock(Arc::new(FixedClock(9)))
        .seed(42)
        .build()
}

fn engine() -> ResponseEngine {
    engine_with(EngineConfig::default())
}

#[tokio::test]
async fn test_empty_input_gets_fixed_reply_without_state_change() {
    let engine = engine();

    assert_eq!(engine.ask("").await, EMPTY_INPUT_REPLY);
    assert_eq!(engine.ask("   \t  ").await, EMPTY_INPUT_REPLY);

    let info = engine.session_info().await;
    assert_eq!(info.depth, 0);
    assert!(info.history.is_empty());
    assert_eq!(info.last_intent, None);
}

#[tokio::test]
async fn test_greeting_in_any_case_and_spacing() {
    let engine = engine();

    for text in ["bonjour", "  BONJOUR   ", "Salut", "hello   RayhAI", "Hey !"] {
        let reply = engine.ask(text).await;
        assert!(reply.starts_with("Bonjour"), "{text:?} -> {reply}");
        assert_eq!(engine.session_info().await.last_intent, Some(Intent::Greeting));
    }
}

#[tokio::test]
async fn test_question_wins_over_leading_greeting() {
    let engine = engine();

    let reply = engine.ask("Bonjour, quelles sont tes compétences ?").await;
    assert_eq!(engine.session_info().await.last_intent, Some(Intent::AskSkills));
    assert!(reply.contains("HTML, CSS, JS"));
}

#[tokio::test]
async fn test_skills_reply_mentions_level_and_techs() {
    let engine = engine();

    let reply = engine.ask("Quelles sont ses compétences ?").await;
    assert!(reply.contains("Avancé"), "{reply}");
    assert!(reply.contains("HTML, CSS, JS"), "{reply}");
}

#[tokio::test]
async fn test_thanks_uses_fixed_templates() {
    let engine = engine();

    for _ in 0..5 {
        let reply = engine.ask("merci").await;
        assert!(THANKS_TEMPLATES.contains(&reply.as_str()), "{reply}");
    }
}

#[tokio::test]
async fn test_mood_is_overwritten_every_turn() {
    let engine = engine();

    engine.ask("je suis stressé pour demain").await;
    assert_eq!(engine.session_info().await.mood, Mood::Stressed);

    engine.ask("je suis motivé à fond").await;
    assert_eq!(engine.session_info().await.mood, Mood::Motivated);

    engine.ask("où habite Rayhan ?").await;
    assert_eq!(engine.session_info().await.mood, Mood::Neutral);
}

#[tokio::test]
async fn test_history_is_capped_oldest_first() {
    let config = EngineConfig {
        history_capacity: 4,
        ..EngineConfig::default()
    };
    let engine = engine_with(config);

    for text in ["bonjour", "quel âge a-t-il ?", "où habite-t-il ?"] {
        engine.ask(text).await;
    }

    let info = engine.session_info().await;
    assert_eq!(info.depth, 3);
    assert_eq!(info.history.len(), 4);
    assert_eq!(info.history[0].text, "quel âge a-t-il ?");
    assert_eq!(info.history[0].role, ExchangeRole::User);
    assert_eq!(info.history[3].intent, Some(Intent::AskLocation));
}

#[tokio::test]
async fn test_introduced_name_is_used_by_later_greeting() {
    let engine = engine();

    let reply = engine.ask("je m'appelle Léa").await;
    assert!(reply.contains("Léa"), "{reply}");
    assert_eq!(engine.session_info().await.user_name.as_deref(), Some("Léa"));

    let greeting = engine.ask("salut").await;
    assert!(greeting.contains("Léa"), "{greeting}");
}

#[tokio::test]
async fn test_reset_clears_the_session() {
    let engine = engine();
    engine.ask("je m'appelle Léa").await;
    engine.ask("quels sont ses projets ?").await;

    engine.reset_session().await;

    let info = engine.session_info().await;
    assert_eq!(info.depth, 0);
    assert!(info.history.is_empty());
    assert_eq!(info.last_intent, None);
    assert_eq!(info.last_topic, None);
    assert_eq!(info.user_name, None);
}

#[tokio::test]
async fn test_failing_persona_source_still_answers() {
    let engine = ResponseEngine::builder()
        .persona_source(Arc::new(FailingSource))
        .clock(Arc::new(FixedClock(15)))
        .seed(1)
        .build();

    let reply = engine.ask("qui es-tu").await;
    assert!(!reply.is_empty());
    assert!(reply.contains("Rayhan"), "{reply}");
    assert!(engine.persona_is_fallback().await);

    // sections missing from the fallback still produce a reply
    let skills = engine.ask("tes compétences ?").await;
    assert!(!skills.is_empty());
}

#[tokio::test]
async fn test_unmatched_message_similar_to_previous_is_a_follow_up() {
    let engine = engine();

    engine.ask("et rayhan il a quel âge").await;
    let reply = engine.ask("et rayhan il a").await;

    assert!(reply.ends_with("Rayhan a 18 ans."), "{reply}");
    let info = engine.session_info().await;
    assert_eq!(info.last_intent, Some(Intent::FollowUp));
    assert_eq!(info.last_answered, Some(Intent::AskAge));
    assert_eq!(info.history.last().unwrap().intent, Some(Intent::FollowUp));

    // a second follow-up still answers the resolved subject
    let again = engine.ask("et rayhan il").await;
    assert!(again.ends_with("Rayhan a 18 ans."), "{again}");
    assert_eq!(engine.session_info().await.last_intent, Some(Intent::FollowUp));
}

#[tokio::test]
async fn test_general_escalates_to_clarification_with_depth() {
    let engine = engine();

    let first = engine.ask("blorp zim").await;
    assert!(first.starts_with("Je suis RayhAI"), "{first}");

    engine.ask("bonjour").await;
    engine.ask("merci").await;

    let later = engine.ask("wibble wobble").await;
    assert!(later.starts_with("Je ne suis pas sûr de comprendre"), "{later}");
}

#[tokio::test]
async fn test_remote_is_used_only_for_uncertain_turns() {
    let engine = engine();
    let remote = MockRemote::new(Behavior::Answer("  Réponse distante.  "));
    engine.configure_responder(remote.clone()).await;
    assert!(engine.has_remote().await);

    engine.ask("bonjour").await;
    engine.ask("quel âge a-t-il ?").await;
    assert_eq!(remote.calls(), 0);

    let reply = engine.ask("que penses-tu de la météo ?").await;
    assert_eq!(reply, "Réponse distante.");
    assert_eq!(remote.calls(), 1);

    let request = remote.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.user_text, "que penses-tu de la météo ?");
    assert!(request.system_instruction.contains("Rayhan"));

    engine.clear_remote().await;
    assert!(!engine.has_remote().await);
    engine.ask("que penses-tu de la pluie ?").await;
    assert_eq!(remote.calls(), 1);
}

#[tokio::test]
async fn test_remote_failure_returns_apology() {
    let engine = engine();
    let remote = MockRemote::new(Behavior::Fail);
    engine.configure_responder(remote.clone()).await;

    let reply = engine.ask("que penses-tu de la météo ?").await;
    assert_eq!(reply, GENERIC_APOLOGY);
    assert_eq!(remote.calls(), 1);
    assert_eq!(engine.session_info().await.depth, 1);
}

#[tokio::test]
async fn test_remote_timeout_returns_apology() {
    let mut config = EngineConfig::default();
    config.remote.timeout_secs = 1;
    let engine = engine_with(config);
    engine.configure_responder(MockRemote::new(Behavior::Hang)).await;

    let reply = engine.ask("que penses-tu de la météo ?").await;
    assert_eq!(reply, GENERIC_APOLOGY);
}

#[tokio::test]
async fn test_empty_credential_disables_remote() {
    let engine = engine();
    engine.configure("sk-test").await;
    assert!(engine.has_remote().await);

    engine.configure("   ").await;
    assert!(!engine.has_remote().await);
}

#[tokio::test]
async fn test_same_seed_gives_same_conversation() {
    let script = ["bonjour", "je suis bloqué", "au revoir", "bonjour", "salut"];

    let mut runs = Vec::new();
    for _ in 0..2 {
        let engine = engine();
        let mut replies = Vec::new();
        for text in script {
            replies.push(engine.ask(text).await);
        }
        runs.push(replies);
    }
    assert_eq!(runs[0], runs[1]);
}

#[tokio::test]
async fn test_overlapping_calls_apply_in_arrival_order() {
    let engine = engine();

    let (first, second) = tokio::join!(engine.ask("bonjour"), engine.ask("merci"));
    assert!(!first.is_empty() && !second.is_empty());

    let info = engine.session_info().await;
    assert_eq!(info.depth, 2);
    assert_eq!(info.history[0].text, "bonjour");
    assert_eq!(info.history[2].text, "merci");
}

#[tokio::test]
async fn test_persona_mention_reply() {
    let engine = engine();

    let reply = engine.ask("tu joues à valorant ?").await;
    assert_eq!(reply, "Valorant fait partie des passions de Rayhan !");
    assert_eq!(
        engine.session_info().await.last_intent,
        Some(Intent::PersonaMention)
    );
}
