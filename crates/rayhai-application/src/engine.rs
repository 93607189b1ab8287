//! Response engine use case.
//!
//! `ResponseEngine` owns the persona store, the session context and the
//! optional remote responder, and turns each visitor message into a reply.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayhai_core::clock::{Clock, SystemClock};
use rayhai_core::config::{EngineConfig, RemoteConfig};
use rayhai_core::intent::{Classification, Intent, IntentClassifier, IntentTable, PreviousTurn};
use rayhai_core::keywords::KeywordTable;
use rayhai_core::mood::detect_mood;
use rayhai_core::name::extract_user_name;
use rayhai_core::persona::{LoadedPersona, PersonaProfile, PersonaSource, PersonaStore};
use rayhai_core::remote::{RemoteRequest, RemoteResponder};
use rayhai_core::response::{
    EMPTY_INPUT_REPLY, GENERIC_APOLOGY, GeneratedReply, INTERNAL_APOLOGY, ReplyRequest,
    ResponseGenerator, TemplateSet, TimeOfDay,
};
use rayhai_core::session::{SessionContext, SessionInfo};
use rayhai_core::text::normalize;
use rayhai_core::topic::extract_topic;
use rayhai_core::{RayhaiError, Result};
use rayhai_infrastructure::persona_source_for;
use rayhai_interaction::OpenAiApiAgent;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

/// Mutable per-session state, guarded by the turn lock.
struct TurnState {
    session: SessionContext,
    rng: StdRng,
}

/// Persona-backed chat engine.
///
/// # Concurrency
///
/// `ask` holds the turn lock for the whole turn, including the remote call,
/// so overlapping calls are applied one after the other in arrival order.
/// `reset_session` and `session_info` wait for the turn in flight.
pub struct ResponseEngine {
    store: PersonaStore,
    classifier: IntentClassifier,
    generator: ResponseGenerator,
    clock: Arc<dyn Clock>,
    remote_config: RemoteConfig,
    turn: Mutex<TurnState>,
    remote: RwLock<Option<Arc<dyn RemoteResponder>>>,
}

impl ResponseEngine {
    pub fn builder() -> ResponseEngineBuilder {
        ResponseEngineBuilder::default()
    }

    /// Answers one visitor message. Never fails.
    pub async fn ask(&self, text: &str) -> String {
        let mut turn = self.turn.lock().await;

        if text.trim().is_empty() {
            return EMPTY_INPUT_REPLY.to_string();
        }

        let persona = self.store.get().await;
        let TurnState { session, rng } = &mut *turn;

        let (classification, reply) = match self.local_reply(persona, session, rng, text) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("[Engine] Local reply failed: {}", e);
                let fallback = GeneratedReply {
                    text: INTERNAL_APOLOGY.to_string(),
                    answered: Intent::General,
                    confident: true,
                };
                (Classification::fallback(Intent::General), fallback)
            }
        };

        let final_text = if reply.confident {
            reply.text
        } else {
            match self.current_remote().await {
                Some(remote) => self.ask_remote(&*remote, &persona.profile, text).await,
                None => reply.text,
            }
        };

        session.record_turn(
            text.trim(),
            &final_text,
            classification.intent,
            reply.answered,
        );
        final_text
    }

    /// Runs name extraction, mood, classification, topic and generation.
    fn local_reply(
        &self,
        persona: &LoadedPersona,
        session: &mut SessionContext,
        rng: &mut StdRng,
        text: &str,
    ) -> Result<(Classification, GeneratedReply)> {
        let normalized = normalize(text);
        let keywords: &KeywordTable = &persona.keywords;

        if let Some(name) = extract_user_name(&normalized) {
            tracing::debug!("[Engine] Visitor introduced themselves");
            session.user_name = Some(name);
        }

        session.user_mood = detect_mood(&normalized, keywords);

        let previous = session
            .last_intent
            .zip(session.last_user_text())
            .map(|(intent, user_text)| PreviousTurn { intent, user_text });
        let classification = self.classifier.classify(&normalized, keywords, previous);

        let topic = extract_topic(&normalized, keywords, session.last_topic);
        session.last_topic = Some(topic);

        tracing::debug!(
            "[Engine] intent={} priority={:?} topic={} mood={}",
            classification.intent,
            classification.priority,
            topic,
            session.user_mood
        );

        let request = ReplyRequest {
            intent: classification.intent,
            raw_text: text,
            normalized: &normalized,
            topic,
            mood: session.user_mood,
            persona: &persona.profile,
            session,
            time_of_day: TimeOfDay::from_hour(self.clock.local_hour()),
        };
        let reply = self.generator.generate(&request, rng)?;
        Ok((classification, reply))
    }

    /// One bounded remote attempt; any failure becomes the generic apology.
    async fn ask_remote(
        &self,
        remote: &dyn RemoteResponder,
        persona: &PersonaProfile,
        text: &str,
    ) -> String {
        let request = RemoteRequest::new(persona, text.trim());
        let timeout = Duration::from_secs(self.remote_config.timeout_secs);

        let outcome = match tokio::time::timeout(timeout, remote.respond(&request)).await {
            Ok(result) => result,
            Err(_) => Err(RayhaiError::remote(
                None,
                format!("no answer within {}s", timeout.as_secs()),
            )),
        };

        match outcome {
            Ok(answer) if !answer.trim().is_empty() => {
                tracing::debug!("[Engine] Remote answer from {}", remote.name());
                answer.trim().to_string()
            }
            Ok(_) => {
                tracing::warn!("[Engine] Remote {} returned an empty answer", remote.name());
                GENERIC_APOLOGY.to_string()
            }
            Err(e) => {
                tracing::warn!("[Engine] Remote {} failed: {}", remote.name(), e);
                GENERIC_APOLOGY.to_string()
            }
        }
    }

    async fn current_remote(&self) -> Option<Arc<dyn RemoteResponder>> {
        self.remote.read().await.clone()
    }

    /// Clears the conversation: history, depth, last intent/topic, mood and name.
    pub async fn reset_session(&self) {
        let mut turn = self.turn.lock().await;
        turn.session.reset();
        tracing::info!("[Engine] Session reset ({})", turn.session.id());
    }

    pub async fn session_info(&self) -> SessionInfo {
        self.turn.lock().await.session.info()
    }

    /// Enables the OpenAI fallback with the given credential.
    ///
    /// The credential is kept in memory only. An empty credential disables
    /// the fallback.
    pub async fn configure(&self, credential: &str) {
        let credential = credential.trim();
        if credential.is_empty() {
            self.clear_remote().await;
            return;
        }
        let agent = OpenAiApiAgent::with_config(credential, &self.remote_config);
        self.configure_responder(Arc::new(agent)).await;
    }

    /// Installs any remote responder as the fallback.
    pub async fn configure_responder(&self, responder: Arc<dyn RemoteResponder>) {
        tracing::info!("[Engine] Remote fallback enabled ({})", responder.name());
        *self.remote.write().await = Some(responder);
    }

    pub async fn clear_remote(&self) {
        if self.remote.write().await.take().is_some() {
            tracing::info!("[Engine] Remote fallback disabled");
        }
    }

    pub async fn has_remote(&self) -> bool {
        self.remote.read().await.is_some()
    }

    /// The session persona, loading it on first use.
    pub async fn persona(&self) -> Arc<PersonaProfile> {
        self.store.get().await.profile.clone()
    }

    /// Whether the persona failed to load and the fallback is served.
    pub async fn persona_is_fallback(&self) -> bool {
        self.store.get().await.is_fallback()
    }
}

/// Builder for [`ResponseEngine`].
///
/// Unset parts come from the [`EngineConfig`]: the persona source from
/// `config.persona`, the rng seed from `config.seed`, the system clock.
#[derive(Default)]
pub struct ResponseEngineBuilder {
    config: EngineConfig,
    source: Option<Arc<dyn PersonaSource>>,
    templates: Option<TemplateSet>,
    table: Option<IntentTable>,
    clock: Option<Arc<dyn Clock>>,
    seed: Option<u64>,
    remote: Option<Arc<dyn RemoteResponder>>,
}

impl ResponseEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn persona_source(mut self, source: Arc<dyn PersonaSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn templates(mut self, templates: TemplateSet) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn intent_table(mut self, table: IntentTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seeds reply sampling, overriding `config.seed`.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteResponder>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn build(self) -> ResponseEngine {
        let config = self.config;
        let source = self
            .source
            .unwrap_or_else(|| persona_source_for(&config.persona));
        let rng = match self.seed.or(config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        ResponseEngine {
            store: PersonaStore::new(source),
            classifier: IntentClassifier::new(
                self.table.unwrap_or_default(),
                config.follow_up_threshold,
            ),
            generator: ResponseGenerator::new(
                self.templates.unwrap_or_default(),
                config.clarification_depth,
            ),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            remote_config: config.remote,
            turn: Mutex::new(TurnState {
                session: SessionContext::new(config.history_capacity),
                rng,
            }),
            remote: RwLock::new(self.remote),
        }
    }
}
