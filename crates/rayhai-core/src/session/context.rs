//! Rolling session context owned by the engine.

use super::message::{Exchange, ExchangeRole};
use crate::intent::Intent;
use crate::mood::Mood;
use crate::topic::Topic;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of history entries kept (user and assistant entries
/// both count).
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Conversation state for the lifetime of one session.
///
/// The history is a bounded queue: pushing beyond `capacity` evicts the
/// oldest entries first. `conversation_depth` counts completed turns and
/// only goes back to zero through [`SessionContext::reset`].
#[derive(Debug, Clone)]
pub struct SessionContext {
    id: String,
    started_at: String,
    capacity: usize,
    history: VecDeque<Exchange>,
    /// Classification of the latest turn (`follow_up` included)
    pub last_intent: Option<Intent>,
    /// Intent whose reply was given on the latest turn; a follow-up
    /// records the intent it resolved to
    pub last_answered: Option<Intent>,
    pub last_topic: Option<Topic>,
    pub user_mood: Mood,
    pub conversation_depth: u32,
    pub user_name: Option<String>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SessionContext {
    /// Creates an empty context. A zero capacity is raised to one entry.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            capacity,
            history: VecDeque::with_capacity(capacity),
            last_intent: None,
            last_answered: None,
            last_topic: None,
            user_mood: Mood::default(),
            conversation_depth: 0,
            user_name: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> &str {
        &self.started_at
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn history(&self) -> impl Iterator<Item = &Exchange> {
        self.history.iter()
    }

    /// Appends an entry, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, exchange: Exchange) {
        self.history.push_back(exchange);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    /// Records one completed turn: the user entry, the assistant entry
    /// tagged with the classified intent, and the depth increment.
    pub fn record_turn(
        &mut self,
        user_text: &str,
        reply: &str,
        intent: Intent,
        answered: Intent,
    ) {
        self.push(Exchange::user(user_text));
        self.push(Exchange::assistant(reply, intent));
        self.last_intent = Some(intent);
        self.last_answered = Some(answered);
        self.conversation_depth += 1;
    }

    /// Text of the most recent user entry still in the history.
    pub fn last_user_text(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|e| e.role == ExchangeRole::User)
            .map(|e| e.text.as_str())
    }

    /// Clears the history and every derived field, starting a new session.
    pub fn reset(&mut self) {
        *self = Self::new(self.capacity);
    }

    /// Read-only snapshot for callers outside the engine.
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.clone(),
            started_at: self.started_at.clone(),
            depth: self.conversation_depth,
            mood: self.user_mood,
            last_intent: self.last_intent,
            last_answered: self.last_answered,
            last_topic: self.last_topic,
            user_name: self.user_name.clone(),
            history: self.history.iter().cloned().collect(),
        }
    }
}

/// Snapshot of the session returned by `session_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    pub started_at: String,
    pub depth: u32,
    pub mood: Mood,
    pub last_intent: Option<Intent>,
    pub last_answered: Option<Intent>,
    pub last_topic: Option<Topic>,
    pub user_name: Option<String>,
    pub history: Vec<Exchange>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_evicts_oldest_first() {
        let mut context = SessionContext::new(4);
        for i in 0..3 {
            context.record_turn(
                &format!("question {i}"),
                &format!("reply {i}"),
                Intent::Help,
                Intent::Help,
            );
        }

        let texts: Vec<&str> = context.history().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["question 1", "reply 1", "question 2", "reply 2"]);
        assert_eq!(context.conversation_depth, 3);
        assert_eq!(context.last_user_text(), Some("question 2"));
    }

    #[test]
    fn test_assistant_entries_carry_intent() {
        let mut context = SessionContext::default();
        context.record_turn("merci", "Avec plaisir", Intent::Thanks, Intent::Thanks);

        let entries: Vec<&Exchange> = context.history().collect();
        assert_eq!(entries[0].intent, None);
        assert_eq!(entries[1].role, ExchangeRole::Assistant);
        assert_eq!(entries[1].intent, Some(Intent::Thanks));
    }

    #[test]
    fn test_follow_up_keeps_classification_and_answer_apart() {
        let mut context = SessionContext::default();
        context.record_turn("quel âge a-t-il", "18 ans", Intent::AskAge, Intent::AskAge);
        context.record_turn("et il a", "Je reprends : 18 ans", Intent::FollowUp, Intent::AskAge);

        let info = context.info();
        assert_eq!(info.last_intent, Some(Intent::FollowUp));
        assert_eq!(info.last_answered, Some(Intent::AskAge));
        assert_eq!(info.history[3].intent, Some(Intent::FollowUp));
    }

    #[test]
    fn test_reset_clears_state_and_renews_id() {
        let mut context = SessionContext::new(6);
        context.record_turn("bonjour", "Salut", Intent::Greeting, Intent::Greeting);
        context.user_name = Some("Léa".to_string());
        context.user_mood = Mood::Stressed;
        context.last_topic = Some(Topic::Career);
        let old_id = context.id().to_string();

        context.reset();

        let info = context.info();
        assert_eq!(info.depth, 0);
        assert!(info.history.is_empty());
        assert_eq!(info.last_intent, None);
        assert_eq!(info.last_answered, None);
        assert_eq!(info.last_topic, None);
        assert_eq!(info.user_name, None);
        assert_eq!(info.mood, Mood::Neutral);
        assert_eq!(context.capacity(), 6);
        assert_ne!(info.id, old_id);
    }

    #[test]
    fn test_zero_capacity_keeps_one_entry() {
        let mut context = SessionContext::new(0);
        context.record_turn("a", "b", Intent::General, Intent::General);
        assert_eq!(context.history().count(), 1);
        assert_eq!(context.last_user_text(), None);
    }
}
