use super::model::{Classification, Intent};
use super::table::IntentTable;
use crate::keywords::KeywordTable;
use crate::text::word_overlap;

/// Default word-overlap ratio above which an unmatched message is treated
/// as a follow-up of the previous turn.
pub const DEFAULT_FOLLOW_UP_THRESHOLD: f64 = 0.3;

/// What the classifier needs to know about the previous turn.
#[derive(Debug, Clone, Copy)]
pub struct PreviousTurn<'a> {
    pub intent: Intent,
    pub user_text: &'a str,
}

/// Intent classifier: table lookup, then follow-up resolution, then `General`.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    table: IntentTable,
    follow_up_threshold: f64,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(IntentTable::default(), DEFAULT_FOLLOW_UP_THRESHOLD)
    }
}

impl IntentClassifier {
    pub fn new(table: IntentTable, follow_up_threshold: f64) -> Self {
        Self {
            table,
            follow_up_threshold,
        }
    }

    pub fn table(&self) -> &IntentTable {
        &self.table
    }

    /// Classifies a normalized message.
    pub fn classify(
        &self,
        normalized: &str,
        keywords: &KeywordTable,
        previous: Option<PreviousTurn<'_>>,
    ) -> Classification {
        if let Some(matched) = self.table.best_match(normalized, keywords) {
            return matched;
        }

        if let Some(previous) = previous
            && word_overlap(normalized, previous.user_text) > self.follow_up_threshold
        {
            tracing::debug!(
                "[Classifier] No rule matched; following up on {}",
                previous.intent
            );
            return Classification::fallback(Intent::FollowUp);
        }

        Classification::fallback(Intent::General)
    }
}
