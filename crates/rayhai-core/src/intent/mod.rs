//! Intent classification.
//!
//! # Module Structure
//!
//! - `model`: the `Intent` enum and classification result
//! - `table`: ordered `{intent, priority, matcher}` rules
//! - `classifier`: table lookup plus follow-up / general fallbacks

mod classifier;
mod model;
mod table;

pub use classifier::{DEFAULT_FOLLOW_UP_THRESHOLD, IntentClassifier, PreviousTurn};
pub use model::{Classification, Intent};
pub use table::{IntentRule, IntentTable, Matcher};
