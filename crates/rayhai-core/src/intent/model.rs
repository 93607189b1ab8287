//! Intent domain model.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// A named category of visitor request, driving reply selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Thanks,
    Help,
    Introduction,
    AskIdentity,
    AskAge,
    AskSkills,
    AskProjects,
    AskExperience,
    AskGoals,
    AskContact,
    AskSchool,
    AskLocation,
    AskLanguages,
    AskPassions,
    Encouragement,
    PersonaMention,
    /// Resolved from the previous turn when nothing else matched.
    FollowUp,
    /// Nothing matched.
    General,
}

impl Intent {
    /// Whether a reply to this intent counts as a confident local answer.
    ///
    /// Only `General` is uncertain; it is the one intent that may be handed
    /// to the remote fallback.
    pub fn is_confident(&self) -> bool {
        !matches!(self, Intent::General)
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    /// Priority of the winning rule; `None` for follow-up and general.
    pub priority: Option<u32>,
}

impl Classification {
    pub fn matched(intent: Intent, priority: u32) -> Self {
        Self {
            intent,
            priority: Some(priority),
        }
    }

    pub fn fallback(intent: Intent) -> Self {
        Self {
            intent,
            priority: None,
        }
    }
}
