//! Coarse conversation topic extraction.

use crate::keywords::{self, KeywordTable};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Coarse subject of the conversation, used to bias follow-up phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    Personal,
    Technical,
    Career,
    Project,
    General,
}

impl Topic {
    /// French label used inside replies.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Personal => "son parcours perso",
            Topic::Technical => "ses compétences techniques",
            Topic::Career => "son orientation pro",
            Topic::Project => "ses projets",
            Topic::General => "lui",
        }
    }
}

/// Extracts the topic of a normalized message.
///
/// Sets are tested in order personal, technical, career, project. Without
/// a match the previous topic is kept, or `General` when there is none.
pub fn extract_topic(normalized: &str, table: &KeywordTable, previous: Option<Topic>) -> Topic {
    const ORDER: [(&str, Topic); 4] = [
        (keywords::PERSONAL, Topic::Personal),
        (keywords::TECHNICAL, Topic::Technical),
        (keywords::CAREER, Topic::Career),
        (keywords::PROJECT, Topic::Project),
    ];

    ORDER
        .iter()
        .find(|(set, _)| table.matches(set, normalized))
        .map(|(_, topic)| *topic)
        .or(previous)
        .unwrap_or(Topic::General)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_order() {
        let table = KeywordTable::default();
        assert_eq!(extract_topic("tu as quel âge", &table, None), Topic::Personal);
        assert_eq!(extract_topic("tu fais du python", &table, None), Topic::Technical);
        assert_eq!(extract_topic("tu veux faire un bts", &table, None), Topic::Career);
        assert_eq!(extract_topic("montre ton portfolio", &table, None), Topic::Project);
        // technical and project both match; technical is tested first
        assert_eq!(
            extract_topic("un projet en python", &table, None),
            Topic::Technical
        );
    }

    #[test]
    fn test_topic_retains_previous() {
        let table = KeywordTable::default();
        assert_eq!(
            extract_topic("et ensuite", &table, Some(Topic::Career)),
            Topic::Career
        );
        assert_eq!(extract_topic("et ensuite", &table, None), Topic::General);
    }
}
