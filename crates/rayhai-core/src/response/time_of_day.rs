use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Part of the day, derived from the local hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeOfDay {
    /// 05:00 to 11:59
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 to 04:59
    Evening,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    /// Salutation opening a greeting.
    pub fn salutation(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Bonjour",
            TimeOfDay::Afternoon => "Bon après-midi",
            TimeOfDay::Evening => "Bonsoir",
        }
    }
}
