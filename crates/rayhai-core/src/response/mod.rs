//! Reply generation module.
//!
//! # Module Structure
//!
//! - `templates`: the `TemplateSet` configuration data and fixed replies
//! - `time_of_day`: salutation selection from the local hour
//! - `generator`: `ResponseGenerator`, rendering a `ReplyRequest`

mod generator;
mod templates;
mod time_of_day;

pub use generator::{DEFAULT_CLARIFICATION_DEPTH, GeneratedReply, ReplyRequest, ResponseGenerator};
pub use templates::{
    EMPTY_INPUT_REPLY, GENERIC_APOLOGY, INTERNAL_APOLOGY, THANKS_TEMPLATES, TemplateSet,
    WELCOME_MESSAGE, keys,
};
pub use time_of_day::TimeOfDay;
