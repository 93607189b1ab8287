//! Persona domain module.
//!
//! # Module Structure
//!
//! - `model`: the `PersonaProfile` document and its parts
//! - `fallback`: the hardcoded profile served when loading fails
//! - `source`: the `PersonaSource` trait
//! - `store`: the lazily-loaded, never-failing `PersonaStore`

mod fallback;
mod model;
mod source;
mod store;

pub use fallback::{FALLBACK_BIO, FALLBACK_NAME, fallback_profile};
pub use model::{Contact, Experience, Goals, Mention, PersonaProfile, Project, SkillCategory};
pub use source::{PersonaSource, StaticPersonaSource};
pub use store::{LoadedPersona, PersonaOrigin, PersonaStore};
