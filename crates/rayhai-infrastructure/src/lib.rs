//! Infrastructure layer of RayhAI.
//!
//! File and network adapters for the core traits: persona sources, app
//! paths, and the storages for configuration, secrets and the transcript.

pub mod paths;
pub mod persona_source;
pub mod storage;

pub use paths::{PathError, RayhaiPaths};
pub use persona_source::{
    BUNDLED_PERSONA, BundledPersonaSource, FilePersonaSource, HttpPersonaSource,
    persona_source_for,
};
