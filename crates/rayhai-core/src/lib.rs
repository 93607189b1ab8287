//! Domain layer of RayhAI.
//!
//! Everything needed to turn a visitor message into a reply, free of I/O:
//! persona model and store, keyword tables, mood, topic and name
//! extraction, the intent table, the session context and the template
//! based reply generator. Persona sources and the remote responder are
//! traits implemented by the outer crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod intent;
pub mod keywords;
pub mod mood;
pub mod name;
pub mod persona;
pub mod remote;
pub mod response;
pub mod session;
pub mod text;
pub mod topic;

pub use error::{RayhaiError, Result};
