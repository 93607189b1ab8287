//! Application layer for RayhAI.
//!
//! Coordinates the domain (`rayhai-core`) with the persona sources
//! (`rayhai-infrastructure`) and the remote client (`rayhai-interaction`).

pub mod engine;

pub use engine::{ResponseEngine, ResponseEngineBuilder};
