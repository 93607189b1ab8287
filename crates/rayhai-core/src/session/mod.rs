//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: history entry types (`ExchangeRole`, `Exchange`)
//! - `context`: the bounded `SessionContext` and its `SessionInfo` snapshot

mod context;
mod message;

pub use context::{DEFAULT_HISTORY_CAPACITY, SessionContext, SessionInfo};
pub use message::{Exchange, ExchangeRole};
