//! Interaction layer of RayhAI: remote text-generation clients.

pub mod openai_api_agent;

pub use openai_api_agent::OpenAiApiAgent;
