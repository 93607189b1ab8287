//! File storages for configuration, secrets and the chat transcript.

mod config_storage;
mod secret_storage;
mod transcript_storage;

pub use config_storage::{ConfigStorage, ConfigStorageError, load_templates};
pub use secret_storage::{OPENAI_API_KEY_ENV, OPENAI_MODEL_ENV, SecretStorage, SecretStorageError};
pub use transcript_storage::{DEFAULT_TRANSCRIPT_CAP, TranscriptStorage, TranscriptStorageError};
