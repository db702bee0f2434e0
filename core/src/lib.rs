// Vois Core Library
// Conversation session state, backend client, and speech capability seams

pub mod backend;
pub mod controller;
pub mod session;
pub mod speech;

// Export core types
pub use backend::{BackendClient, BackendConfig, ConversationBackend};
pub use controller::ConversationController;
pub use session::{Message, Sender, SessionState};
pub use speech::{RecognitionEvent, SpeechRecognizer, SpeechSynthesizer};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoisError {
    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Speech error: {0}")]
    SpeechError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
pub type Result<T> = std::result::Result<T, VoisError>;
