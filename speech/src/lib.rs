// Platform speech adapters built on the vois-core capability traits

// Shared binary-discovery utilities
#[cfg(any(feature = "stt", feature = "tts"))]
pub(crate) mod utils;

#[cfg(feature = "stt")]
pub mod recognizer;

#[cfg(feature = "stt")]
pub use recognizer::{CommandRecognizer, RecognizerConfig};

#[cfg(feature = "tts")]
pub mod synthesizer;

#[cfg(feature = "tts")]
pub use synthesizer::{SynthesizerConfig, SystemSynthesizer};
