// Speech capability seams
//
// Recognition is modeled as a cancellable event stream: one listening
// session yields a sequence of Partial transcripts that ends with a single
// Final transcript or an Error. Synthesis is a fire-and-forget utterance
// queue with an immediate cancel-all primitive.

use crate::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One event from an active recognition session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Provisional transcript, replaced by later events
    Partial(String),
    /// Finalized transcript; the session is over
    Final(String),
    /// The session failed; no transcript will follow
    Error(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Capability detection. [`SpeechRecognizer::listen`] on an unsupported
    /// recognizer is an error.
    fn is_supported(&self) -> bool;

    /// Start one listening session for the given language tag. The returned
    /// channel closes after a `Final` or `Error` event.
    async fn listen(&self, language: &str) -> Result<mpsc::Receiver<RecognitionEvent>>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Queue an utterance. Returns once queued; playback completion is
    /// never awaited.
    async fn speak(&self, text: &str) -> Result<()>;

    /// Cancel queued and in-flight utterances. Idempotent; safe when
    /// nothing is speaking.
    fn cancel_all(&self);
}
