// Conversation controller
//
// Owns the session state and mediates between user input, the remote
// conversation backend, and speech I/O. Every external failure is caught,
// logged, and folded into the single user-facing error slot; nothing is
// retried and nothing is fatal.

use crate::session::{Message, SessionState};
use crate::speech::{RecognitionEvent, SpeechRecognizer, SpeechSynthesizer};
use crate::ConversationBackend;
use std::sync::Arc;
use tracing::{error, info, warn};

const INIT_ERROR: &str = "Failed to initialize conversation.";
const SEND_ERROR: &str = "Failed to send message.";
const RECOGNITION_UNSUPPORTED: &str = "Speech recognition is not supported on this platform.";
const RECOGNITION_ERROR: &str = "Error in speech recognition.";

pub struct ConversationController {
    state: SessionState,
    backend: Arc<dyn ConversationBackend>,
    recognizer: Arc<dyn SpeechRecognizer>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    language: String,
    interim_listener: Option<Box<dyn Fn(&str) + Send + Sync>>,
}

impl ConversationController {
    pub fn new(
        backend: Arc<dyn ConversationBackend>,
        recognizer: Arc<dyn SpeechRecognizer>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            state: SessionState::new(),
            backend,
            recognizer,
            synthesizer,
            language: language.into(),
            interim_listener: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// UI binding notified with each interim transcript while listening,
    /// and with an empty string once the session ends
    pub fn set_interim_listener(&mut self, listener: impl Fn(&str) + Send + Sync + 'static) {
        self.interim_listener = Some(Box::new(listener));
    }

    /// UI binding for typed text, consumed by the next `submit_input(None)`
    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.state.pending_input = text.into();
    }

    /// Optional bootstrap: fetch the conversation-opening prompt and speak
    /// it. On failure the transcript stays empty and the session proceeds.
    pub async fn initialize(&mut self) {
        self.state.is_loading = true;
        match self.backend.initialize().await {
            Ok(prompt) => {
                info!(target = "controller", prompt = %prompt, "Conversation initialized");
                self.speak(&prompt).await;
            }
            Err(e) => {
                error!(target = "controller", error = %e, "Error during initialization");
                self.state.set_error(INIT_ERROR);
            }
        }
        self.state.is_loading = false;
    }

    /// Send one user message. Takes an explicit override or the buffered
    /// pending input; empty text is a no-op. On success the user message
    /// and bot reply are appended to the transcript as one update and the
    /// reply is spoken; on failure nothing is recorded for the turn.
    /// Pending and interim input are cleared either way.
    pub async fn submit_input(&mut self, text: Option<&str>) {
        let resolved = match text {
            Some(t) => t.to_string(),
            None => self.state.pending_input.clone(),
        };
        if resolved.is_empty() {
            return;
        }

        self.state.is_loading = true;
        match self.backend.send_message(&resolved).await {
            Ok(bot_text) => {
                self.state
                    .push_exchange(Message::user(resolved), Message::bot(bot_text.clone()));
                self.speak(&bot_text).await;
            }
            Err(e) => {
                error!(target = "controller", error = %e, "Error sending user message");
                self.state.set_error(SEND_ERROR);
            }
        }
        self.state.clear_input();
        self.state.is_loading = false;
    }

    /// Run one listening session to completion: partial transcripts update
    /// the interim input, a final transcript is submitted exactly once, and
    /// recognition errors surface in the error slot.
    pub async fn begin_listening(&mut self) {
        if !self.recognizer.is_supported() {
            self.state.set_error(RECOGNITION_UNSUPPORTED);
            return;
        }

        let mut events = match self.recognizer.listen(&self.language).await {
            Ok(rx) => rx,
            Err(e) => {
                error!(target = "controller", error = %e, "Failed to start speech recognition");
                self.state.set_error(RECOGNITION_ERROR);
                return;
            }
        };
        self.state.is_listening = true;

        while let Some(event) = events.recv().await {
            let session_over = matches!(
                event,
                RecognitionEvent::Final(_) | RecognitionEvent::Error(_)
            );
            let transcript = apply_recognition_event(&mut self.state, event);
            self.notify_interim();
            if let Some(transcript) = transcript {
                self.submit_input(Some(&transcript)).await;
            }
            if session_over {
                return;
            }
        }

        // Stream ended without a final result
        self.state.is_listening = false;
        self.state.interim_input.clear();
        self.notify_interim();
    }

    /// Push the current interim transcript (empty once a session ends) to
    /// the registered UI binding.
    fn notify_interim(&self) {
        if let Some(ref listener) = self.interim_listener {
            listener(&self.state.interim_input);
        }
    }

    /// No-op unless speech output is enabled. Synthesis is fire-and-forget;
    /// failures are logged, never surfaced as session errors.
    pub async fn speak(&self, text: &str) {
        if !self.state.can_speak {
            return;
        }
        if let Err(e) = self.synthesizer.speak(text).await {
            warn!(target = "controller", error = %e, "Speech synthesis failed");
        }
    }

    /// Cancel any queued or in-flight speech output. Idempotent.
    pub fn stop_speaking(&self) {
        self.synthesizer.cancel_all();
    }
}

/// Fold one recognition event into the session state. Returns the finalized
/// transcript when the event completes the utterance.
fn apply_recognition_event(state: &mut SessionState, event: RecognitionEvent) -> Option<String> {
    match event {
        RecognitionEvent::Partial(text) => {
            state.interim_input = text;
            None
        }
        RecognitionEvent::Final(text) => {
            state.is_listening = false;
            state.interim_input.clear();
            Some(text)
        }
        RecognitionEvent::Error(reason) => {
            error!(target = "controller", error = %reason, "Speech recognition error");
            state.set_error(RECOGNITION_ERROR);
            state.is_listening = false;
            state.interim_input.clear();
            None
        }
    }
}
