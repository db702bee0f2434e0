// Conversation session state
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// In-memory state for one conversation session, scoped to the process
/// lifetime. The transcript is append-only: entries are added through
/// [`SessionState::push_exchange`] and never reordered or removed.
#[derive(Debug)]
pub struct SessionState {
    /// Buffered user-typed text, consumed by the next submit
    pub pending_input: String,
    transcript: Vec<Message>,
    /// Single error slot; overwritten by the next failure
    pub last_error: Option<String>,
    pub is_listening: bool,
    pub is_loading: bool,
    /// Gates speech output. On by default; listening does not toggle it.
    pub can_speak: bool,
    /// Not-yet-final recognition transcript, shown only while listening
    pub interim_input: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            pending_input: String::new(),
            transcript: Vec::new(),
            last_error: None,
            is_listening: false,
            is_loading: false,
            can_speak: true,
            interim_input: String::new(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the transcript, oldest first
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Append one completed exchange (user message then bot reply) as a
    /// single state update.
    pub fn push_exchange(&mut self, user: Message, bot: Message) {
        self.transcript.push(user);
        self.transcript.push(bot);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Clear both pending and interim input buffers
    pub fn clear_input(&mut self) {
        self.pending_input.clear();
        self.interim_input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_appends_user_then_bot() {
        let mut state = SessionState::new();
        state.push_exchange(Message::user("Hello"), Message::bot("Hi there"));

        assert_eq!(state.transcript().len(), 2);
        assert_eq!(state.transcript()[0], Message::user("Hello"));
        assert_eq!(state.transcript()[1], Message::bot("Hi there"));
    }

    #[test]
    fn transcript_only_grows() {
        let mut state = SessionState::new();
        state.push_exchange(Message::user("a"), Message::bot("b"));
        state.push_exchange(Message::user("c"), Message::bot("d"));

        let texts: Vec<&str> = state.transcript().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn speech_output_enabled_by_default() {
        let state = SessionState::new();
        assert!(state.can_speak);
        assert!(!state.is_listening);
        assert!(!state.is_loading);
    }

    #[test]
    fn clear_input_resets_both_buffers() {
        let mut state = SessionState::new();
        state.pending_input = "typed".into();
        state.interim_input = "spoken".into();
        state.clear_input();
        assert!(state.pending_input.is_empty());
        assert!(state.interim_input.is_empty());
    }

    #[test]
    fn message_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"sender":"user","text":"hi"}"#);
    }
}
