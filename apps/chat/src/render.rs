// Plain-stdout rendering of the session state

use vois_core::{Message, Sender, SessionState};

pub fn banner() {
    println!("Conversation Bot");
    println!("Type a message and press Enter, or use /listen, /stop, /quit.");
    println!();
}

fn message(msg: &Message) {
    match msg.sender {
        Sender::User => println!("you ▸ {}", msg.text),
        Sender::Bot => println!("bot ▸ {}", msg.text),
    }
}

/// Print transcript entries added since the last render; returns the new
/// rendered count.
pub fn transcript_delta(state: &SessionState, rendered: usize) -> usize {
    let transcript = state.transcript();
    for msg in &transcript[rendered.min(transcript.len())..] {
        message(msg);
    }
    transcript.len()
}

/// Provisional transcript line, shown while listening
pub fn interim(text: &str) {
    if !text.is_empty() {
        println!("  … {text}");
    }
}

pub fn error_banner(state: &SessionState) {
    if let Some(ref err) = state.last_error {
        eprintln!("! {err}");
    }
}
