mod config;
mod render;

use config::ChatConfig;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::info;
use vois_core::{BackendClient, ConversationController};
use vois_speech::{CommandRecognizer, SystemSynthesizer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging / tracing
    let filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn,vois_core=info,vois_chat=info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Load configuration (defaults + env + optional TOML overlay)
    let cfg = ChatConfig::load();
    info!(target = "vois_chat", backend = %cfg.backend.base_url, "Starting chat client");

    let backend = Arc::new(BackendClient::new(cfg.backend.clone())?);
    let recognizer = Arc::new(CommandRecognizer::new(cfg.recognizer.clone()));
    let synthesizer = Arc::new(SystemSynthesizer::new(cfg.synth.clone()));

    let mut controller =
        ConversationController::new(backend, recognizer, synthesizer, cfg.language.clone());
    controller.set_interim_listener(render::interim);

    render::banner();

    let mut rendered = 0usize;
    let mut shown_error: Option<String> = None;

    if cfg.initialize_on_start {
        controller.initialize().await;
        report(&controller, &mut rendered, &mut shown_error);
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                info!(target = "vois_chat", "Shutting down...");
                break;
            }
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) | Err(_) => break,
                };
                match line.trim() {
                    "" => continue,
                    "/quit" | "/exit" => break,
                    "/stop" => controller.stop_speaking(),
                    "/listen" => controller.begin_listening().await,
                    text => {
                        controller.set_pending_input(text);
                        controller.submit_input(None).await;
                    }
                }
                report(&controller, &mut rendered, &mut shown_error);
            }
        }
    }

    controller.stop_speaking();
    Ok(())
}

/// Render the transcript delta and any newly set error
fn report(
    controller: &ConversationController,
    rendered: &mut usize,
    shown_error: &mut Option<String>,
) {
    let state = controller.state();
    *rendered = render::transcript_delta(state, *rendered);
    if state.last_error != *shown_error {
        render::error_banner(state);
        *shown_error = state.last_error.clone();
    }
}
