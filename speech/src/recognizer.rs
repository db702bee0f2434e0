// Speech recognition over an external recognizer command
//
// One listening session spawns the configured recognizer process and turns
// its stdout into the recognition event stream: each transcript line the
// process prints replaces the current partial result, a clean exit
// finalizes the last transcript, and a failed exit becomes an error event.

use crate::utils::get_from_env_or_path;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use vois_core::{RecognitionEvent, Result, SpeechRecognizer, VoisError};

/// Recognizer configuration
#[derive(Clone, Debug)]
pub struct RecognizerConfig {
    /// Path to the recognizer executable (e.g., whisper-stream)
    pub bin: Option<PathBuf>,
    /// Path to a model file passed via `-m`, if the engine needs one
    pub model: Option<PathBuf>,
    /// Flag used to pass the language tag (`-l` by default); `None` omits it
    pub language_flag: Option<String>,
    /// Additional recognizer arguments
    pub extra_args: Vec<String>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        let bin = get_from_env_or_path("VOIS_STT_BIN", "whisper-stream");
        let model = std::env::var("VOIS_STT_MODEL").ok().map(PathBuf::from);

        // Parse extra args from env (comma-separated)
        let extra_args = std::env::var("VOIS_STT_EXTRA_ARGS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|arg| arg.trim().to_string())
                    .filter(|arg| !arg.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bin,
            model,
            language_flag: Some("-l".to_string()),
            extra_args,
        }
    }
}

pub struct CommandRecognizer {
    cfg: RecognizerConfig,
}

impl CommandRecognizer {
    pub fn new(cfg: RecognizerConfig) -> Self {
        if let Some(ref bin) = cfg.bin {
            info!(target = "recognizer", bin = ?bin, "Detected recognizer binary");
        } else {
            warn!(target = "recognizer", "No recognizer binary found; speech input disabled");
            warn!(target = "recognizer", "Set VOIS_STT_BIN or install a recognizer CLI");
        }
        Self { cfg }
    }

    pub fn from_env() -> Self {
        Self::new(RecognizerConfig::default())
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    fn is_supported(&self) -> bool {
        self.cfg.bin.is_some()
    }

    async fn listen(&self, language: &str) -> Result<mpsc::Receiver<RecognitionEvent>> {
        let bin = self.cfg.bin.clone().ok_or_else(|| {
            VoisError::SpeechError("no recognizer binary configured".to_string())
        })?;

        let mut cmd = Command::new(&bin);
        if let Some(ref model) = self.cfg.model {
            cmd.arg("-m").arg(model);
        }
        if let Some(ref flag) = self.cfg.language_flag {
            if !language.is_empty() && language != "auto" {
                cmd.arg(flag).arg(language);
            }
        }
        for arg in &self.cfg.extra_args {
            cmd.arg(arg);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        debug!(target = "recognizer", command = ?cmd, "Starting recognition session");
        let child = cmd.spawn()?;

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            stream_transcripts(child, tx).await;
        });
        Ok(rx)
    }
}

async fn stream_transcripts(mut child: Child, tx: mpsc::Sender<RecognitionEvent>) {
    let Some(stdout) = child.stdout.take() else {
        let _ = tx
            .send(RecognitionEvent::Error("recognizer stdout unavailable".to_string()))
            .await;
        return;
    };

    let mut lines = BufReader::new(stdout).lines();
    let mut transcript = String::new();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        // Filter progress/status lines, keep actual transcript
        if line.is_empty() || line.starts_with('[') {
            continue;
        }
        transcript = line.to_string();
        if tx
            .send(RecognitionEvent::Partial(transcript.clone()))
            .await
            .is_err()
        {
            // Listener went away; stop the engine
            let _ = child.start_kill();
            return;
        }
    }

    match child.wait().await {
        Ok(status) if status.success() => {
            if transcript.is_empty() {
                debug!(target = "recognizer", "Session ended with no transcript");
            } else {
                let _ = tx.send(RecognitionEvent::Final(transcript)).await;
            }
        }
        Ok(status) => {
            warn!(target = "recognizer", %status, "Recognizer exited with failure");
            let _ = tx
                .send(RecognitionEvent::Error(format!(
                    "recognizer exited with status {status}"
                )))
                .await;
        }
        Err(e) => {
            warn!(target = "recognizer", error = %e, "Failed to reap recognizer process");
            let _ = tx.send(RecognitionEvent::Error(e.to_string())).await;
        }
    }
}
