// Speech synthesis through local CLI engines
//
// Utterances are queued on a channel and drained by a worker task, one
// engine process at a time. Engine selection degrades gracefully:
// - Prefer Piper (higher quality, requires a voice model and a player)
// - Fall back to espeak-ng (widely available, plays directly)
// - If neither is present, log the text and report success
//
// `cancel_all` bumps a generation counter (queued utterances from older
// generations are discarded) and kills the in-flight engine process.

use crate::utils::{gen_id, get_from_env_or_path, get_from_path};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};
use vois_core::{Result, SpeechSynthesizer, VoisError};

#[derive(Clone, Debug)]
pub struct SynthesizerConfig {
    pub piper_bin: Option<PathBuf>,
    pub piper_voice: Option<PathBuf>,
    pub espeak_bin: Option<PathBuf>,
    /// WAV player for Piper output (aplay/paplay/ffplay)
    pub player: Option<PathBuf>,
    pub temp_dir: PathBuf,
    pub queue_depth: usize,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        let piper_bin = get_from_env_or_path("VOIS_PIPER_BIN", "piper");
        let piper_voice = std::env::var("VOIS_PIPER_VOICE").ok().map(PathBuf::from);
        let espeak_bin = get_from_env_or_path("VOIS_ESPEAK_BIN", "espeak-ng")
            .or_else(|| get_from_path("espeak"));
        let player = std::env::var("VOIS_TTS_PLAYER")
            .ok()
            .and_then(|p| get_from_path(&p))
            .or_else(|| get_from_path("aplay"))
            .or_else(|| get_from_path("paplay"))
            .or_else(|| get_from_path("ffplay"));
        let temp_dir = std::env::var("VOIS_TTS_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir());

        Self {
            piper_bin,
            piper_voice,
            espeak_bin,
            player,
            temp_dir,
            queue_depth: 16,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Engine {
    Piper { bin: PathBuf, voice: PathBuf },
    Espeak { bin: PathBuf },
    None,
}

fn select_engine(cfg: &SynthesizerConfig) -> Engine {
    if let (Some(bin), Some(voice)) = (&cfg.piper_bin, &cfg.piper_voice) {
        return Engine::Piper {
            bin: bin.clone(),
            voice: voice.clone(),
        };
    }
    if let Some(bin) = &cfg.espeak_bin {
        return Engine::Espeak { bin: bin.clone() };
    }
    Engine::None
}

#[derive(Debug)]
struct Utterance {
    text: String,
    generation: u64,
}

pub struct SystemSynthesizer {
    queue: mpsc::Sender<Utterance>,
    generation: Arc<AtomicU64>,
    current: Arc<Mutex<Option<Child>>>,
}

impl SystemSynthesizer {
    pub fn new(cfg: SynthesizerConfig) -> Self {
        let engine = select_engine(&cfg);
        match &engine {
            Engine::Piper { bin, .. } => {
                info!(target = "tts", bin = ?bin, "Detected Piper binary")
            }
            Engine::Espeak { bin } => {
                info!(target = "tts", bin = ?bin, "Detected espeak-ng binary")
            }
            Engine::None => {
                warn!(target = "tts", "No TTS engine detected (Piper/espeak-ng missing). Printing only.")
            }
        }

        let (tx, rx) = mpsc::channel(cfg.queue_depth.max(1));
        let generation = Arc::new(AtomicU64::new(0));
        let current = Arc::new(Mutex::new(None));

        let worker_generation = Arc::clone(&generation);
        let worker_current = Arc::clone(&current);
        tokio::spawn(async move {
            run_queue(rx, engine, cfg, worker_generation, worker_current).await;
        });

        Self {
            queue: tx,
            generation,
            current,
        }
    }

    pub fn from_env() -> Self {
        Self::new(SynthesizerConfig::default())
    }
}

#[async_trait]
impl SpeechSynthesizer for SystemSynthesizer {
    async fn speak(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let utterance = Utterance {
            text: text.to_string(),
            generation: self.generation.load(Ordering::SeqCst),
        };
        self.queue
            .send(utterance)
            .await
            .map_err(|_| VoisError::SpeechError("synthesis queue closed".to_string()))
    }

    fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.current.lock() {
            if let Some(child) = guard.as_mut() {
                debug!(target = "tts", "Killing in-flight engine process");
                let _ = child.start_kill();
            }
        }
    }
}

async fn run_queue(
    mut rx: mpsc::Receiver<Utterance>,
    engine: Engine,
    cfg: SynthesizerConfig,
    generation: Arc<AtomicU64>,
    current: Arc<Mutex<Option<Child>>>,
) {
    while let Some(utterance) = rx.recv().await {
        if utterance.generation < generation.load(Ordering::SeqCst) {
            debug!(target = "tts", "Skipping cancelled utterance");
            continue;
        }
        if let Err(e) = speak_one(&engine, &cfg, &utterance.text, &current).await {
            warn!(target = "tts", error = %e, "Utterance failed");
        }
    }
}

async fn speak_one(
    engine: &Engine,
    cfg: &SynthesizerConfig,
    text: &str,
    current: &Arc<Mutex<Option<Child>>>,
) -> Result<()> {
    match engine {
        Engine::None => {
            info!(target = "tts", text = %text, "No TTS engine; printing only");
            Ok(())
        }
        Engine::Espeak { bin } => {
            let mut cmd = Command::new(bin);
            cmd.arg(text);
            run_tracked(cmd, None, current).await
        }
        Engine::Piper { bin, voice } => {
            let wav_path = cfg.temp_dir.join(format!("vois_tts_{}.wav", gen_id()));
            let mut cmd = Command::new(bin);
            cmd.arg("--model")
                .arg(voice)
                .arg("--output_file")
                .arg(&wav_path);
            run_tracked(cmd, Some(text), current).await?;

            let res = match &cfg.player {
                Some(player) => {
                    let mut play = Command::new(player);
                    play.arg(&wav_path);
                    run_tracked(play, None, current).await
                }
                None => {
                    warn!(target = "tts", "No WAV player found; synthesized audio not played");
                    Ok(())
                }
            };
            let _ = std::fs::remove_file(&wav_path);
            res
        }
    }
}

/// Spawn the engine command, register it as the in-flight child so
/// `cancel_all` can kill it, and wait for it to exit.
async fn run_tracked(
    mut cmd: Command,
    stdin_text: Option<&str>,
    current: &Arc<Mutex<Option<Child>>>,
) -> Result<()> {
    cmd.stdout(Stdio::null()).stderr(Stdio::null());
    if stdin_text.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }
    cmd.kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stdin = child.stdin.take();

    // Register before feeding stdin so cancel_all can kill the child from
    // the moment it exists
    if let Ok(mut guard) = current.lock() {
        *guard = Some(child);
    }

    if let (Some(text), Some(mut stdin)) = (stdin_text, stdin) {
        let write = async {
            stdin.write_all(text.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            std::io::Result::Ok(())
        };
        // A cancelled child closes its stdin; that is not an utterance error
        if let Err(e) = write.await {
            debug!(target = "tts", error = %e, "Engine stdin closed early");
        }
    }
    wait_current(current).await
}

async fn wait_current(current: &Arc<Mutex<Option<Child>>>) -> Result<()> {
    loop {
        {
            let Ok(mut guard) = current.lock() else {
                return Ok(());
            };
            match guard.as_mut() {
                Some(child) => match child.try_wait() {
                    Ok(Some(status)) => {
                        *guard = None;
                        if !status.success() {
                            return Err(VoisError::SpeechError(format!(
                                "engine exited with status {status}"
                            )));
                        }
                        return Ok(());
                    }
                    Ok(None) => {}
                    Err(e) => {
                        *guard = None;
                        return Err(VoisError::IoError(e));
                    }
                },
                None => return Ok(()),
            }
        }
        sleep(Duration::from_millis(25)).await;
    }
}
