use std::fs;
use std::path::{Path, PathBuf};

use vois_core::BackendConfig;
use vois_speech::{RecognizerConfig, SynthesizerConfig};

/// High-level configuration for the chat frontend
#[derive(Clone, Debug)]
pub struct ChatConfig {
    pub backend: BackendConfig,
    pub recognizer: RecognizerConfig,
    pub synth: SynthesizerConfig,
    /// Language tag passed to the recognizer
    pub language: String,
    /// Fetch and speak the opening prompt at startup
    pub initialize_on_start: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            recognizer: RecognizerConfig::default(),
            synth: SynthesizerConfig::default(),
            language: std::env::var("VOIS_LANG").unwrap_or_else(|_| "en-US".to_string()),
            initialize_on_start: std::env::var("VOIS_INITIALIZE")
                .map(|v| v != "0" && v.to_lowercase() != "false")
                .unwrap_or(true),
        }
    }
}

impl ChatConfig {
    /// Load configuration from a TOML file (path via VOIS_CONFIG or
    /// ./vois.toml), overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path = std::env::var("VOIS_CONFIG").unwrap_or_else(|_| "vois.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "vois_chat", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<ChatToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target = "vois_chat", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target = "vois_chat", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ChatToml {
    pub language: Option<String>,
    pub initialize_on_start: Option<bool>,
    pub backend: Option<BackendToml>,
    pub recognizer: Option<RecognizerToml>,
    pub synth: Option<SynthToml>,
}

impl ChatToml {
    fn overlay(self, mut base: ChatConfig) -> ChatConfig {
        if let Some(l) = self.language {
            base.language = l;
        }
        if let Some(i) = self.initialize_on_start {
            base.initialize_on_start = i;
        }
        if let Some(b) = self.backend {
            b.apply(&mut base.backend);
        }
        if let Some(r) = self.recognizer {
            r.apply(&mut base.recognizer);
        }
        if let Some(s) = self.synth {
            s.apply(&mut base.synth);
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct BackendToml {
    pub base_url: Option<String>,
    pub request_timeout_ms: Option<u64>,
}
impl BackendToml {
    fn apply(self, b: &mut BackendConfig) {
        if let Some(v) = self.base_url {
            b.base_url = v;
        }
        if let Some(v) = self.request_timeout_ms {
            b.request_timeout_ms = v;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct RecognizerToml {
    pub bin: Option<PathBuf>,
    pub model: Option<PathBuf>,
    pub language_flag: Option<String>,
    pub extra_args: Option<Vec<String>>, // e.g., ["--step", "500"]
}
impl RecognizerToml {
    fn apply(self, r: &mut RecognizerConfig) {
        if let Some(v) = self.bin {
            r.bin = Some(v);
        }
        if let Some(v) = self.model {
            r.model = Some(v);
        }
        if let Some(v) = self.language_flag {
            r.language_flag = Some(v);
        }
        if let Some(mut v) = self.extra_args {
            r.extra_args = v.drain(..).filter(|a| !a.is_empty()).collect();
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct SynthToml {
    pub piper_bin: Option<PathBuf>,
    pub piper_voice: Option<PathBuf>,
    pub espeak_bin: Option<PathBuf>,
    pub player: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
}
impl SynthToml {
    fn apply(self, s: &mut SynthesizerConfig) {
        if let Some(v) = self.piper_bin {
            s.piper_bin = Some(v);
        }
        if let Some(v) = self.piper_voice {
            s.piper_voice = Some(v);
        }
        if let Some(v) = self.espeak_bin {
            s.espeak_bin = Some(v);
        }
        if let Some(v) = self.player {
            s.player = Some(v);
        }
        if let Some(v) = self.temp_dir {
            s.temp_dir = v;
        }
    }
}
