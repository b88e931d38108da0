//! Settings file.
//!
//! Every group and every field falls back to its default, so an empty `{}`
//! (or no `--config` at all) is a valid configuration:
//!
//! ```json
//! {
//!   "static_mode":  { "labels": "data/static/labels.txt",
//!                     "model":  "models/static/model.json",
//!                     "dataset": "data/static/dataset.csv" },
//!   "dynamic_mode": { "labels": "data/dynamic/labels.txt",
//!                     "model":  "models/dynamic/model.json",
//!                     "dataset_dir": "data/dynamic/sequences" },
//!   "composition":  { "threshold": 0.75, "max_word_length": 30, "max_sentence_length": 60 },
//!   "timer":        { "interval_ms": 2000, "poll_ms": 10 },
//!   "capture":      { "sequence_frames": 30 }
//! }
//! ```
//!
//! Without a `dynamic_mode` group the word modes reuse the static labels and
//! model, and sequences are stored next to the static dataset.

use serde::{Deserialize, Serialize};
use sign_compose::{ComposeLimits, TimerSettings, DEFAULT_THRESHOLD};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub static_mode:  StaticResources,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_mode: Option<DynamicResources>,
    pub composition:  CompositionSettings,
    pub timer:        TimerSettings,
    pub capture:      CaptureSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticResources {
    pub labels:  PathBuf,
    pub model:   PathBuf,
    pub dataset: PathBuf,
}

impl Default for StaticResources {
    fn default() -> Self {
        StaticResources {
            labels:  PathBuf::from("data/static/labels.txt"),
            model:   PathBuf::from("models/static/model.json"),
            dataset: PathBuf::from("data/static/dataset.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DynamicResources {
    pub labels:      PathBuf,
    pub model:       PathBuf,
    pub dataset_dir: PathBuf,
}

impl Default for DynamicResources {
    fn default() -> Self {
        DynamicResources {
            labels:      PathBuf::from("data/dynamic/labels.txt"),
            model:       PathBuf::from("models/dynamic/model.json"),
            dataset_dir: PathBuf::from("data/dynamic/sequences"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    pub threshold:           f32,
    pub max_word_length:     usize,
    pub max_sentence_length: usize,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        let limits = ComposeLimits::default();
        CompositionSettings {
            threshold:           DEFAULT_THRESHOLD,
            max_word_length:     limits.max_word_length,
            max_sentence_length: limits.max_sentence_length,
        }
    }
}

impl CompositionSettings {
    pub fn limits(&self) -> ComposeLimits {
        ComposeLimits {
            max_word_length:     self.max_word_length,
            max_sentence_length: self.max_sentence_length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureSettings {
    /// Frames recorded per dynamic sign.
    pub sequence_frames: usize,
}

impl Default for CaptureSettings {
    fn default() -> Self { CaptureSettings { sequence_frames: 30 } }
}

impl Settings {
    /// Directory dynamic sequences are written to.
    pub fn sequence_dir(&self) -> PathBuf {
        match &self.dynamic_mode {
            Some(d) => d.dataset_dir.clone(),
            None => self.static_mode.dataset
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("sequences"),
        }
    }
}

/// Read settings from `path`, or return the defaults when there is none.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigurationError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigurationError::SettingsNotFound(path.to_path_buf()),
        _ => ConfigurationError::SettingsIo { path: path.to_path_buf(), source: e },
    })?;
    let settings = serde_json::from_str(&text)
        .map_err(|source| ConfigurationError::SettingsParse { path: path.to_path_buf(), source })?;
    info!(path = %path.display(), "loaded settings");
    Ok(settings)
}
