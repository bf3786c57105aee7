//! Detector configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for constructing a [`crate::detector::LanguageDetector`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Backend identifier (`whisper`, `facebook_mms`, ...).
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Whisper model size used to locate the model directory.
    #[serde(default = "default_model_size")]
    pub model_size: String,

    /// Root directory holding model subdirectories.
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Device preference (`cpu`, `cuda`, `auto`).
    #[serde(default)]
    pub device: Option<String>,

    /// Intra-op thread count for inference sessions.
    #[serde(default = "default_intra_threads")]
    pub intra_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model_size: default_model_size(),
            models_dir: default_models_dir(),
            device: None,
            intra_threads: default_intra_threads(),
        }
    }
}

impl DetectorConfig {
    /// Directory holding the Whisper encoder/decoder export for the
    /// configured size.
    pub fn whisper_model_dir(&self) -> PathBuf {
        self.models_dir.join(format!("whisper-{}", self.model_size))
    }

    /// Directory holding the MMS-LID classifier export.
    pub fn mms_model_dir(&self) -> PathBuf {
        self.models_dir.join("mms-lid")
    }
}

fn default_backend() -> String {
    "whisper".to_string()
}

fn default_model_size() -> String {
    "small".to_string()
}

fn default_models_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VAANI_MODELS_DIR") {
        return PathBuf::from(dir);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vaani")
        .join("models")
}

fn default_intra_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(1, 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: DetectorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.backend, "whisper");
        assert_eq!(config.model_size, "small");
        assert!(config.device.is_none());
        assert!(config.intra_threads >= 1);
    }

    #[test]
    fn model_dirs_derive_from_root() {
        let config = DetectorConfig {
            models_dir: PathBuf::from("/models"),
            model_size: "base".to_string(),
            ..DetectorConfig::default()
        };
        assert_eq!(config.whisper_model_dir(), PathBuf::from("/models/whisper-base"));
        assert_eq!(config.mms_model_dir(), PathBuf::from("/models/mms-lid"));
    }
}
