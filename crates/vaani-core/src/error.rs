//! Error types shared across the engine.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Engine-wide error taxonomy.
///
/// Configuration problems surface at construction time and are fatal.
/// Absence of signal (nothing detectable in the audio) is never an error;
/// it is reported as an empty detection. Inference failures propagate
/// unmodified, with no retry layer.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Audio decode error: {0}")]
    Wav(#[from] hound::Error),

    #[error("ONNX Runtime error: {0}")]
    Ort(#[from] ort::Error),
}
