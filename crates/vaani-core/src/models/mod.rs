//! Model wrappers and the trait seams the backends consume.
//!
//! Backends never talk to ONNX Runtime directly; they hold boxed trait
//! objects so tests can substitute fakes and model formats can change
//! without touching detection logic.

pub mod mms;
pub mod whisper;

pub use mms::MmsLidModel;
pub use whisper::WhisperModel;

use crate::error::Result;

/// Speech-to-text model that can also score languages acoustically.
pub trait Transcriber: Send {
    /// Expected input sample rate.
    fn sample_rate(&self) -> u32;

    /// Unconstrained greedy transcription of mono audio.
    fn transcribe(&mut self, samples: &[f32]) -> Result<String>;

    /// Per-language probabilities computed from the audio alone.
    fn language_probs(&mut self, samples: &[f32]) -> Result<Vec<(String, f32)>>;
}

/// Audio classification model emitting a probability per class label.
pub trait AudioClassifier: Send {
    /// Expected input sample rate.
    fn sample_rate(&self) -> u32;

    /// Softmax probabilities over the model's label set.
    fn classify(&mut self, samples: &[f32]) -> Result<Vec<f32>>;

    /// Native label for a class index.
    fn label(&self, index: usize) -> Option<&str>;
}

/// Numerically stable softmax.
pub(crate) fn softmax(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 {
        exps.iter().map(|&e| e / sum).collect()
    } else {
        vec![0.0; values.len()]
    }
}
