//! Detection backends behind a closed tagged enum.

mod classifier;
mod transcription;
mod unsupported;

pub use classifier::ClassifierBackend;
pub use transcription::TranscriptionBackend;
pub use unsupported::UnsupportedBackend;

use std::collections::HashMap;
use std::path::Path;

use crate::error::Result;

/// Result of a detection query.
///
/// `code` is `None` when the recording carries no detectable speech signal;
/// that outcome is data, not an error, and comes with an empty probability
/// map. Every key in `probabilities` is a catalog member.
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub code: Option<&'static str>,
    pub probabilities: HashMap<&'static str, f32>,
}

impl Detection {
    /// The no-signal outcome.
    pub fn none() -> Self {
        Self::default()
    }

    /// Detection with the argmax code pre-selected.
    pub(crate) fn from_probs(probabilities: HashMap<&'static str, f32>) -> Self {
        let code = select_top(&probabilities);
        Self {
            code,
            probabilities,
        }
    }
}

/// The full set of detection backends. The variant set is fixed; adding a
/// backend means adding a variant, never stringly-typed dispatch.
pub enum Backend {
    Transcription(TranscriptionBackend),
    Classifier(ClassifierBackend),
    Unsupported(UnsupportedBackend),
}

impl Backend {
    pub fn detect(&mut self, audio_path: &Path) -> Result<Detection> {
        match self {
            Backend::Transcription(backend) => backend.detect(audio_path),
            Backend::Classifier(backend) => backend.detect(audio_path),
            Backend::Unsupported(backend) => backend.detect(audio_path),
        }
    }
}

/// Argmax over a probability map. Exact ties go to the lexicographically
/// smallest code so repeated runs always agree.
pub(crate) fn select_top(probabilities: &HashMap<&'static str, f32>) -> Option<&'static str> {
    let mut best: Option<(&'static str, f32)> = None;
    for (&code, &prob) in probabilities {
        best = match best {
            None => Some((code, prob)),
            Some((best_code, best_prob)) => {
                if prob > best_prob || (prob == best_prob && code < best_code) {
                    Some((code, prob))
                } else {
                    Some((best_code, best_prob))
                }
            }
        };
    }
    best.map(|(code, _)| code)
}
