//! Detector construction and the public detection entry point.

use std::path::Path;

use tracing::info;

use crate::backends::{Backend, ClassifierBackend, TranscriptionBackend, UnsupportedBackend};
use crate::catalog::{parse_backend_kind, BackendKind};
use crate::config::DetectorConfig;
use crate::device::Device;
use crate::error::{Error, Result};

pub use crate::backends::Detection;

/// Identifies the spoken language of audio recordings.
///
/// Construction is fail-fast: backend parsing, model loading and device
/// resolution all happen here, so a detector that exists can serve queries.
/// The API is synchronous and single-threaded; a detection call borrows the
/// detector mutably because inference sessions are not reentrant.
pub struct LanguageDetector {
    backend: Backend,
}

impl std::fmt::Debug for LanguageDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageDetector").finish_non_exhaustive()
    }
}

impl LanguageDetector {
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let kind = parse_backend_kind(&config.backend)
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        let device = Device::detect_with_preference(config.device.as_deref(), config.intra_threads);

        let backend = match kind {
            BackendKind::Transcription => {
                info!(backend = %config.backend, "constructing transcription backend");
                Backend::Transcription(TranscriptionBackend::load(config, &device)?)
            }
            BackendKind::Classifier => {
                info!(backend = %config.backend, "constructing classifier backend");
                Backend::Classifier(ClassifierBackend::load(config, &device)?)
            }
            BackendKind::Unsupported => {
                Backend::Unsupported(UnsupportedBackend::build(&config.backend)?)
            }
        };

        Ok(Self { backend })
    }

    /// Identify the language of a WAV recording on disk.
    pub fn detect(&mut self, audio_path: &Path) -> Result<Detection> {
        self.backend.detect(audio_path)
    }
}
