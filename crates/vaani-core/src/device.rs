//! Execution device selection and session construction.

use std::path::Path;

use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::Session;
use tracing::{info, warn};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Cuda,
}

/// Resolved execution device plus session-level threading settings.
#[derive(Debug, Clone)]
pub struct Device {
    pub kind: DeviceKind,
    pub intra_threads: usize,
}

impl Device {
    /// Resolve a device from an optional preference string.
    ///
    /// `cpu` and `auto` resolve to CPU. `cuda` is accepted as a preference;
    /// session construction falls back to CPU when the CUDA execution
    /// provider is not registered in the runtime. Unknown strings warn and
    /// resolve to CPU.
    pub fn detect_with_preference(preference: Option<&str>, intra_threads: usize) -> Self {
        let kind = match preference.map(|p| p.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("auto") | Some("cpu") => DeviceKind::Cpu,
            Some("cuda") => DeviceKind::Cuda,
            Some(other) => {
                warn!(preference = other, "unknown device preference; using CPU");
                DeviceKind::Cpu
            }
        };
        Self {
            kind,
            intra_threads: intra_threads.clamp(1, 32),
        }
    }

    /// Build an inference session for a model file on this device.
    pub fn create_session(&self, model_path: &Path) -> Result<Session> {
        if !model_path.exists() {
            return Err(Error::ModelNotFound(model_path.display().to_string()));
        }

        if self.kind == DeviceKind::Cuda {
            warn!("CUDA execution provider not registered in this build; running on CPU");
        }
        let session = SessionBuilder::new()?
            .with_intra_threads(self.intra_threads)
            .map_err(ort::Error::from)?
            .with_optimization_level(GraphOptimizationLevel::All)
            .map_err(ort::Error::from)?
            .commit_from_file(model_path)?;

        info!(
            path = %model_path.display(),
            intra_threads = self.intra_threads,
            "inference session ready"
        );
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_strings_resolve() {
        for pref in [None, Some("cpu"), Some("auto"), Some("tpu")] {
            let device = Device::detect_with_preference(pref, 4);
            assert_eq!(device.kind, DeviceKind::Cpu);
        }
        let cuda = Device::detect_with_preference(Some("CUDA"), 4);
        assert_eq!(cuda.kind, DeviceKind::Cuda);
    }

    #[test]
    fn intra_threads_are_clamped() {
        assert_eq!(Device::detect_with_preference(None, 0).intra_threads, 1);
        assert_eq!(Device::detect_with_preference(None, 99).intra_threads, 32);
    }

    #[test]
    fn missing_model_file_is_a_not_found_error() {
        let device = Device::detect_with_preference(None, 2);
        let err = device
            .create_session(Path::new("/nonexistent/model.onnx"))
            .unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }
}
