//! Recognized backend names with no implementation in this engine.

use std::path::Path;

use crate::backends::Detection;
use crate::error::{Error, Result};

/// Uninhabited by design: `build` always fails, so no value of this type
/// exists and `detect` is unreachable by construction.
#[derive(Debug)]
pub enum UnsupportedBackend {}

impl UnsupportedBackend {
    pub fn build(name: &str) -> Result<Self> {
        Err(Error::ConfigError(format!(
            "backend '{name}' is recognized but not supported by this engine"
        )))
    }

    pub fn detect(&self, _audio_path: &Path) -> Result<Detection> {
        match *self {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_always_fails_with_config_error() {
        let err = UnsupportedBackend::build("ai4bharat").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
        assert!(err.to_string().contains("ai4bharat"));
    }
}
