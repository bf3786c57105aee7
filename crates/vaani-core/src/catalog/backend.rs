//! Backend identifier parsing.
//!
//! The set of detection backends is closed. Identifiers accepted on the
//! public surface are normalized and matched against known aliases; anything
//! else is rejected up front so a misconfigured detector never half-loads.

use std::fmt;

/// Which family of backend an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Whisper-style transcribe-then-identify flow.
    Transcription,
    /// MMS-LID audio classification flow.
    Classifier,
    /// Recognized name whose implementation is not available in this build.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBackendError {
    input: String,
}

impl ParseBackendError {
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for ParseBackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown language detection backend: {}", self.input)
    }
}

impl std::error::Error for ParseBackendError {}

/// Parse a backend identifier into its kind.
///
/// Matching is forgiving about separators and case (`facebook_mms`,
/// `Facebook-MMS` and `facebookmms` are the same identifier) but strict
/// about the alias set itself.
pub fn parse_backend_kind(input: &str) -> Result<BackendKind, ParseBackendError> {
    let normalized = normalize_identifier(input);
    match normalized.as_str() {
        "whisper" => Ok(BackendKind::Transcription),
        "facebookmms" | "mms" | "mmslid" => Ok(BackendKind::Classifier),
        "ai4bharat" | "indicconformer" => Ok(BackendKind::Unsupported),
        _ => Err(ParseBackendError {
            input: input.to_string(),
        }),
    }
}

fn normalize_identifier(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}
