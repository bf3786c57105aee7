//! vaani-core: spoken language identification.
//!
//! A [`detector::LanguageDetector`] wraps one of a closed set of detection
//! backends; `detect` answers with a best-guess catalog code plus a
//! per-language probability map. The reportable language set is the fixed
//! 39-entry [`catalog`].

pub mod audio;
pub mod backends;
pub mod catalog;
pub mod config;
pub mod detector;
pub mod device;
pub mod error;
pub mod label;
pub mod models;
pub mod text;

pub use config::DetectorConfig;
pub use detector::{Detection, LanguageDetector};
pub use error::{Error, Result};
