//! Transcribe-then-identify backend over a Whisper-style model.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::audio;
use crate::backends::Detection;
use crate::catalog;
use crate::config::DetectorConfig;
use crate::device::Device;
use crate::error::Result;
use crate::models::{Transcriber, WhisperModel};
use crate::text::ProperNounFilter;

/// Language detection gated by transcription.
///
/// The transcript decides only whether the audio carries speech at all;
/// the probabilities themselves come from the model's acoustic language
/// head, never from the text.
pub struct TranscriptionBackend {
    model: Box<dyn Transcriber>,
    filter: ProperNounFilter,
}

impl TranscriptionBackend {
    pub fn load(config: &DetectorConfig, device: &Device) -> Result<Self> {
        let model = WhisperModel::load(&config.whisper_model_dir(), device)?;
        Ok(Self::with_model(Box::new(model), ProperNounFilter::new()))
    }

    pub fn with_model(model: Box<dyn Transcriber>, filter: ProperNounFilter) -> Self {
        Self { model, filter }
    }

    pub fn detect(&mut self, audio_path: &Path) -> Result<Detection> {
        let (samples, rate) = audio::read_wav(audio_path)?;
        let samples = audio::resample_linear(&samples, rate, self.model.sample_rate());
        self.detect_samples(&samples)
    }

    pub(crate) fn detect_samples(&mut self, samples: &[f32]) -> Result<Detection> {
        let text = self.model.transcribe(samples)?;
        if text.trim().is_empty() {
            debug!("empty transcription; reporting no detectable language");
            return Ok(Detection::none());
        }

        let filtered = self.filter.filter(&text)?;
        // A transcript that was nothing but proper nouns still counts as
        // speech; fall back to the raw text for the gate.
        let gate = if filtered.trim().is_empty() {
            text.as_str()
        } else {
            filtered.as_str()
        };
        debug!(gate, "transcript passed the speech gate");

        let mut probabilities: HashMap<&'static str, f32> = HashMap::new();
        for (code, prob) in self.model.language_probs(samples)? {
            match catalog::canonical(&code) {
                Some(canonical) => {
                    probabilities.insert(canonical, prob);
                }
                None => warn!(code = %code, "dropping language code outside the catalog"),
            }
        }

        if probabilities.is_empty() {
            debug!("no catalog language scored; reporting no detectable language");
            return Ok(Detection::none());
        }
        Ok(Detection::from_probs(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{PosTag, PosTagger, TaggedToken};

    struct FakeTranscriber {
        text: String,
        probs: Vec<(String, f32)>,
    }

    impl Transcriber for FakeTranscriber {
        fn sample_rate(&self) -> u32 {
            16_000
        }

        fn transcribe(&mut self, _samples: &[f32]) -> Result<String> {
            Ok(self.text.clone())
        }

        fn language_probs(&mut self, _samples: &[f32]) -> Result<Vec<(String, f32)>> {
            Ok(self.probs.clone())
        }
    }

    struct AllProperNouns;

    impl PosTagger for AllProperNouns {
        fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
            Ok(text
                .split_whitespace()
                .map(|w| TaggedToken {
                    text: w.to_string(),
                    tag: PosTag::ProperNoun,
                })
                .collect())
        }
    }

    fn backend(text: &str, probs: Vec<(&str, f32)>) -> TranscriptionBackend {
        TranscriptionBackend::with_model(
            Box::new(FakeTranscriber {
                text: text.to_string(),
                probs: probs
                    .into_iter()
                    .map(|(c, p)| (c.to_string(), p))
                    .collect(),
            }),
            ProperNounFilter::new(),
        )
    }

    #[test]
    fn empty_transcription_reports_no_language() {
        let mut backend = backend("", vec![("hi", 0.9)]);
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert!(detection.code.is_none());
        assert!(detection.probabilities.is_empty());
    }

    #[test]
    fn argmax_picks_highest_catalog_language() {
        let mut backend = backend(
            "some ordinary words",
            vec![("hi", 0.4), ("bn", 0.6), ("ta", 0.1)],
        );
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert_eq!(detection.code, Some("bn"));
        assert_eq!(detection.probabilities.len(), 3);
    }

    #[test]
    fn non_catalog_codes_are_dropped() {
        let mut backend = backend(
            "some ordinary words",
            vec![("xx", 0.9), ("hi", 0.1)],
        );
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert_eq!(detection.code, Some("hi"));
        assert!(!detection.probabilities.contains_key("xx"));
    }

    #[test]
    fn all_dropped_codes_report_no_language() {
        let mut backend = backend("some ordinary words", vec![("xx", 0.9), ("yy", 0.1)]);
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert!(detection.code.is_none());
        assert!(detection.probabilities.is_empty());
    }

    #[test]
    fn all_proper_noun_transcript_still_detects() {
        let mut backend = TranscriptionBackend::with_model(
            Box::new(FakeTranscriber {
                text: "Ramesh Delhi".to_string(),
                probs: vec![("hi".to_string(), 0.8)],
            }),
            ProperNounFilter::with_tagger(Box::new(AllProperNouns)),
        );
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert_eq!(detection.code, Some("hi"));
    }

    #[test]
    fn probability_keys_are_catalog_members() {
        let mut backend = backend(
            "some ordinary words",
            vec![("hi", 0.3), ("en", 0.5), ("zz", 0.2)],
        );
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert!(detection
            .probabilities
            .keys()
            .all(|code| catalog::is_supported(code)));
    }
}
