//! Audio-classification backend over an MMS-LID style model.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::audio;
use crate::backends::Detection;
use crate::config::DetectorConfig;
use crate::device::Device;
use crate::error::Result;
use crate::label;
use crate::models::{AudioClassifier, MmsLidModel};

/// Language detection by direct audio classification.
pub struct ClassifierBackend {
    model: Box<dyn AudioClassifier>,
}

impl ClassifierBackend {
    pub fn load(config: &DetectorConfig, device: &Device) -> Result<Self> {
        let model = MmsLidModel::load(&config.mms_model_dir(), device)?;
        Ok(Self::with_model(Box::new(model)))
    }

    pub fn with_model(model: Box<dyn AudioClassifier>) -> Self {
        Self { model }
    }

    pub fn detect(&mut self, audio_path: &Path) -> Result<Detection> {
        let (samples, rate) = audio::read_wav(audio_path)?;
        // Resample only when the file's native rate disagrees with the model.
        let required = self.model.sample_rate();
        let samples = if rate != required {
            audio::resample_linear(&samples, rate, required)
        } else {
            samples
        };
        self.detect_samples(&samples)
    }

    pub(crate) fn detect_samples(&mut self, samples: &[f32]) -> Result<Detection> {
        let class_probs = self.model.classify(samples)?;

        let mut probabilities: HashMap<&'static str, f32> = HashMap::new();
        let mut unmapped = 0usize;
        for (index, &prob) in class_probs.iter().enumerate() {
            let Some(raw_label) = self.model.label(index) else {
                unmapped += 1;
                continue;
            };
            match label::map_label(raw_label) {
                // Several native labels can map to one code; keep the
                // strongest rather than summing.
                Some(code) => {
                    let entry = probabilities.entry(code).or_insert(0.0);
                    if prob > *entry {
                        *entry = prob;
                    }
                }
                None => unmapped += 1,
            }
        }
        if unmapped > 0 {
            debug!(unmapped, "discarded class labels outside the catalog");
        }

        if probabilities.is_empty() {
            debug!("no class label mapped into the catalog; reporting no detectable language");
            return Ok(Detection::none());
        }
        Ok(Detection::from_probs(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    struct FakeClassifier {
        labels: Vec<&'static str>,
        probs: Vec<f32>,
    }

    impl AudioClassifier for FakeClassifier {
        fn sample_rate(&self) -> u32 {
            16_000
        }

        fn classify(&mut self, _samples: &[f32]) -> Result<Vec<f32>> {
            Ok(self.probs.clone())
        }

        fn label(&self, index: usize) -> Option<&str> {
            self.labels.get(index).copied()
        }
    }

    fn backend(labels: Vec<&'static str>, probs: Vec<f32>) -> ClassifierBackend {
        ClassifierBackend::with_model(Box::new(FakeClassifier { labels, probs }))
    }

    #[test]
    fn aliases_combine_by_max_not_sum() {
        let mut backend = backend(vec!["hin_a", "hin_b"], vec![0.3, 0.7]);
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert_eq!(detection.code, Some("hi"));
        assert_eq!(detection.probabilities.get("hi"), Some(&0.7));
    }

    #[test]
    fn unmapped_labels_are_discarded() {
        let mut backend = backend(
            vec!["eng_Latn", "xz_unknown", "tam_Taml"],
            vec![0.5, 0.3, 0.2],
        );
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert_eq!(detection.code, Some("en"));
        assert_eq!(detection.probabilities.len(), 2);
        assert!(detection
            .probabilities
            .keys()
            .all(|code| catalog::is_supported(code)));
    }

    #[test]
    fn nothing_mapped_reports_no_language() {
        let mut backend = backend(vec!["xz_unknown", "qq_none"], vec![0.6, 0.4]);
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert!(detection.code.is_none());
        assert!(detection.probabilities.is_empty());
    }

    #[test]
    fn iso3_labels_map_through_the_prefix_tier() {
        let mut backend = backend(vec!["hin_Deva", "tel_Telu"], vec![0.4, 0.6]);
        let detection = backend.detect_samples(&[0.0; 160]).unwrap();
        assert_eq!(detection.code, Some("te"));
        assert!(detection.probabilities.contains_key("hi"));
    }
}
