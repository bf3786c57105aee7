//! MMS-LID audio classifier session.
//!
//! The model directory holds `model.onnx`, the exporter's `config.json`
//! (for `id2label`) and `preprocessor_config.json` (for the sampling rate
//! and input normalization). Exports disagree on whether the waveform input
//! is rank 1 (`[samples]`) or rank 2 (`[batch, samples]`); the session's
//! input metadata decides which convention to feed.

use std::collections::HashMap;
use std::path::Path;

use ort::session::{Session, SessionInputValue};
use ort::value::Value;
use serde::Deserialize;
use tracing::info;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::models::{softmax, AudioClassifier};

#[derive(Debug, Deserialize)]
struct ClassifierConfig {
    id2label: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct FeatureExtractorConfig {
    #[serde(default = "default_sampling_rate")]
    sampling_rate: u32,
    #[serde(default = "default_do_normalize")]
    do_normalize: bool,
}

fn default_sampling_rate() -> u32 {
    16_000
}

fn default_do_normalize() -> bool {
    true
}

pub struct MmsLidModel {
    session: Session,
    labels: HashMap<usize, String>,
    sample_rate: u32,
    do_normalize: bool,
    input_name: String,
    input_rank: usize,
}

impl MmsLidModel {
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self> {
        let config: ClassifierConfig = {
            let data = std::fs::read_to_string(model_dir.join("config.json"))?;
            serde_json::from_str(&data)?
        };
        let extractor: FeatureExtractorConfig = {
            let data = std::fs::read_to_string(model_dir.join("preprocessor_config.json"))?;
            serde_json::from_str(&data)?
        };

        let mut labels = HashMap::with_capacity(config.id2label.len());
        for (key, label) in config.id2label {
            let index: usize = key.parse().map_err(|_| {
                Error::ModelLoadError(format!("non-numeric id2label key: {key}"))
            })?;
            labels.insert(index, label);
        }
        if labels.is_empty() {
            return Err(Error::ModelLoadError(
                "classifier config has an empty id2label table".to_string(),
            ));
        }

        let session = device.create_session(&model_dir.join("model.onnx"))?;
        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input_values".to_string());
        let input_rank = session
            .inputs()
            .first()
            .and_then(|i| i.dtype().tensor_shape())
            .map(|s| s.len())
            .unwrap_or(2);

        info!(
            dir = %model_dir.display(),
            labels = labels.len(),
            sample_rate = extractor.sampling_rate,
            input_rank,
            "loaded MMS-LID classifier"
        );

        Ok(Self {
            session,
            labels,
            sample_rate: extractor.sampling_rate,
            do_normalize: extractor.do_normalize,
            input_name,
            input_rank,
        })
    }
}

impl AudioClassifier for MmsLidModel {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn classify(&mut self, samples: &[f32]) -> Result<Vec<f32>> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("empty audio input".to_string()));
        }

        let values = if self.do_normalize {
            zero_mean_unit_var(samples)
        } else {
            samples.to_vec()
        };

        let n = values.len() as i64;
        let value = if self.input_rank == 1 {
            Value::from_array(([n], values))?
        } else {
            Value::from_array(([1_i64, n], values))?
        };

        let outputs = self.session.run(vec![(
            self.input_name.clone(),
            SessionInputValue::from(value.into_dyn()),
        )])?;
        let (_, logits) = outputs["logits"].try_extract_tensor::<f32>()?;

        Ok(softmax(logits))
    }

    fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(&index).map(|s| s.as_str())
    }
}

fn zero_mean_unit_var(samples: &[f32]) -> Vec<f32> {
    let n = samples.len() as f32;
    let mean = samples.iter().sum::<f32>() / n;
    let var = samples.iter().map(|&s| (s - mean) * (s - mean)).sum::<f32>() / n;
    let denom = (var + 1e-7).sqrt();
    samples.iter().map(|&s| (s - mean) / denom).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_centers_and_scales() {
        let out = zero_mean_unit_var(&[1.0, 2.0, 3.0, 4.0]);
        let mean: f32 = out.iter().sum::<f32>() / out.len() as f32;
        let var: f32 = out.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>()
            / out.len() as f32;
        assert!(mean.abs() < 1e-5);
        assert!((var - 1.0).abs() < 1e-3);
    }
}
