//! Whisper encoder/decoder sessions for transcription and acoustic
//! language scoring.
//!
//! Model directories hold an Optimum-style export: `encoder_model.onnx`,
//! `decoder_model.onnx` and `tokenizer.json`. The decoder is driven without
//! a key-value cache; sequences here are short (a transcript or a single
//! language-scoring step), so the baseline path is enough.

use std::path::Path;

use ort::session::Session;
use ort::value::{TensorRef, Value};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::audio::{self, MelConfig, MelSpectrogram};
use crate::catalog;
use crate::device::Device;
use crate::error::{Error, Result};
use crate::models::{softmax, Transcriber};

const SAMPLE_RATE: u32 = 16_000;
/// 30 seconds at 16 kHz; the fixed acoustic context length.
const MEL_SAMPLES: usize = 480_000;
const N_FRAMES: usize = 3_000;
const MAX_DECODE_TOKENS: usize = 224;

const SOT_TOKEN: &str = "<|startoftranscript|>";
const EOT_TOKEN: &str = "<|endoftext|>";

pub struct WhisperModel {
    encoder: Session,
    decoder: Session,
    tokenizer: Tokenizer,
    mel: MelSpectrogram,
    n_mels: usize,
    sot: i64,
    eot: i64,
}

impl WhisperModel {
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self> {
        let encoder = device.create_session(&model_dir.join("encoder_model.onnx"))?;
        let decoder = device.create_session(&model_dir.join("decoder_model.onnx"))?;

        // The export's input shape tells us the mel-bin count; 80 for the
        // classic sizes, 128 for large-v3.
        let n_mels = encoder
            .inputs()
            .first()
            .and_then(|i| i.dtype().tensor_shape())
            .filter(|s| s.len() >= 2 && s[1] > 0)
            .map(|s| s[1] as usize)
            .unwrap_or(80);

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::ModelLoadError(format!("tokenizer: {e}")))?;

        let sot = required_token(&tokenizer, SOT_TOKEN)?;
        let eot = required_token(&tokenizer, EOT_TOKEN)?;

        let mel = MelSpectrogram::new(MelConfig {
            n_mels,
            ..MelConfig::default()
        })?;

        info!(
            dir = %model_dir.display(),
            n_mels,
            "loaded whisper encoder/decoder"
        );

        Ok(Self {
            encoder,
            decoder,
            tokenizer,
            mel,
            n_mels,
            sot,
            eot,
        })
    }

    /// Run the encoder over a fixed 30 s window. Returns the hidden states
    /// flattened, plus their time and feature dimensions.
    fn encode(&mut self, samples: &[f32]) -> Result<(Vec<f32>, usize, usize)> {
        let padded = audio::pad_or_trim(samples, MEL_SAMPLES);
        let mut frames = self.mel.compute(&padded)?;
        frames.truncate(N_FRAMES);

        // Mel-major layout: [1, n_mels, n_frames].
        let mut flat = vec![0.0f32; self.n_mels * N_FRAMES];
        for (t, frame) in frames.iter().enumerate() {
            for (m, &v) in frame.iter().enumerate() {
                flat[m * N_FRAMES + t] = v;
            }
        }

        let mel_val = Value::from_array((
            [1_i64, self.n_mels as i64, N_FRAMES as i64],
            flat,
        ))?;
        let outputs = self.encoder.run(ort::inputs!["input_features" => mel_val])?;
        let (shape, data) = outputs["last_hidden_state"].try_extract_tensor::<f32>()?;

        let (n_frames, d_model) = if shape.len() >= 3 {
            (shape[1] as usize, shape[2] as usize)
        } else {
            return Err(Error::InferenceError(format!(
                "unexpected encoder output rank {}",
                shape.len()
            )));
        };
        Ok((data.to_vec(), n_frames, d_model))
    }

    /// One full decoder pass; returns the logits row for the last position.
    fn decoder_logits(
        &mut self,
        tokens: &[i64],
        enc_data: &[f32],
        enc_frames: usize,
        d_model: usize,
    ) -> Result<Vec<f32>> {
        let input_ids = TensorRef::from_array_view(([1_i64, tokens.len() as i64], tokens))?;
        let hidden = TensorRef::from_array_view((
            [1_i64, enc_frames as i64, d_model as i64],
            enc_data,
        ))?;
        let outputs = self.decoder.run(ort::inputs![
            "input_ids" => input_ids,
            "encoder_hidden_states" => hidden,
        ])?;

        let (_, logits) = outputs["logits"].try_extract_tensor::<f32>()?;
        let vocab = logits.len() / tokens.len();
        let start = (tokens.len() - 1) * vocab;
        Ok(logits[start..start + vocab].to_vec())
    }
}

impl Transcriber for WhisperModel {
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn transcribe(&mut self, samples: &[f32]) -> Result<String> {
        let (enc_data, enc_frames, d_model) = self.encode(samples)?;

        let mut tokens = vec![self.sot];
        let mut generated: Vec<u32> = Vec::new();
        for _ in 0..MAX_DECODE_TOKENS {
            let logits = self.decoder_logits(&tokens, &enc_data, enc_frames, d_model)?;
            let next = argmax(&logits) as i64;
            if next == self.eot {
                break;
            }
            tokens.push(next);
            generated.push(next as u32);
        }

        let text = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| Error::InferenceError(format!("decode: {e}")))?;
        debug!(tokens = generated.len(), "greedy transcription complete");
        Ok(text.trim().to_string())
    }

    fn language_probs(&mut self, samples: &[f32]) -> Result<Vec<(String, f32)>> {
        let (enc_data, enc_frames, d_model) = self.encode(samples)?;
        let logits = self.decoder_logits(&[self.sot], &enc_data, enc_frames, d_model)?;

        // Score only the `<|xx|>` tokens for catalog codes. Codes the
        // tokenizer lacks are simply absent from the result.
        let mut scored: Vec<(String, f32)> = Vec::new();
        for code in catalog::codes() {
            if let Some(id) = self.tokenizer.token_to_id(&format!("<|{code}|>")) {
                if let Some(&logit) = logits.get(id as usize) {
                    scored.push((code.to_string(), logit));
                }
            }
        }

        let raw: Vec<f32> = scored.iter().map(|(_, l)| *l).collect();
        let probs = softmax(&raw);
        Ok(scored
            .into_iter()
            .zip(probs)
            .map(|((code, _), p)| (code, p))
            .collect())
    }
}

fn required_token(tokenizer: &Tokenizer, token: &str) -> Result<i64> {
    tokenizer
        .token_to_id(token)
        .map(i64::from)
        .ok_or_else(|| Error::ModelLoadError(format!("tokenizer is missing {token}")))
}

fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut best = f32::NEG_INFINITY;
    for (i, &v) in values.iter().enumerate() {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    best_idx
}
