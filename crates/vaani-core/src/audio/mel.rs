//! Log-mel spectrogram frontend for the Whisper acoustic path.

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct MelConfig {
    pub sample_rate: u32,
    pub n_fft: usize,
    pub hop_length: usize,
    pub n_mels: usize,
    pub f_min: f32,
    pub f_max: f32,
}

impl Default for MelConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            n_fft: 400,
            hop_length: 160,
            n_mels: 80,
            f_min: 0.0,
            f_max: 8_000.0,
        }
    }
}

/// Computes Whisper-normalized log-mel frames from mono f32 audio.
pub struct MelSpectrogram {
    config: MelConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    filterbank: Vec<Vec<f32>>,
}

impl MelSpectrogram {
    pub fn new(config: MelConfig) -> Result<Self> {
        if config.n_fft == 0 || config.hop_length == 0 || config.n_mels == 0 {
            return Err(Error::InvalidInput(
                "mel configuration dimensions must be non-zero".to_string(),
            ));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.n_fft);
        let window = hann_window(config.n_fft);
        let filterbank = mel_filterbank(
            config.n_fft / 2 + 1,
            config.n_mels,
            config.sample_rate as f32,
            config.f_min,
            config.f_max,
        );

        Ok(Self {
            config,
            fft,
            window,
            filterbank,
        })
    }

    pub fn config(&self) -> &MelConfig {
        &self.config
    }

    /// Frame-major log-mel output: `frames[t][m]` for frame `t`, mel bin `m`.
    pub fn compute(&self, samples: &[f32]) -> Result<Vec<Vec<f32>>> {
        if samples.is_empty() {
            return Err(Error::InvalidInput("empty audio input".to_string()));
        }

        let n_fft = self.config.n_fft;
        let hop = self.config.hop_length;
        let n_bins = n_fft / 2 + 1;
        let padded = reflect_pad(samples, n_fft / 2);

        let n_frames = (padded.len() - n_fft) / hop + 1;
        let mut frames = Vec::with_capacity(n_frames);
        let mut buf = vec![Complex::new(0.0f32, 0.0); n_fft];

        for t in 0..n_frames {
            let start = t * hop;
            for (i, slot) in buf.iter_mut().enumerate() {
                *slot = Complex::new(padded[start + i] * self.window[i], 0.0);
            }
            self.fft.process(&mut buf);

            // Power spectrum folded through the mel filterbank in one pass.
            let mut mel_frame = vec![0.0f32; self.config.n_mels];
            for (bin, value) in buf.iter().take(n_bins).enumerate() {
                let power = value.norm_sqr();
                for (m, filter) in self.filterbank.iter().enumerate() {
                    mel_frame[m] += power * filter[bin];
                }
            }
            for v in mel_frame.iter_mut() {
                *v = v.max(1e-10).log10();
            }
            frames.push(mel_frame);
        }

        whisper_normalize(&mut frames);
        Ok(frames)
    }
}

/// Clamp to eight decades below the global peak, then rescale to roughly ±1.
fn whisper_normalize(frames: &mut [Vec<f32>]) {
    let mut max_val = f32::NEG_INFINITY;
    for frame in frames.iter() {
        for &v in frame.iter() {
            if v > max_val {
                max_val = v;
            }
        }
    }

    let floor = max_val - 8.0;
    for frame in frames.iter_mut() {
        for v in frame.iter_mut() {
            *v = (v.max(floor) + 4.0) / 4.0;
        }
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - f32::cos(2.0 * std::f32::consts::PI * i as f32 / size as f32)))
        .collect()
}

fn reflect_pad(samples: &[f32], pad: usize) -> Vec<f32> {
    let n = samples.len();
    let mut out = Vec::with_capacity(n + pad * 2);
    if n == 1 {
        out.resize(pad, samples[0]);
        out.push(samples[0]);
        out.resize(pad * 2 + 1, samples[0]);
        return out;
    }
    for i in 0..pad {
        out.push(samples[(pad - i).min(n - 1)]);
    }
    out.extend_from_slice(samples);
    for i in 0..pad {
        out.push(samples[n.saturating_sub(2 + i)]);
    }
    out
}

/// Slaney-normalized triangular mel filterbank, `[n_mels][n_bins]`.
fn mel_filterbank(
    n_bins: usize,
    n_mels: usize,
    sample_rate: f32,
    f_min: f32,
    f_max: f32,
) -> Vec<Vec<f32>> {
    let bin_freqs: Vec<f32> = (0..n_bins)
        .map(|i| (sample_rate / 2.0) * (i as f32) / (n_bins - 1) as f32)
        .collect();

    let mel_lo = hertz_to_mel(f_min);
    let mel_hi = hertz_to_mel(f_max);
    let edges: Vec<f32> = (0..=n_mels + 1)
        .map(|i| mel_to_hertz(mel_lo + (mel_hi - mel_lo) * i as f32 / (n_mels + 1) as f32))
        .collect();

    let mut bank = vec![vec![0.0f32; n_bins]; n_mels];
    for (m, row) in bank.iter_mut().enumerate() {
        let (lower, center, upper) = (edges[m], edges[m + 1], edges[m + 2]);
        let norm = if upper > lower {
            2.0 / (upper - lower)
        } else {
            0.0
        };
        for (bin, &freq) in bin_freqs.iter().enumerate() {
            let rise = if center > lower {
                (freq - lower) / (center - lower)
            } else {
                0.0
            };
            let fall = if upper > center {
                (upper - freq) / (upper - center)
            } else {
                0.0
            };
            row[bin] = rise.min(fall).max(0.0) * norm;
        }
    }
    bank
}

fn hertz_to_mel(freq: f32) -> f32 {
    let min_log_hertz = 1000.0;
    let min_log_mel = 15.0;
    let logstep = 27.0 / (6.4f32).ln();
    if freq < min_log_hertz {
        3.0 * freq / 200.0
    } else {
        min_log_mel + (freq / min_log_hertz).ln() * logstep
    }
}

fn mel_to_hertz(mel: f32) -> f32 {
    let min_log_hertz = 1000.0;
    let min_log_mel = 15.0;
    let logstep = (6.4f32).ln() / 27.0;
    if mel < min_log_mel {
        200.0 * mel / 3.0
    } else {
        min_log_hertz * ((mel - min_log_mel) * logstep).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_follows_hop_length() {
        let mel = MelSpectrogram::new(MelConfig::default()).unwrap();
        let samples = vec![0.0f32; 16_000];
        let frames = mel.compute(&samples).unwrap();
        // One second at hop 160 with center padding: 100 frames plus one.
        assert_eq!(frames.len(), 101);
        assert_eq!(frames[0].len(), 80);
    }

    #[test]
    fn output_is_whisper_normalized() {
        let mel = MelSpectrogram::new(MelConfig::default()).unwrap();
        let samples: Vec<f32> = (0..16_000)
            .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / 16_000.0).sin())
            .collect();
        let frames = mel.compute(&samples).unwrap();
        let max = frames
            .iter()
            .flat_map(|f| f.iter())
            .fold(f32::NEG_INFINITY, |a, &b| a.max(b));
        let min = frames
            .iter()
            .flat_map(|f| f.iter())
            .fold(f32::INFINITY, |a, &b| a.min(b));
        // Span after normalization is at most two (eight decades over four).
        assert!(max - min <= 2.0 + 1e-4);
    }

    #[test]
    fn zero_config_rejected() {
        let cfg = MelConfig {
            n_mels: 0,
            ..MelConfig::default()
        };
        assert!(MelSpectrogram::new(cfg).is_err());
    }
}
