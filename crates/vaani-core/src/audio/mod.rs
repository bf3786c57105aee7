//! Audio ingestion and normalization shared by every backend.

mod mel;

pub use mel::{MelConfig, MelSpectrogram};

use std::path::Path;

use crate::error::{Error, Result};

/// Decode a WAV file to mono f32 samples plus the file's native sample rate.
///
/// Integer samples are normalized to ±1.0 by their bit depth; float samples
/// pass through. Multi-channel audio is collapsed by per-frame averaging.
/// Non-finite samples are zeroed and everything is clamped to ±1.0.
pub fn read_wav(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let mut samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max = ((1u32 << (spec.bits_per_sample - 1)) - 1) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f32 / max).clamp(-1.0, 1.0)))
                .collect::<std::result::Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
    };

    if channels > 1 {
        samples = samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect();
    }

    for s in samples.iter_mut() {
        if !s.is_finite() {
            *s = 0.0;
        }
        *s = s.clamp(-1.0, 1.0);
    }

    if samples.is_empty() {
        return Err(Error::InvalidInput(format!(
            "no audio samples in {}",
            path.display()
        )));
    }

    Ok((samples, spec.sample_rate))
}

/// Linear-interpolation resampler. Identity when the rates already match.
pub fn resample_linear(samples: &[f32], src_rate: u32, dst_rate: u32) -> Vec<f32> {
    if src_rate == dst_rate {
        return samples.to_vec();
    }

    let ratio = dst_rate as f32 / src_rate as f32;
    let out_len = ((samples.len() as f32) * ratio).ceil() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let src_pos = i as f32 / ratio;
        let idx = src_pos.floor() as usize;
        let frac = src_pos - idx as f32;
        let s0 = *samples.get(idx).unwrap_or(&0.0);
        let s1 = *samples.get(idx + 1).unwrap_or(&s0);
        out.push(s0 + frac * (s1 - s0));
    }
    out
}

/// Right-pad with zeros or truncate to exactly `len` samples.
pub fn pad_or_trim(samples: &[f32], len: usize) -> Vec<f32> {
    let mut out = samples.to_vec();
    out.resize(len, 0.0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resample_identity_when_rates_match() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample_linear(&input, 16_000, 16_000), input);
    }

    #[test]
    fn resample_halves_length_when_downsampling_by_two() {
        let input: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let out = resample_linear(&input, 32_000, 16_000);
        assert_eq!(out.len(), 50);
        // Interpolated values stay within the input range.
        assert!(out.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn pad_or_trim_pads_and_truncates() {
        assert_eq!(pad_or_trim(&[1.0, 2.0], 4), vec![1.0, 2.0, 0.0, 0.0]);
        assert_eq!(pad_or_trim(&[1.0, 2.0, 3.0], 2), vec![1.0, 2.0]);
    }
}
