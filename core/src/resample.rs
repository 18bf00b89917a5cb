//! Capture conditioning: channel downmix and sample-rate conversion
//!
//! Recordings may arrive multi-channel or at a rate other than the link's.
//! The demodulator needs mono samples at the configured rate, because bit
//! windows are counted in samples.

use crate::error::{ModemError, Result};

/// Average interleaved multi-channel audio down to mono
///
/// A trailing incomplete frame of samples is ignored.
pub fn downmix(samples: &[f32], channels: usize) -> Result<Vec<f32>> {
    match channels {
        0 => Err(ModemError::Audio("channel count must be positive".into())),
        1 => Ok(samples.to_vec()),
        n => Ok(samples
            .chunks_exact(n)
            .map(|frame| frame.iter().sum::<f32>() / n as f32)
            .collect()),
    }
}

/// Convert `samples` from `from_rate` to `to_rate` by linear interpolation
///
/// Output length is `round(len * to_rate / from_rate)`, so the duration of
/// the capture is preserved.
pub fn resample_audio(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let step = from_rate as f64 / to_rate as f64;
    let out_len = (samples.len() as f64 / step).round() as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = (pos.floor() as usize).min(last);
            let frac = (pos - idx as f64) as f32;
            if idx < last {
                samples[idx] + (samples[idx + 1] - samples[idx]) * frac
            } else {
                samples[last]
            }
        })
        .collect()
}
