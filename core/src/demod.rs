//! Envelope demodulation by magnitude thresholding
//!
//! Produces one logic level per input sample. The result is not yet aligned
//! to bit boundaries; the frame decoder groups samples into bits.

use crate::config::ThresholdPolicy;
use crate::error::{ModemError, Result};

/// Largest absolute sample value
pub fn peak_magnitude(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, &s| peak.max(s.abs()))
}

/// Scale a buffer so its peak magnitude is exactly 1.0
///
/// Fails with [`ModemError::SilentBuffer`] when the buffer has no energy.
pub fn normalize(samples: &[f32]) -> Result<Vec<f32>> {
    let peak = peak_magnitude(samples);
    if peak == 0.0 {
        return Err(ModemError::SilentBuffer);
    }
    Ok(samples.iter().map(|&s| s / peak).collect())
}

/// Classify each sample: `true` when `|sample| >= threshold`
pub fn threshold(samples: &[f32], threshold: f32) -> Vec<bool> {
    samples.iter().map(|&s| s.abs() >= threshold).collect()
}

pub struct EnvelopeDemodulator {
    policy: ThresholdPolicy,
}

impl EnvelopeDemodulator {
    pub fn new(policy: ThresholdPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Convert a captured buffer into a sample-resolution binary sequence
    /// of the same length.
    pub fn demodulate(&self, samples: &[f32]) -> Result<Vec<bool>> {
        match self.policy {
            ThresholdPolicy::Fixed(level) => {
                if peak_magnitude(samples) == 0.0 {
                    return Err(ModemError::SilentBuffer);
                }
                Ok(threshold(samples, level))
            }
            ThresholdPolicy::PeakFraction(fraction) => {
                let normalized = normalize(samples)?;
                Ok(threshold(&normalized, fraction))
            }
        }
    }

    /// Threshold this policy would apply to `samples`, in raw sample units
    pub fn threshold_for(&self, samples: &[f32]) -> Result<f32> {
        let peak = peak_magnitude(samples);
        if peak == 0.0 {
            return Err(ModemError::SilentBuffer);
        }
        Ok(match self.policy {
            ThresholdPolicy::Fixed(level) => level,
            ThresholdPolicy::PeakFraction(fraction) => fraction * peak,
        })
    }
}
