use crate::config::{AmplitudeLevels, ModulationConfig};
use crate::error::Result;
use std::f64::consts::PI;

/// Build the amplitude envelope for `bits` spread over `total_samples`.
///
/// Every bit gets `total_samples / bits.len()` samples (integer division) and
/// the final bit also absorbs the remainder, so the segment boundaries are
/// `i * samples_per_bit` for all but the last bit and no sample is left unset.
pub fn envelope(bits: &[bool], total_samples: usize, levels: &AmplitudeLevels) -> Vec<f32> {
    if bits.is_empty() {
        return Vec::new();
    }

    let samples_per_bit = total_samples / bits.len();
    let mut env = Vec::with_capacity(total_samples);
    for (i, &bit) in bits.iter().enumerate() {
        let len = if i + 1 == bits.len() {
            total_samples - samples_per_bit * i
        } else {
            samples_per_bit
        };
        env.extend(std::iter::repeat(levels.level(bit)).take(len));
    }
    env
}

/// Multiply an envelope by `sin(2π f t)`, `t = index / sample_rate`
pub fn apply_carrier(env: &[f32], carrier_frequency: f64, sample_rate: u32) -> Vec<f32> {
    let omega = 2.0 * PI * carrier_frequency / sample_rate as f64;
    env.iter()
        .enumerate()
        .map(|(n, &a)| a * (omega * n as f64).sin() as f32)
        .collect()
}

/// ASK waveform synthesizer
///
/// Each call produces a self-contained buffer whose carrier phase starts at
/// zero, so frames and idle gaps can be synthesized independently and
/// concatenated.
pub struct Synthesizer {
    config: ModulationConfig,
}

impl Synthesizer {
    pub fn new(config: ModulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ModulationConfig {
        &self.config
    }

    /// Modulate `bits` at the configured bit duration.
    ///
    /// Output length is `round(bits.len() * bit_duration * sample_rate)`.
    pub fn synthesize(&self, bits: &[bool]) -> Vec<f32> {
        let duration = bits.len() as f64 * self.config.bit_duration;
        self.synthesize_span(bits, duration)
    }

    /// Modulate `bits` spread evenly over `duration` seconds.
    ///
    /// Output length is `round(duration * sample_rate)`; see [`envelope`] for
    /// how samples are split when that is not a multiple of the bit count.
    pub fn synthesize_span(&self, bits: &[bool], duration: f64) -> Vec<f32> {
        if bits.is_empty() {
            return Vec::new();
        }

        let total_samples = self.config.samples_for_duration(duration);
        let env = envelope(bits, total_samples, &self.config.amplitude);
        log::debug!(
            "Synthesized {} bits into {} samples ({:.3} s)",
            bits.len(),
            total_samples,
            duration
        );
        apply_carrier(&env, self.config.carrier_frequency, self.config.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> AmplitudeLevels {
        AmplitudeLevels { low: 0.0, high: 1.2 }
    }

    #[test]
    fn test_envelope_even_split() {
        let env = envelope(&[true, false, true], 6, &levels());
        assert_eq!(env, vec![1.2, 1.2, 0.0, 0.0, 1.2, 1.2]);
    }

    #[test]
    fn test_envelope_remainder_goes_to_last_segment() {
        // 10 samples over 3 bits: segments of 3, 3 and 3 + 1
        let env = envelope(&[false, false, true], 10, &levels());
        assert_eq!(env.len(), 10);
        assert!(env[..6].iter().all(|&a| a == 0.0));
        assert!(env[6..].iter().all(|&a| a == 1.2));

        let env = envelope(&[true, false], 7, &levels());
        assert_eq!(env, vec![1.2, 1.2, 1.2, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_envelope_fewer_samples_than_bits() {
        // samples_per_bit rounds down to 0; everything lands on the last bit
        let env = envelope(&[false, false, true], 2, &levels());
        assert_eq!(env, vec![1.2, 1.2]);
    }

    #[test]
    fn test_carrier_starts_at_zero_phase() {
        let out = apply_carrier(&[1.0; 4], 1000.0, 4000);
        assert!(out[0].abs() < 1e-6);
        assert!((out[1] - 1.0).abs() < 1e-6);
        assert!(out[2].abs() < 1e-6);
        assert!((out[3] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_synthesize_length() {
        let synth = Synthesizer::new(ModulationConfig::default()).unwrap();
        let bits = vec![true; 10];
        assert_eq!(synth.synthesize(&bits).len(), 10 * 4410);
    }

    #[test]
    fn test_synthesize_empty_bits() {
        let synth = Synthesizer::new(ModulationConfig::default()).unwrap();
        assert!(synth.synthesize(&[]).is_empty());
        assert!(synth.synthesize_span(&[], 0.5).is_empty());
    }

    #[test]
    fn test_synthesize_span_uneven() {
        let synth = Synthesizer::new(ModulationConfig::default()).unwrap();
        // 0.55 s = 24255 samples over 6 bits: 4042 each, last gets 4045
        let out = synth.synthesize_span(&[true; 6], 0.55);
        assert_eq!(out.len(), 24255);
    }

    #[test]
    fn test_logic_low_is_silent_with_zero_low_amplitude() {
        let synth = Synthesizer::new(ModulationConfig::default()).unwrap();
        let out = synth.synthesize(&[false, true]);
        assert!(out[..4410].iter().all(|&s| s == 0.0));
        let peak = out[4410..].iter().fold(0.0f32, |m, &s| m.max(s.abs()));
        assert!(peak > 1.1 && peak <= 1.2 + 1e-6);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = ModulationConfig::default();
        config.carrier_frequency = 30000.0;
        assert!(Synthesizer::new(config).is_err());
    }
}
