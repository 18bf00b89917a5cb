use crate::error::{ModemError, Result};

// Defaults match the 18 kHz near-ultrasonic link: 10 bits/sec, silent logic-low.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_CARRIER_FREQUENCY: f64 = 18000.0;
pub const DEFAULT_BIT_DURATION: f64 = 0.1;
pub const DEFAULT_AMPLITUDE_LOW: f32 = 0.0;
pub const DEFAULT_AMPLITUDE_HIGH: f32 = 1.2;
pub const DEFAULT_THRESHOLD_FRACTION: f32 = 0.3;
pub const DEFAULT_IDLE_GAP_DURATION: f64 = 0.5;
pub const DEFAULT_PAYLOAD_LENGTH: usize = 8;
pub const DEFAULT_FRAME_REPEAT_COUNT: usize = 1;

/// Tolerance when checking that `bit_duration * sample_rate` is a whole number
/// of samples (0.1 * 44100 is not exact in binary floating point).
const SAMPLES_PER_BIT_EPSILON: f64 = 1e-6;

/// Envelope amplitude for each logic level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeLevels {
    pub low: f32,
    pub high: f32,
}

impl AmplitudeLevels {
    pub fn new(low: f32, high: f32) -> Result<Self> {
        let levels = Self { low, high };
        levels.validate()?;
        Ok(levels)
    }

    pub fn level(&self, bit: bool) -> f32 {
        if bit {
            self.high
        } else {
            self.low
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            return Err(ModemError::InvalidConfig(
                "amplitude levels must be finite".into(),
            ));
        }
        if self.low < 0.0 {
            return Err(ModemError::InvalidConfig(format!(
                "low amplitude {} is negative",
                self.low
            )));
        }
        if self.high <= self.low {
            return Err(ModemError::InvalidConfig(format!(
                "high amplitude {} must exceed low amplitude {}",
                self.high, self.low
            )));
        }
        Ok(())
    }
}

impl Default for AmplitudeLevels {
    fn default() -> Self {
        Self {
            low: DEFAULT_AMPLITUDE_LOW,
            high: DEFAULT_AMPLITUDE_HIGH,
        }
    }
}

/// Physical-layer parameters shared by transmitter and receiver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationConfig {
    /// Samples per second
    pub sample_rate: u32,
    /// Carrier frequency in Hz
    pub carrier_frequency: f64,
    /// Duration of one bit in seconds
    pub bit_duration: f64,
    pub amplitude: AmplitudeLevels,
}

impl ModulationConfig {
    /// Build a config, failing fast if any invariant is violated
    pub fn new(
        sample_rate: u32,
        carrier_frequency: f64,
        bit_duration: f64,
        amplitude: AmplitudeLevels,
    ) -> Result<Self> {
        let config = Self {
            sample_rate,
            carrier_frequency,
            bit_duration,
            amplitude,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(ModemError::InvalidConfig("sample rate must be positive".into()));
        }

        let nyquist = self.sample_rate as f64 / 2.0;
        if !(self.carrier_frequency > 0.0 && self.carrier_frequency < nyquist) {
            return Err(ModemError::InvalidConfig(format!(
                "carrier frequency {} Hz must be in (0, {}) Hz",
                self.carrier_frequency, nyquist
            )));
        }

        if !(self.bit_duration.is_finite() && self.bit_duration > 0.0) {
            return Err(ModemError::InvalidConfig(format!(
                "bit duration {} s must be positive",
                self.bit_duration
            )));
        }

        let exact = self.bit_duration * self.sample_rate as f64;
        let rounded = exact.round();
        if rounded < 1.0 || (exact - rounded).abs() > SAMPLES_PER_BIT_EPSILON {
            return Err(ModemError::InvalidConfig(format!(
                "bit duration {} s at {} Hz is {} samples, not a positive whole number",
                self.bit_duration, self.sample_rate, exact
            )));
        }

        self.amplitude.validate()
    }

    /// Samples per bit (`bit_duration * sample_rate`, integral once validated)
    pub fn samples_per_bit(&self) -> usize {
        (self.bit_duration * self.sample_rate as f64).round() as usize
    }

    /// Number of samples covering `duration` seconds
    pub fn samples_for_duration(&self, duration: f64) -> usize {
        (duration * self.sample_rate as f64).round().max(0.0) as usize
    }
}

impl Default for ModulationConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            carrier_frequency: DEFAULT_CARRIER_FREQUENCY,
            bit_duration: DEFAULT_BIT_DURATION,
            amplitude: AmplitudeLevels::default(),
        }
    }
}

/// How the demodulator picks its logic-high threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdPolicy {
    /// Absolute magnitude applied to the raw captured samples
    Fixed(f32),
    /// Fraction of peak magnitude, applied after normalizing the capture to [-1, 1]
    PeakFraction(f32),
}

impl ThresholdPolicy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ThresholdPolicy::Fixed(t) if !(t.is_finite() && t > 0.0) => Err(
                ModemError::InvalidConfig(format!("fixed threshold {} must be positive", t)),
            ),
            ThresholdPolicy::PeakFraction(f) if !(f > 0.0 && f <= 1.0) => Err(
                ModemError::InvalidConfig(format!("threshold fraction {} must be in (0, 1]", f)),
            ),
            _ => Ok(()),
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        ThresholdPolicy::PeakFraction(DEFAULT_THRESHOLD_FRACTION)
    }
}

/// Everything both ends of the link must agree on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkConfig {
    pub modulation: ModulationConfig,
    pub threshold: ThresholdPolicy,
    /// Logic-high idle time appended after every frame, in seconds
    pub idle_gap_duration: f64,
    /// Payload bits per frame (protocol-fixed, not self-describing)
    pub payload_length: usize,
    /// How many times `transmit_repeated` sends each payload
    pub frame_repeat_count: usize,
}

impl LinkConfig {
    pub fn validate(&self) -> Result<()> {
        self.modulation.validate()?;
        self.threshold.validate()?;

        if !(self.idle_gap_duration.is_finite() && self.idle_gap_duration >= 0.0) {
            return Err(ModemError::InvalidConfig(format!(
                "idle gap duration {} s must be non-negative",
                self.idle_gap_duration
            )));
        }
        if self.payload_length == 0 {
            return Err(ModemError::InvalidConfig("payload length must be positive".into()));
        }
        if self.frame_repeat_count == 0 {
            return Err(ModemError::InvalidConfig(
                "frame repeat count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Bits in one serialized frame (start + payload + stop)
    pub fn frame_bits(&self) -> usize {
        self.payload_length + 2
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            modulation: ModulationConfig::default(),
            threshold: ThresholdPolicy::default(),
            idle_gap_duration: DEFAULT_IDLE_GAP_DURATION,
            payload_length: DEFAULT_PAYLOAD_LENGTH,
            frame_repeat_count: DEFAULT_FRAME_REPEAT_COUNT,
        }
    }
}
