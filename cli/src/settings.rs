use askwave_core::config::{
    DEFAULT_AMPLITUDE_HIGH, DEFAULT_AMPLITUDE_LOW, DEFAULT_BIT_DURATION,
    DEFAULT_CARRIER_FREQUENCY, DEFAULT_FRAME_REPEAT_COUNT, DEFAULT_IDLE_GAP_DURATION,
    DEFAULT_PAYLOAD_LENGTH, DEFAULT_SAMPLE_RATE, DEFAULT_THRESHOLD_FRACTION,
};
use askwave_core::{AmplitudeLevels, LinkConfig, ModulationConfig, ThresholdPolicy};
use serde::Deserialize;
use std::path::Path;

use crate::CliError;

/// Link parameters from a JSON config file or the command line.
///
/// Every field is optional; unset fields fall through to the next layer and
/// finally to the library defaults. A fixed `threshold` takes precedence over
/// `threshold_fraction` within the same layer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub sample_rate: Option<u32>,
    pub carrier_frequency: Option<f64>,
    pub bit_duration: Option<f64>,
    pub amplitude_low: Option<f32>,
    pub amplitude_high: Option<f32>,
    pub threshold: Option<f32>,
    pub threshold_fraction: Option<f32>,
    pub idle_gap_duration: Option<f64>,
    pub payload_length: Option<usize>,
    pub frame_repeat_count: Option<usize>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        tracing::debug!("Loaded settings from {}: {:?}", path.display(), settings);
        Ok(settings)
    }

    /// Layer `over` on top of `self`; fields set in `over` win
    pub fn overlay(self, over: Settings) -> Settings {
        let (threshold, threshold_fraction) =
            if over.threshold.is_some() || over.threshold_fraction.is_some() {
                (over.threshold, over.threshold_fraction)
            } else {
                (self.threshold, self.threshold_fraction)
            };

        Settings {
            sample_rate: over.sample_rate.or(self.sample_rate),
            carrier_frequency: over.carrier_frequency.or(self.carrier_frequency),
            bit_duration: over.bit_duration.or(self.bit_duration),
            amplitude_low: over.amplitude_low.or(self.amplitude_low),
            amplitude_high: over.amplitude_high.or(self.amplitude_high),
            threshold,
            threshold_fraction,
            idle_gap_duration: over.idle_gap_duration.or(self.idle_gap_duration),
            payload_length: over.payload_length.or(self.payload_length),
            frame_repeat_count: over.frame_repeat_count.or(self.frame_repeat_count),
        }
    }

    /// Resolve to a validated link configuration
    pub fn to_link_config(&self) -> Result<LinkConfig, CliError> {
        let threshold = match (self.threshold, self.threshold_fraction) {
            (Some(level), _) => ThresholdPolicy::Fixed(level),
            (None, fraction) => {
                ThresholdPolicy::PeakFraction(fraction.unwrap_or(DEFAULT_THRESHOLD_FRACTION))
            }
        };

        let config = LinkConfig {
            modulation: ModulationConfig {
                sample_rate: self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE),
                carrier_frequency: self.carrier_frequency.unwrap_or(DEFAULT_CARRIER_FREQUENCY),
                bit_duration: self.bit_duration.unwrap_or(DEFAULT_BIT_DURATION),
                amplitude: AmplitudeLevels {
                    low: self.amplitude_low.unwrap_or(DEFAULT_AMPLITUDE_LOW),
                    high: self.amplitude_high.unwrap_or(DEFAULT_AMPLITUDE_HIGH),
                },
            },
            threshold,
            idle_gap_duration: self.idle_gap_duration.unwrap_or(DEFAULT_IDLE_GAP_DURATION),
            payload_length: self.payload_length.unwrap_or(DEFAULT_PAYLOAD_LENGTH),
            frame_repeat_count: self.frame_repeat_count.unwrap_or(DEFAULT_FRAME_REPEAT_COUNT),
        };
        config.validate()?;
        Ok(config)
    }
}
