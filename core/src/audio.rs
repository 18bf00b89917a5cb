//! Audio device boundary
//!
//! The modem never touches hardware directly. Playback and capture are
//! injected through these traits; both calls block until the device is done.

use crate::error::{ModemError, Result};

pub trait AudioSink {
    /// Play `samples` at `sample_rate`, returning once playback completes
    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<()>;
}

pub trait AudioSource {
    /// Record for `duration_secs`, returning exactly
    /// `round(duration_secs * sample_rate)` samples
    fn record(&mut self, duration_secs: f64, sample_rate: u32) -> Result<Vec<f32>>;
}

/// Number of samples a recording of `duration_secs` must contain
pub fn capture_len(duration_secs: f64, sample_rate: u32) -> usize {
    (duration_secs * sample_rate as f64).round().max(0.0) as usize
}

/// In-memory sink/source pair: whatever is played can be recorded back.
///
/// Recordings are cut to the requested length, or padded with silence past
/// the end of the played audio. An optional lead-in of silence simulates a
/// recording that starts before playback does.
#[derive(Debug, Default)]
pub struct Loopback {
    buffer: Vec<f32>,
    sample_rate: Option<u32>,
    lead_in: usize,
}

impl Loopback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `samples` of silence to every recording
    pub fn with_lead_in(mut self, samples: usize) -> Self {
        self.lead_in = samples;
        self
    }

    pub fn played(&self) -> &[f32] {
        &self.buffer
    }
}

impl AudioSink for Loopback {
    fn play(&mut self, samples: &[f32], sample_rate: u32) -> Result<()> {
        self.buffer = samples.to_vec();
        self.sample_rate = Some(sample_rate);
        Ok(())
    }
}

impl AudioSource for Loopback {
    fn record(&mut self, duration_secs: f64, sample_rate: u32) -> Result<Vec<f32>> {
        if let Some(played_rate) = self.sample_rate {
            if played_rate != sample_rate {
                return Err(ModemError::Audio(format!(
                    "loopback played at {} Hz but recorded at {} Hz",
                    played_rate, sample_rate
                )));
            }
        }

        let len = capture_len(duration_secs, sample_rate);
        let mut recording = vec![0.0; self.lead_in.min(len)];
        let remaining = len - recording.len();
        recording.extend(self.buffer.iter().take(remaining));
        recording.resize(len, 0.0);
        Ok(recording)
    }
}
