use crate::audio::AudioSource;
use crate::config::LinkConfig;
use crate::deframe::{DecodeReport, FrameDecoder};
use crate::demod::EnvelopeDemodulator;
use crate::error::Result;

/// Receive pipeline: envelope demodulation followed by frame decoding
pub struct Receiver {
    config: LinkConfig,
    demod: EnvelopeDemodulator,
    decoder: FrameDecoder,
}

impl Receiver {
    pub fn new(config: LinkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            demod: EnvelopeDemodulator::new(config.threshold)?,
            decoder: FrameDecoder::new(config.modulation.samples_per_bit(), config.payload_length)?,
            config,
        })
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Recover frames from a captured buffer at the configured sample rate
    pub fn receive(&self, samples: &[f32]) -> Result<DecodeReport> {
        let binary = self.demod.demodulate(samples)?;
        let report = self.decoder.decode(&binary)?;
        log::info!(
            "Decoded {} frames from {} samples ({} framing errors)",
            report.frames.len(),
            samples.len(),
            report.sync_errors.len()
        );
        Ok(report)
    }

    /// Record `duration_secs` from `source` and decode it
    pub fn capture<S: AudioSource>(&self, source: &mut S, duration_secs: f64) -> Result<DecodeReport> {
        let samples = source.record(duration_secs, self.config.modulation.sample_rate)?;
        self.receive(&samples)
    }
}
