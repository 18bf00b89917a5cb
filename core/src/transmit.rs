use crate::bits::bytes_to_bits;
use crate::config::LinkConfig;
use crate::error::{ModemError, Result};
use crate::framing::FrameEncoder;
use crate::synth::Synthesizer;

/// Split bytes into payloads of `payload_length` bits (MSB first).
///
/// The last payload is padded with zero bits when the data does not divide
/// evenly.
pub fn payloads_from_bytes(data: &[u8], payload_length: usize) -> Vec<Vec<bool>> {
    if payload_length == 0 {
        return Vec::new();
    }

    bytes_to_bits(data)
        .chunks(payload_length)
        .map(|chunk| {
            let mut payload = chunk.to_vec();
            payload.resize(payload_length, false);
            payload
        })
        .collect()
}

/// Transmit pipeline: frames every payload and joins them with idle gaps
///
/// Produces: frame(p0) + gap + frame(p1) + gap + ...
pub struct Transmitter {
    config: LinkConfig,
    synth: Synthesizer,
}

impl Transmitter {
    pub fn new(config: LinkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            synth: Synthesizer::new(config.modulation)?,
            config,
        })
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Synthesize the logic-high idle segment that follows each frame.
    ///
    /// The gap is rounded to a whole number of bit periods (at least one) so
    /// the next frame starts on a bit boundary.
    pub fn idle_gap(&self) -> Vec<f32> {
        let gap = self.config.idle_gap_duration;
        if gap <= 0.0 {
            return Vec::new();
        }

        let gap_bits = ((gap / self.config.modulation.bit_duration).round() as usize).max(1);
        self.synth.synthesize(&vec![true; gap_bits])
    }

    /// Encode and synthesize one frame, without the trailing gap
    pub fn frame_samples(&self, payload: &[bool]) -> Result<Vec<f32>> {
        self.check_payload(payload)?;
        let frame = FrameEncoder::encode(payload);
        Ok(self.synth.synthesize(&frame.to_bits()))
    }

    /// Transmit payloads in order, each followed by an idle gap
    pub fn transmit<P: AsRef<[bool]>>(&self, payloads: &[P]) -> Result<Vec<f32>> {
        for payload in payloads {
            self.check_payload(payload.as_ref())?;
        }

        let gap = self.idle_gap();
        let frame_len = self.config.modulation.samples_per_bit() * self.config.frame_bits();
        let mut samples = Vec::with_capacity(payloads.len() * (frame_len + gap.len()));

        for payload in payloads {
            let frame = FrameEncoder::encode(payload.as_ref());
            samples.extend_from_slice(&self.synth.synthesize(&frame.to_bits()));
            samples.extend_from_slice(&gap);
        }

        log::debug!(
            "Transmit buffer: {} frames, {} samples ({:.2} s)",
            payloads.len(),
            samples.len(),
            samples.len() as f64 / self.config.modulation.sample_rate as f64
        );
        Ok(samples)
    }

    /// Send the same payload `frame_repeat_count` times
    pub fn transmit_repeated(&self, payload: &[bool]) -> Result<Vec<f32>> {
        let copies = vec![payload; self.config.frame_repeat_count];
        self.transmit(&copies)
    }

    /// Frame raw bytes as consecutive payloads and transmit the whole
    /// message `frame_repeat_count` times
    pub fn transmit_bytes(&self, data: &[u8]) -> Result<Vec<f32>> {
        let payloads = payloads_from_bytes(data, self.config.payload_length);
        let mut message = Vec::with_capacity(payloads.len() * self.config.frame_repeat_count);
        for _ in 0..self.config.frame_repeat_count {
            message.extend(payloads.iter().map(Vec::as_slice));
        }
        self.transmit(&message)
    }

    fn check_payload(&self, payload: &[bool]) -> Result<()> {
        if payload.len() != self.config.payload_length {
            return Err(ModemError::PayloadLength {
                expected: self.config.payload_length,
                actual: payload.len(),
            });
        }
        Ok(())
    }
}
