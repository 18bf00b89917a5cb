//! Acoustic ASK modem with UART-style framing
//!
//! Bits are framed with a low start bit and a high stop bit, amplitude-keyed
//! onto a fixed carrier (18 kHz by default) and recovered by thresholding the
//! magnitude of the captured waveform.
//!
//! Transmit: payload -> [`FrameEncoder`] -> [`Synthesizer`] -> samples.
//! Receive: samples -> [`EnvelopeDemodulator`] -> [`FrameDecoder`] -> payloads.
//! [`Transmitter`] and [`Receiver`] wire the stages together.

pub mod audio;
pub mod bits;
pub mod config;
pub mod deframe;
pub mod demod;
pub mod error;
pub mod framing;
pub mod receive;
pub mod resample;
pub mod synth;
pub mod transmit;

pub use audio::{AudioSink, AudioSource, Loopback};
pub use config::{AmplitudeLevels, LinkConfig, ModulationConfig, ThresholdPolicy};
pub use deframe::{DecodeReport, FrameDecoder};
pub use demod::EnvelopeDemodulator;
pub use error::{FrameSyncError, ModemError, Result, TruncatedFrameError};
pub use framing::{Frame, FrameEncoder};
pub use receive::Receiver;
pub use synth::Synthesizer;
pub use transmit::Transmitter;
