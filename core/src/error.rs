use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModemError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Captured buffer is silent (peak magnitude is zero)")]
    SilentBuffer,

    #[error("No frames decoded ({sync_errors} framing errors, truncated: {truncated})")]
    NoFramesDecoded { sync_errors: usize, truncated: bool },

    #[error("Payload has {actual} bits, expected {expected}")]
    PayloadLength { expected: usize, actual: usize },

    #[error("Invalid bit string: {0}")]
    InvalidBitString(String),

    #[error("Audio device error: {0}")]
    Audio(String),
}

pub type Result<T> = std::result::Result<T, ModemError>;

/// A candidate start bit whose stop bit read as logic-low.
///
/// Non-fatal: the decoder resynchronizes one bit later and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Stop bit missing for frame starting at bit {bit_index}")]
pub struct FrameSyncError {
    pub bit_index: usize,
}

/// Input ended while a frame was still being read. The partial frame is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Frame starting at bit {bit_index} truncated ({bits_available} of its bits present)")]
pub struct TruncatedFrameError {
    pub bit_index: usize,
    pub bits_available: usize,
}
