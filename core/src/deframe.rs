use crate::error::{FrameSyncError, ModemError, Result, TruncatedFrameError};
use crate::framing::{Frame, START_BIT, STOP_BIT};

/// Collapse a sample-resolution binary sequence to one bit per window.
///
/// Windows are `samples_per_bit` long and start at sample 0. A window reads
/// as 1 when strictly more than half of its samples are 1, since the carrier
/// crosses zero inside every high bit. A trailing partial window is dropped.
pub fn sample_bits(binary: &[bool], samples_per_bit: usize) -> Vec<bool> {
    if samples_per_bit == 0 {
        return Vec::new();
    }

    binary
        .chunks_exact(samples_per_bit)
        .map(|window| {
            let ones = window.iter().filter(|&&b| b).count();
            ones * 2 > samples_per_bit
        })
        .collect()
}

/// Result of scanning a bit stream for frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodeReport {
    /// Valid frames in reception order
    pub frames: Vec<Frame>,
    /// Candidate start bits whose stop bit was low
    pub sync_errors: Vec<FrameSyncError>,
    /// Set when input ended part-way through a frame
    pub truncated: Option<TruncatedFrameError>,
    /// Number of bit windows scanned
    pub bit_count: usize,
}

impl DecodeReport {
    pub fn payloads(&self) -> impl Iterator<Item = &[bool]> {
        self.frames.iter().map(|f| f.payload.as_slice())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Idle,
    ReadingPayload { start: usize },
    ReadingStop { start: usize },
}

/// UART-style frame decoder
pub struct FrameDecoder {
    samples_per_bit: usize,
    payload_length: usize,
}

impl FrameDecoder {
    pub fn new(samples_per_bit: usize, payload_length: usize) -> Result<Self> {
        if samples_per_bit == 0 {
            return Err(ModemError::InvalidConfig("samples per bit must be positive".into()));
        }
        if payload_length == 0 {
            return Err(ModemError::InvalidConfig("payload length must be positive".into()));
        }
        Ok(Self {
            samples_per_bit,
            payload_length,
        })
    }

    /// Decode frames from a sample-resolution binary sequence
    pub fn decode(&self, binary: &[bool]) -> Result<DecodeReport> {
        let bits = sample_bits(binary, self.samples_per_bit);
        self.decode_bits(&bits)
    }

    /// Decode frames from a bit-resolution sequence.
    ///
    /// A failed stop bit resumes the scan one bit after the rejected start
    /// bit; a valid frame resumes right after its stop bit. Fails with
    /// [`ModemError::NoFramesDecoded`] only when nothing at all was recovered.
    pub fn decode_bits(&self, bits: &[bool]) -> Result<DecodeReport> {
        let mut report = DecodeReport {
            bit_count: bits.len(),
            ..Default::default()
        };
        let mut state = ScanState::Idle;
        let mut pos = 0;

        while pos < bits.len() {
            state = match state {
                ScanState::Idle => {
                    if bits[pos] == START_BIT {
                        ScanState::ReadingPayload { start: pos }
                    } else {
                        pos += 1;
                        ScanState::Idle
                    }
                }
                ScanState::ReadingPayload { start } => {
                    let payload_end = start + 1 + self.payload_length;
                    if payload_end > bits.len() {
                        pos = bits.len();
                        ScanState::ReadingPayload { start }
                    } else {
                        pos = payload_end;
                        ScanState::ReadingStop { start }
                    }
                }
                ScanState::ReadingStop { start } => {
                    if bits[pos] == STOP_BIT {
                        let payload = bits[start + 1..pos].to_vec();
                        log::debug!("Frame at bit {}: {}", start, crate::bits::format_bits(&payload));
                        report.frames.push(Frame { payload });
                        pos += 1;
                    } else {
                        log::debug!("Stop bit low at bit {}, resyncing", pos);
                        report.sync_errors.push(FrameSyncError { bit_index: start });
                        pos = start + 1;
                    }
                    ScanState::Idle
                }
            };
        }

        match state {
            ScanState::ReadingPayload { start } | ScanState::ReadingStop { start } => {
                let truncated = TruncatedFrameError {
                    bit_index: start,
                    bits_available: bits.len() - start,
                };
                log::debug!("{}", truncated);
                report.truncated = Some(truncated);
            }
            ScanState::Idle => {}
        }

        if !report.sync_errors.is_empty() {
            log::warn!(
                "{} framing errors while decoding {} bits",
                report.sync_errors.len(),
                bits.len()
            );
        }

        if report.frames.is_empty() {
            return Err(ModemError::NoFramesDecoded {
                sync_errors: report.sync_errors.len(),
                truncated: report.truncated.is_some(),
            });
        }

        Ok(report)
    }
}
