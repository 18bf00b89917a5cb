/// Start bit value (logic-low, pulls the line down from idle)
pub const START_BIT: bool = false;

/// Stop bit value (logic-high, returns the line to idle)
pub const STOP_BIT: bool = true;

/// UART-style frame: start bit, fixed-length payload, stop bit.
///
/// Start and stop bits are constants, so only the payload is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub payload: Vec<bool>,
}

impl Frame {
    pub fn start(&self) -> bool {
        START_BIT
    }

    pub fn stop(&self) -> bool {
        STOP_BIT
    }

    /// Serialize as `[start] + payload + [stop]`
    pub fn to_bits(&self) -> Vec<bool> {
        let mut bits = Vec::with_capacity(self.payload.len() + 2);
        bits.push(START_BIT);
        bits.extend_from_slice(&self.payload);
        bits.push(STOP_BIT);
        bits
    }

    /// Number of bits on the wire
    pub fn len_bits(&self) -> usize {
        self.payload.len() + 2
    }
}

pub struct FrameEncoder;

impl FrameEncoder {
    /// Wrap a payload in a frame.
    ///
    /// Payload length is not checked here; the transmit pipeline enforces the
    /// link's fixed payload length.
    pub fn encode(payload: &[bool]) -> Frame {
        Frame {
            payload: payload.to_vec(),
        }
    }
}
