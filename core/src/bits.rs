//! Bit sequence helpers
//!
//! Bits are `bool` (`true` = logic 1) in transmission order. Bytes are
//! expanded most-significant bit first.

use crate::error::{ModemError, Result};

/// Parse a string of '0'/'1' characters, ignoring whitespace and underscores
pub fn parse_bits(text: &str) -> Result<Vec<bool>> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .map(|c| match c {
            '0' => Ok(false),
            '1' => Ok(true),
            other => Err(ModemError::InvalidBitString(format!(
                "unexpected character {:?} in {:?}",
                other, text
            ))),
        })
        .collect()
}

pub fn format_bits(bits: &[bool]) -> String {
    bits.iter().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Expand bytes to bits, MSB first
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for i in (0..8).rev() {
            bits.push((byte >> i) & 1 == 1);
        }
    }
    bits
}

/// Pack bits into bytes, MSB first. A trailing partial byte is zero-padded.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| if bit { byte | 1 << (7 - i) } else { byte })
        })
        .collect()
}
