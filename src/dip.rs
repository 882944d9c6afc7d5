//! Dip-switch code decomposition.
//!
//! A garage-door style remote carries a bank of eight dip switches. The bank
//! is addressed as a single byte, most significant switch first, so code
//! `0x00` is `[0, 0, 0, 0, 0, 0, 0, 0]` and `0xff` is all ones.

use crate::consts::DIP_SWITCHES;
use crate::error::EncodingError;

/// Splits a dip-switch code into its eight switch positions, MSB first.
pub fn decompose(code: u8) -> [u8; DIP_SWITCHES] {
    let mut bits = [0u8; DIP_SWITCHES];
    for (i, bit) in bits.iter_mut().enumerate() {
        *bit = (code >> (DIP_SWITCHES - 1 - i)) & 1;
    }
    bits
}

/// Rebuilds a dip-switch code from its eight switch positions.
///
/// Returns [`EncodingError::InvalidBit`] if a position is not 0 or 1.
pub fn compose(bits: &[u8; DIP_SWITCHES]) -> Result<u8, EncodingError> {
    bits.iter().enumerate().try_fold(0u8, |acc, (index, &value)| {
        if value > 1 {
            return Err(EncodingError::InvalidBit { index, value });
        }
        Ok((acc << 1) | value)
    })
}

/// Parses a code as printed by the sweep driver: hexadecimal, with or
/// without a `0x` prefix.
pub fn parse_code(s: &str) -> Result<u8, EncodingError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u8::from_str_radix(digits, 16).map_err(|_| EncodingError::InvalidCode(s.to_string()))
}
