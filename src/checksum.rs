//! Additive checksum shared by the frame builder and the pull socket.
//!
//! The checksum is the sum of the payload bytes modulo 256, appended as a
//! single trailing byte.

/// Sum of `bytes` modulo 256.
pub fn additive_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Splits off a trailing checksum byte.
///
/// Returns the bytes before the checksum when the last byte matches the sum
/// of the others, `None` otherwise. An empty input has no checksum byte and
/// never matches.
pub fn strip_checksum(bytes: &[u8]) -> Option<&[u8]> {
    let (&last, body) = bytes.split_last()?;
    (additive_checksum(body) == last).then_some(body)
}
