//! Byte framing for payloads handed to a packet transmitter.
//!
//! A frame wraps an arbitrary payload the way a GNU Radio packet
//! transmitter expects it:
//!
//! ```text
//! [10 x 0x00][preamble][0x00, len, 0x00, len]?[payload][checksum]?[10 x 0x00]
//! ```
//!
//! The length header carries the payload length twice so the receiver can
//! cross-check a corrupted read. Both the header and the checksum are
//! optional and agreed out of band between sender and receiver.

use crate::checksum::additive_checksum;
use crate::consts::{FRAME_HEADER_LEN, FRAME_SILENCE_LEN};
use crate::error::FrameError;

/// Optional parts of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOptions {
    /// Insert the duplicated one-byte length header after the preamble.
    pub length_header: bool,
    /// Append the additive checksum of the payload.
    pub checksum: bool,
}

impl FrameOptions {
    /// Both optional parts enabled.
    pub const FULL: Self = Self {
        length_header: true,
        checksum: true,
    };
}

/// Length of the frame built from a preamble and payload of the given sizes.
pub fn framed_len(preamble_len: usize, payload_len: usize, options: FrameOptions) -> usize {
    let header = if options.length_header {
        FRAME_HEADER_LEN
    } else {
        0
    };
    2 * FRAME_SILENCE_LEN + preamble_len + header + payload_len + usize::from(options.checksum)
}

/// Builds a frame around `payload`.
///
/// # Errors
/// [`FrameError::PayloadTooLong`] when the length header is requested and
/// the payload is longer than 255 bytes.
pub fn build_frame(
    preamble: &[u8],
    payload: &[u8],
    options: FrameOptions,
) -> Result<Vec<u8>, FrameError> {
    let mut framed = Vec::with_capacity(framed_len(preamble.len(), payload.len(), options));
    framed.resize(FRAME_SILENCE_LEN, 0x00);
    framed.extend_from_slice(preamble);

    if options.length_header {
        let len =
            u8::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLong(payload.len()))?;
        framed.extend_from_slice(&[0x00, len, 0x00, len]);
    }

    framed.extend_from_slice(payload);

    if options.checksum {
        framed.push(additive_checksum(payload));
    }

    framed.resize(framed.len() + FRAME_SILENCE_LEN, 0x00);
    Ok(framed)
}
