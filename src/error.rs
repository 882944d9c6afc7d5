//! Error types for encoding, framing, the PDU codec and the transport.
//!
//! Each concern has its own `thiserror` enum so the pure codecs can be used
//! without pulling in transport failures. [`Error`] rolls all of them up for
//! the socket wrappers and the sweep driver.

use thiserror::Error;

/// Failures raised while turning bits and codes into chips.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A bit value other than 0 or 1 was handed to the line encoder.
    #[error("bit {index} must be 1 or 0, got {value}")]
    InvalidBit {
        /// Position of the offending bit in the input.
        index: usize,
        /// The value that was found.
        value: u8,
    },
    /// A codeword chip other than 0 or 1.
    #[error("codeword chip {index} must be 1 or 0, got {value}")]
    InvalidChip {
        /// Position of the offending chip in the codeword.
        index: usize,
        /// The value that was found.
        value: u8,
    },
    /// A dip-switch code string that is not a hex number in `0..=0xff`.
    #[error("invalid dip-switch code {0:?}")]
    InvalidCode(String),
}

/// Failures raised by the frame builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The length header stores the payload size in a single byte.
    #[error("payload of {0} bytes does not fit the one-byte length header")]
    PayloadTooLong(usize),
}

/// Failures raised while decoding a serialized PDU.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PduError {
    /// The wire unit does not start with a pair tag.
    #[error("expected a pair, found tag {0:#04x}")]
    NotAPair(u8),
    /// The input ended in the middle of a value.
    #[error("truncated pdu: needed {needed} more bytes at offset {offset}")]
    Truncated {
        /// Offset at which the read started.
        offset: usize,
        /// Number of bytes that were missing.
        needed: usize,
    },
    /// A serialization tag this codec does not know.
    #[error("unsupported tag {0:#04x}")]
    UnsupportedTag(u8),
    /// The payload half of the pair is not a uniform vector of `u8`.
    #[error("payload must be a u8 vector, found tag {tag:#04x} subtype {subtype:#04x}")]
    NotAByteVector {
        /// Tag of the value found in the payload slot.
        tag: u8,
        /// Uniform vector subtype, 0 when the value is not a uniform vector.
        subtype: u8,
    },
    /// Bytes left over after the pair.
    #[error("{0} trailing bytes after pdu")]
    TrailingBytes(usize),
    /// Metadata nested deeper than the decoder allows.
    #[error("metadata nested deeper than {0} levels")]
    TooDeep(usize),
    /// The payload length does not fit the 32-bit item count.
    #[error("payload of {0} bytes exceeds the u32 item count")]
    PayloadTooLong(usize),
}

/// Top level error for the socket wrappers and the sweep driver.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`EncodingError`].
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    /// See [`FrameError`].
    #[error(transparent)]
    Frame(#[from] FrameError),
    /// See [`PduError`].
    #[error(transparent)]
    Pdu(#[from] PduError),
    /// The message queue refused a bind, connect, send or receive.
    #[error("transport: {0}")]
    Transport(#[from] zmq::Error),
    /// The socket was used after [`close`](crate::socket::MessageChannel::close).
    #[error("socket is closed")]
    Closed,
    /// A received payload was not valid UTF-8.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}
