//! PDU codec for GNU Radio message ports.
//!
//! GNU Radio's `pull_msg_source` and `push_msg_sink` blocks exchange PDUs:
//! a PMT pair whose first half is a metadata dictionary (or nil) and whose
//! second half is a `u8vector` holding the data. On the ZeroMQ socket the
//! pair travels in PMT's binary serialization:
//!
//! ```text
//! 0x07                     pair
//! <metadata>               any PMT, 0x06 (nil) when unused
//! 0x0a 0x00                uniform vector, u8 subtype
//! <u32 big-endian>         item count
//! 0x01 0x00                one pad byte
//! <items>
//! ```
//!
//! The metadata is carried through as opaque bytes. The decoder only walks
//! its structure to find where the payload vector starts.

use crate::error::PduError;

const PST_TRUE: u8 = 0x00;
const PST_FALSE: u8 = 0x01;
const PST_SYMBOL: u8 = 0x02;
const PST_INT32: u8 = 0x03;
const PST_DOUBLE: u8 = 0x04;
const PST_COMPLEX: u8 = 0x05;
const PST_NULL: u8 = 0x06;
const PST_PAIR: u8 = 0x07;
const PST_VECTOR: u8 = 0x08;
const PST_DICT: u8 = 0x09;
const PST_UNIFORM_VECTOR: u8 = 0x0a;
const PST_UINT64: u8 = 0x0b;
const PST_TUPLE: u8 = 0x0c;
const PST_INT64: u8 = 0x0d;

const UVI_U8: u8 = 0x00;

/// Pad bytes written between a uniform vector header and its items.
const UV_PAD: u8 = 1;

/// Maximum nesting of metadata values the decoder will walk.
pub const MAX_DEPTH: usize = 64;

/// Serialized PMT nil, the metadata of a bare PDU.
pub const NIL: [u8; 1] = [PST_NULL];

/// A PDU: opaque metadata plus a byte payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pdu {
    /// Serialized PMT metadata, kept verbatim.
    pub metadata: Vec<u8>,
    /// Data carried by the `u8vector` half of the pair.
    pub payload: Vec<u8>,
}

impl Pdu {
    /// A PDU with nil metadata.
    pub fn new(payload: Vec<u8>) -> Self {
        Self {
            metadata: NIL.to_vec(),
            payload,
        }
    }

    /// Serializes the PDU into its wire form.
    ///
    /// # Errors
    /// [`PduError::PayloadTooLong`] if the payload length does not fit in
    /// the 32-bit item count.
    pub fn to_bytes(&self) -> Result<Vec<u8>, PduError> {
        let count = u32::try_from(self.payload.len())
            .map_err(|_| PduError::PayloadTooLong(self.payload.len()))?;

        let mut wire = Vec::with_capacity(1 + self.metadata.len() + 8 + self.payload.len());
        wire.push(PST_PAIR);
        wire.extend_from_slice(&self.metadata);
        wire.push(PST_UNIFORM_VECTOR);
        wire.push(UVI_U8);
        wire.extend_from_slice(&count.to_be_bytes());
        wire.push(UV_PAD);
        wire.resize(wire.len() + usize::from(UV_PAD), 0x00);
        wire.extend_from_slice(&self.payload);
        Ok(wire)
    }

    /// Parses a PDU from its wire form.
    ///
    /// # Errors
    /// Any [`PduError`] describing why the bytes are not a `(metadata . u8vector)`
    /// pair. Trailing bytes after the pair are rejected.
    pub fn from_bytes(wire: &[u8]) -> Result<Self, PduError> {
        let mut r = Reader::new(wire);
        let tag = r.u8()?;
        if tag != PST_PAIR {
            return Err(PduError::NotAPair(tag));
        }

        let meta_start = r.pos;
        r.skip_value(0)?;
        let metadata = wire[meta_start..r.pos].to_vec();

        let tag = r.u8()?;
        if tag != PST_UNIFORM_VECTOR {
            return Err(PduError::NotAByteVector { tag, subtype: 0 });
        }
        let subtype = r.u8()?;
        if subtype != UVI_U8 {
            return Err(PduError::NotAByteVector { tag, subtype });
        }
        let count = r.u32()? as usize;
        let npad = r.u8()?;
        let _ = r.take(usize::from(npad))?;
        let payload = r.take(count)?.to_vec();

        if r.remaining() > 0 {
            return Err(PduError::TrailingBytes(r.remaining()));
        }
        Ok(Self { metadata, payload })
    }
}

/// Wraps `payload` in a nil-metadata PDU and serializes it.
pub fn serialize(payload: &[u8]) -> Result<Vec<u8>, PduError> {
    Pdu::new(payload.to_vec()).to_bytes()
}

/// Deserializes a PDU and returns its payload, discarding the metadata.
pub fn deserialize(wire: &[u8]) -> Result<Vec<u8>, PduError> {
    Pdu::from_bytes(wire).map(|pdu| pdu.payload)
}

/// Size in bytes of one element of a uniform vector subtype.
fn uniform_item_size(subtype: u8) -> Result<usize, PduError> {
    match subtype & 0x7f {
        // u8, s8
        0x00 | 0x01 => Ok(1),
        // u16, s16
        0x02 | 0x03 => Ok(2),
        // u32, s32, f32
        0x04 | 0x05 | 0x08 => Ok(4),
        // u64, s64, f64, c32
        0x06 | 0x07 | 0x09 | 0x0a => Ok(8),
        // c64
        0x0b => Ok(16),
        _ => Err(PduError::UnsupportedTag(subtype)),
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], PduError> {
        if n > self.remaining() {
            return Err(PduError::Truncated {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, PduError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, PduError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, PduError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn skip_value(&mut self, depth: usize) -> Result<(), PduError> {
        if depth >= MAX_DEPTH {
            return Err(PduError::TooDeep(MAX_DEPTH));
        }
        let tag = self.u8()?;
        match tag {
            PST_TRUE | PST_FALSE | PST_NULL => {}
            PST_SYMBOL => {
                let len = self.u16()?;
                let _ = self.take(usize::from(len))?;
            }
            PST_INT32 => {
                let _ = self.take(4)?;
            }
            PST_DOUBLE | PST_UINT64 | PST_INT64 => {
                let _ = self.take(8)?;
            }
            PST_COMPLEX => {
                let _ = self.take(16)?;
            }
            PST_PAIR | PST_DICT => {
                self.skip_value(depth + 1)?;
                self.skip_value(depth + 1)?;
            }
            PST_VECTOR | PST_TUPLE => {
                let n = self.u32()?;
                for _ in 0..n {
                    self.skip_value(depth + 1)?;
                }
            }
            PST_UNIFORM_VECTOR => {
                let subtype = self.u8()?;
                let size = uniform_item_size(subtype)?;
                let n = self.u32()? as usize;
                let npad = self.u8()?;
                let _ = self.take(usize::from(npad))?;
                let bytes = n.checked_mul(size).ok_or(PduError::Truncated {
                    offset: self.pos,
                    needed: usize::MAX,
                })?;
                let _ = self.take(bytes)?;
            }
            other => return Err(PduError::UnsupportedTag(other)),
        }
        Ok(())
    }
}
