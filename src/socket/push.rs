use super::{MessageSink, ZmqEndpoint};
use crate::consts::TCP_TX;
use crate::encoding::LineCode;
use crate::error::Error;
use crate::frame::{FrameOptions, build_frame};
use crate::pdu;

/// Sending end of a PDU link, normally feeding a transmit flowgraph.
///
/// ## Example
///
/// ```no_run
/// use ook390::encoding::LineCode;
/// use ook390::socket::PushSocketBuilder;
///
/// # fn main() -> Result<(), ook390::error::Error> {
/// let mut tx = PushSocketBuilder::new()
///     .address("tcp://127.0.0.1:5555")
///     .checksum(true)
///     .bind()?;
/// tx.send_framed_str(&[0xaa, 0xaa, 0x55, 0x55], "open sesame")?;
/// tx.send_burst(&LineCode::default(), 0x36)?;
/// tx.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PushSocket<S: MessageSink = ZmqEndpoint> {
    sink: S,
    options: FrameOptions,
    /// Number of messages handed to the transport.
    pub tx_good: u32,
}

impl PushSocket<ZmqEndpoint> {
    /// Binds a ZeroMQ PUSH socket at `address`.
    pub fn bind(address: &str, options: FrameOptions) -> Result<Self, Error> {
        Ok(Self::new(ZmqEndpoint::bind(zmq::PUSH, address)?, options))
    }
}

impl<S: MessageSink> PushSocket<S> {
    /// Wraps an already open sink.
    pub fn new(sink: S, options: FrameOptions) -> Self {
        Self {
            sink,
            options,
            tx_good: 0,
        }
    }

    /// The underlying sink.
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// Framing applied by [`send_framed_bytes`](Self::send_framed_bytes).
    pub fn options(&self) -> FrameOptions {
        self.options
    }

    /// Serializes `payload` into a PDU and sends it unframed.
    pub fn send_raw_bytes(&mut self, payload: &[u8]) -> Result<(), Error> {
        let wire = pdu::serialize(payload)?;
        self.sink.send(&wire)?;
        self.tx_good += 1;
        log::debug!(
            "sent {} payload bytes ({} on the wire)",
            payload.len(),
            wire.len()
        );
        Ok(())
    }

    /// Frames `payload` behind `preamble` with this socket's options, then
    /// sends it.
    pub fn send_framed_bytes(&mut self, preamble: &[u8], payload: &[u8]) -> Result<(), Error> {
        let framed = build_frame(preamble, payload, self.options)?;
        self.send_raw_bytes(&framed)
    }

    /// UTF-8 encodes `text` and sends it framed.
    pub fn send_framed_str(&mut self, preamble: &[u8], text: &str) -> Result<(), Error> {
        self.send_framed_bytes(preamble, text.as_bytes())
    }

    /// Encodes the burst for a dip-switch `code` and sends the chips as raw
    /// bytes, one chip per byte.
    pub fn send_burst(&mut self, line_code: &LineCode, code: u8) -> Result<(), Error> {
        let chips = line_code.build_payload(code);
        self.send_raw_bytes(&chips)
    }

    /// Discards anything still queued and releases the socket. Safe to call
    /// more than once.
    pub fn close(&mut self) {
        if !self.sink.is_closed() {
            self.sink.close();
        }
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.sink.is_closed()
    }
}

impl<S: MessageSink> Drop for PushSocket<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builds a [`PushSocket`].
#[derive(Debug, Clone)]
pub struct PushSocketBuilder {
    address: String,
    options: FrameOptions,
}

impl PushSocketBuilder {
    /// Default address [`TCP_TX`], no length header, no checksum.
    pub fn new() -> Self {
        Self {
            address: TCP_TX.to_string(),
            options: FrameOptions::default(),
        }
    }

    /// Endpoint to bind.
    #[must_use]
    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    /// Append the additive checksum to framed payloads.
    #[must_use]
    pub fn checksum(mut self, enabled: bool) -> Self {
        self.options.checksum = enabled;
        self
    }

    /// Insert the duplicated length header into framed payloads.
    #[must_use]
    pub fn length_header(mut self, enabled: bool) -> Self {
        self.options.length_header = enabled;
        self
    }

    /// Binds the socket.
    pub fn bind(self) -> Result<PushSocket, Error> {
        PushSocket::bind(&self.address, self.options)
    }
}

impl Default for PushSocketBuilder {
    fn default() -> Self {
        Self::new()
    }
}
