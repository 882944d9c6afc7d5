//! Message-queue sockets bridging to GNU Radio flowgraphs.
//!
//! The transmit flowgraph pulls PDUs from a ZeroMQ `pull_msg_source`, and the
//! receive flowgraph pushes decoded packets out of a `push_msg_sink`. This
//! module provides the other end of both links:
//!
//! - [`PushSocket`]: binds a PUSH socket and sends raw bytes, framed bytes,
//!   framed strings or dip-switch bursts.
//! - [`PullSocket`]: connects a PULL socket and receives bytes or strings,
//!   optionally validating a trailing additive checksum.
//!
//! The push side always binds and the pull side always connects.
//!
//! Both wrappers are generic over the channel they drive ([`MessageSink`] and
//! [`MessageSource`]) with [`ZmqEndpoint`] as the default, the same way the
//! radio driver is generic over its pins.
//!
//! ## Shutdown
//!
//! `close()` sets a zero linger period, so anything still queued is
//! discarded instead of drained, and then releases the socket and its
//! context. It is idempotent and never fails.

use core::fmt;
use core::time::Duration;

use crate::error::Error;

mod pull;
mod push;

pub use pull::{PullSocket, PullSocketBuilder};
pub use push::{PushSocket, PushSocketBuilder};

/// Lifecycle shared by every message channel.
pub trait MessageChannel {
    /// Releases the channel without draining queued messages. Calling it
    /// again is a no-op.
    fn close(&mut self);

    /// Whether [`close`](MessageChannel::close) has run.
    fn is_closed(&self) -> bool;
}

/// The sending half of a message channel.
pub trait MessageSink: MessageChannel {
    /// Queues one message. May block while the outbound queue is full; does
    /// not wait for any acknowledgement.
    fn send(&mut self, message: &[u8]) -> Result<(), Error>;
}

/// The receiving half of a message channel.
pub trait MessageSource: MessageChannel {
    /// Blocks until one message arrives.
    fn recv(&mut self) -> Result<Vec<u8>, Error>;

    /// Returns a queued message or [`nb::Error::WouldBlock`] if there is none.
    fn try_recv(&mut self) -> nb::Result<Vec<u8>, Error>;

    /// Waits at most `timeout` for one message.
    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, Error>;
}

/// A ZeroMQ socket together with the context that owns it.
pub struct ZmqEndpoint {
    address: String,
    socket: Option<zmq::Socket>,
    context: Option<zmq::Context>,
}

impl fmt::Debug for ZmqEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZmqEndpoint")
            .field("address", &self.address)
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl ZmqEndpoint {
    /// Creates a context and a socket of `kind` bound to `address`.
    pub fn bind(kind: zmq::SocketType, address: &str) -> Result<Self, Error> {
        let context = zmq::Context::new();
        let socket = context.socket(kind)?;
        socket.bind(address)?;
        log::info!("{kind:?} socket bound to {address}");
        Ok(Self {
            address: address.to_string(),
            socket: Some(socket),
            context: Some(context),
        })
    }

    /// Creates a context and a socket of `kind` connected to `address`.
    pub fn connect(kind: zmq::SocketType, address: &str) -> Result<Self, Error> {
        let context = zmq::Context::new();
        let socket = context.socket(kind)?;
        socket.connect(address)?;
        log::info!("{kind:?} socket connecting to {address}");
        Ok(Self {
            address: address.to_string(),
            socket: Some(socket),
            context: Some(context),
        })
    }

    /// The endpoint string this socket was bound or connected to.
    pub fn address(&self) -> &str {
        &self.address
    }

    fn socket(&self) -> Result<&zmq::Socket, Error> {
        self.socket.as_ref().ok_or(Error::Closed)
    }
}

impl MessageChannel for ZmqEndpoint {
    fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            if let Err(e) = socket.set_linger(0) {
                log::debug!("could not clear linger on {}: {e}", self.address);
            }
            drop(socket);
        }
        if self.context.take().is_some() {
            log::debug!("released context for {}", self.address);
        }
    }

    fn is_closed(&self) -> bool {
        self.socket.is_none()
    }
}

impl MessageSink for ZmqEndpoint {
    fn send(&mut self, message: &[u8]) -> Result<(), Error> {
        self.socket()?.send(message, 0)?;
        Ok(())
    }
}

// `zmq_poll` takes whole milliseconds; round up so short waits still wait.
fn poll_timeout_ms(timeout: Duration) -> i64 {
    i64::try_from(timeout.as_micros().div_ceil(1_000)).unwrap_or(i64::MAX)
}

impl MessageSource for ZmqEndpoint {
    fn recv(&mut self) -> Result<Vec<u8>, Error> {
        Ok(self.socket()?.recv_bytes(0)?)
    }

    fn try_recv(&mut self) -> nb::Result<Vec<u8>, Error> {
        let socket = self.socket().map_err(nb::Error::Other)?;
        match socket.recv_bytes(zmq::DONTWAIT) {
            Ok(message) => Ok(message),
            Err(zmq::Error::EAGAIN) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }

    fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, Error> {
        let socket = self.socket()?;
        if socket.poll(zmq::POLLIN, poll_timeout_ms(timeout))? == 0 {
            return Ok(None);
        }
        Ok(Some(socket.recv_bytes(0)?))
    }
}
