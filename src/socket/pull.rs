use core::time::Duration;

use super::{MessageSource, ZmqEndpoint};
use crate::checksum::strip_checksum;
use crate::consts::TCP_RX;
use crate::error::Error;
use crate::pdu;

/// Receiving end of a PDU link, normally fed by a receive flowgraph.
///
/// With checksum validation enabled, the last byte of every payload is
/// treated as the additive checksum of the bytes before it. A mismatch is
/// not an error: it is logged as a warning, counted in
/// [`rx_bad`](Self::rx_bad), and the caller gets an empty payload.
#[derive(Debug)]
pub struct PullSocket<S: MessageSource = ZmqEndpoint> {
    source: S,
    checksum: bool,
    /// Payloads accepted.
    pub rx_good: u32,
    /// Payloads dropped for a bad checksum or a malformed PDU.
    pub rx_bad: u32,
}

impl PullSocket<ZmqEndpoint> {
    /// Connects a ZeroMQ PULL socket to `address`.
    pub fn connect(address: &str, checksum: bool) -> Result<Self, Error> {
        Ok(Self::new(ZmqEndpoint::connect(zmq::PULL, address)?, checksum))
    }
}

impl<S: MessageSource> PullSocket<S> {
    /// Wraps an already open source.
    pub fn new(source: S, checksum: bool) -> Self {
        Self {
            source,
            checksum,
            rx_good: 0,
            rx_bad: 0,
        }
    }

    /// The underlying source.
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// Whether trailing checksums are validated.
    pub fn checksum(&self) -> bool {
        self.checksum
    }

    /// Blocks until a message arrives and returns its payload.
    ///
    /// There is no timeout; see [`poll_bytes_timeout`](Self::poll_bytes_timeout)
    /// and [`try_poll_bytes`](Self::try_poll_bytes) for bounded waits.
    pub fn poll_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let wire = self.source.recv()?;
        self.accept(&wire)
    }

    /// Returns the payload of a queued message, or
    /// [`nb::Error::WouldBlock`] when nothing has arrived yet.
    pub fn try_poll_bytes(&mut self) -> nb::Result<Vec<u8>, Error> {
        let wire = self.source.try_recv()?;
        self.accept(&wire).map_err(nb::Error::Other)
    }

    /// Waits at most `timeout` for a message. `Ok(None)` on timeout.
    pub fn poll_bytes_timeout(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, Error> {
        match self.source.recv_timeout(timeout)? {
            Some(wire) => self.accept(&wire).map(Some),
            None => Ok(None),
        }
    }

    /// Blocks for a message and decodes its payload as UTF-8.
    ///
    /// A checksum mismatch yields an empty string.
    pub fn poll_str(&mut self) -> Result<String, Error> {
        Ok(String::from_utf8(self.poll_bytes()?)?)
    }

    /// Like [`poll_str`](Self::poll_str), but keeps waiting past payloads
    /// that are not valid UTF-8 or not a valid PDU. Those are logged and
    /// skipped. Only transport errors and a closed socket are returned.
    pub fn next_str(&mut self) -> Result<String, Error> {
        loop {
            match self.poll_str() {
                Err(e @ (Error::Utf8(_) | Error::Pdu(_))) => {
                    log::warn!("skipping undecodable payload: {e}");
                }
                other => return other,
            }
        }
    }

    /// Releases the socket without draining. Safe to call more than once.
    pub fn close(&mut self) {
        if !self.source.is_closed() {
            self.source.close();
        }
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.source.is_closed()
    }

    fn accept(&mut self, wire: &[u8]) -> Result<Vec<u8>, Error> {
        let payload = match pdu::deserialize(wire) {
            Ok(payload) => payload,
            Err(e) => {
                self.rx_bad += 1;
                return Err(e.into());
            }
        };
        log::debug!("received {} payload bytes", payload.len());

        if !self.checksum {
            self.rx_good += 1;
            return Ok(payload);
        }

        match strip_checksum(&payload) {
            Some(body) => {
                self.rx_good += 1;
                Ok(body.to_vec())
            }
            None => {
                self.rx_bad += 1;
                log::warn!("checksum did not match, dropping {} bytes", payload.len());
                Ok(Vec::new())
            }
        }
    }
}

impl<S: MessageSource> Drop for PullSocket<S> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Builds a [`PullSocket`].
#[derive(Debug, Clone)]
pub struct PullSocketBuilder {
    address: String,
    checksum: bool,
}

impl PullSocketBuilder {
    /// Default address [`TCP_RX`], no checksum validation.
    pub fn new() -> Self {
        Self {
            address: TCP_RX.to_string(),
            checksum: false,
        }
    }

    /// Endpoint to connect to.
    #[must_use]
    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    /// Validate and strip a trailing additive checksum.
    #[must_use]
    pub fn checksum(mut self, enabled: bool) -> Self {
        self.checksum = enabled;
        self
    }

    /// Connects the socket.
    pub fn connect(self) -> Result<PullSocket, Error> {
        PullSocket::connect(&self.address, self.checksum)
    }
}

impl Default for PullSocketBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PduError;
    use crate::socket::mock::MockChannel;

    fn pull(messages: Vec<Vec<u8>>, checksum: bool) -> PullSocket<MockChannel> {
        PullSocket::new(MockChannel::with_inbox(messages), checksum)
    }

    fn wire(payload: &[u8]) -> Vec<u8> {
        pdu::serialize(payload).unwrap()
    }

    #[test]
    fn test_poll_bytes_without_checksum() {
        let mut socket = pull(vec![wire(&[1, 2, 3, 7])], false);
        assert_eq!(socket.poll_bytes().unwrap(), vec![1, 2, 3, 7]);
        assert_eq!(socket.rx_good, 1);
    }

    #[test]
    fn test_poll_bytes_strips_valid_checksum() {
        let mut socket = pull(vec![wire(&[1, 2, 3, 6])], true);
        assert_eq!(socket.poll_bytes().unwrap(), vec![1, 2, 3]);
        assert_eq!((socket.rx_good, socket.rx_bad), (1, 0));
    }

    #[test]
    fn test_poll_bytes_drops_bad_checksum() {
        let mut socket = pull(vec![wire(&[1, 2, 3, 7]), wire(&[])], true);
        assert_eq!(socket.poll_bytes().unwrap(), Vec::<u8>::new());
        // An empty payload has no checksum byte at all.
        assert_eq!(socket.poll_bytes().unwrap(), Vec::<u8>::new());
        assert_eq!((socket.rx_good, socket.rx_bad), (0, 2));
        assert!(!socket.is_closed());
    }

    #[test]
    fn test_poll_bytes_reports_malformed_pdu() {
        let mut socket = pull(vec![vec![0x06]], false);
        assert!(matches!(
            socket.poll_bytes(),
            Err(Error::Pdu(PduError::NotAPair(0x06)))
        ));
        assert_eq!(socket.rx_bad, 1);
    }

    #[test]
    fn test_poll_str() {
        let mut socket = pull(vec![wire("héllo".as_bytes()), wire(&[0xff])], false);
        assert_eq!(socket.poll_str().unwrap(), "héllo");
        assert!(matches!(socket.poll_str(), Err(Error::Utf8(_))));
    }

    #[test]
    fn test_next_str_skips_undecodable_payloads() {
        let mut socket = pull(vec![wire(&[0xff, 0x41]), vec![0x06], wire(b"ok")], false);
        assert_eq!(socket.next_str().unwrap(), "ok");
        assert_eq!(socket.rx_bad, 1);
        // Empty inbox surfaces as a transport error and is not swallowed.
        assert!(matches!(socket.next_str(), Err(Error::Transport(_))));
    }

    #[test]
    fn test_next_str_keeps_empty_payload() {
        let mut socket = pull(vec![wire(b"")], false);
        assert_eq!(socket.next_str().unwrap(), "");
        assert_eq!(socket.rx_good, 1);
    }

    #[test]
    fn test_next_str_stops_when_closed() {
        let mut socket = pull(vec![wire(&[0xff])], false);
        socket.close();
        assert!(matches!(socket.next_str(), Err(Error::Closed)));
    }

    #[test]
    fn test_poll_str_with_bad_checksum_is_empty() {
        let mut socket = pull(vec![wire(b"abc\x00")], true);
        assert_eq!(socket.poll_str().unwrap(), "");
    }

    #[test]
    fn test_try_poll_bytes_would_block() {
        let mut socket = pull(vec![wire(&[5])], false);
        assert_eq!(socket.try_poll_bytes().ok(), Some(vec![5]));
        assert!(matches!(socket.try_poll_bytes(), Err(nb::Error::WouldBlock)));
    }

    #[test]
    fn test_poll_bytes_timeout() {
        let mut socket = pull(vec![wire(&[9, 9])], false);
        let timeout = Duration::from_millis(10);
        assert_eq!(socket.poll_bytes_timeout(timeout).unwrap(), Some(vec![9, 9]));
        assert_eq!(socket.poll_bytes_timeout(timeout).unwrap(), None);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut socket = pull(Vec::new(), true);
        socket.close();
        socket.close();
        assert!(socket.is_closed());
        assert_eq!(socket.source.close_calls, 1);
        assert!(matches!(socket.poll_bytes(), Err(Error::Closed)));
    }

    #[test]
    fn test_builder() {
        let builder = PullSocketBuilder::new().address("tcp://10.0.0.2:5556").checksum(true);
        assert_eq!(builder.address, "tcp://10.0.0.2:5556");
        assert!(builder.checksum);
        assert_eq!(PullSocketBuilder::default().address, TCP_RX);
    }
}
