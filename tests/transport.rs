//! PUSH to PULL over a real ZeroMQ link on localhost.

use std::time::Duration;

use ook390::encoding::LineCode;
use ook390::error::Error;
use ook390::frame::{FrameOptions, build_frame};
use ook390::socket::{PullSocketBuilder, PushSocketBuilder};

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_raw_bytes_arrive_in_order() {
    let address = "tcp://127.0.0.1:47311";
    let mut tx = PushSocketBuilder::new().address(address).bind().unwrap();
    let mut rx = PullSocketBuilder::new().address(address).connect().unwrap();

    tx.send_raw_bytes(&[]).unwrap();
    tx.send_raw_bytes(&[0x42]).unwrap();
    let long: Vec<u8> = (0..255).collect();
    tx.send_raw_bytes(&long).unwrap();

    assert_eq!(rx.poll_bytes_timeout(TIMEOUT).unwrap(), Some(vec![]));
    assert_eq!(rx.poll_bytes_timeout(TIMEOUT).unwrap(), Some(vec![0x42]));
    assert_eq!(rx.poll_bytes_timeout(TIMEOUT).unwrap(), Some(long));
    assert_eq!(rx.rx_good, 3);

    rx.close();
    tx.close();
}

#[test]
fn test_burst_survives_transport() {
    let address = "tcp://127.0.0.1:47312";
    let mut tx = PushSocketBuilder::new().address(address).bind().unwrap();
    let mut rx = PullSocketBuilder::new().address(address).connect().unwrap();

    let line_code = LineCode::default();
    tx.send_burst(&line_code, 0x36).unwrap();

    let chips = rx.poll_bytes().unwrap();
    assert_eq!(chips.len(), 1680);
    assert_eq!(chips, line_code.build_payload(0x36));
}

#[test]
fn test_checksum_validation_end_to_end() {
    let address = "tcp://127.0.0.1:47313";
    let mut tx = PushSocketBuilder::new().address(address).bind().unwrap();
    let mut rx = PullSocketBuilder::new()
        .address(address)
        .checksum(true)
        .connect()
        .unwrap();

    // What a receive flowgraph hands over once the frame is stripped:
    // payload followed by its checksum.
    tx.send_raw_bytes(b"open\xb2").unwrap();
    tx.send_raw_bytes(b"open\x00").unwrap();

    assert_eq!(rx.poll_str().unwrap(), "open");
    assert_eq!(rx.poll_bytes().unwrap(), Vec::<u8>::new());
    assert_eq!((rx.rx_good, rx.rx_bad), (1, 1));
}

#[test]
fn test_framed_string_is_delivered_whole() {
    let address = "tcp://127.0.0.1:47314";
    let preamble = [0xaa, 0xaa, 0x55, 0x55];
    let mut tx = PushSocketBuilder::new()
        .address(address)
        .checksum(true)
        .length_header(true)
        .bind()
        .unwrap();
    let mut rx = PullSocketBuilder::new().address(address).connect().unwrap();

    tx.send_framed_str(&preamble, "door").unwrap();

    let framed = rx.poll_bytes_timeout(TIMEOUT).unwrap().unwrap();
    assert_eq!(framed, build_frame(&preamble, b"door", FrameOptions::FULL).unwrap());
}

#[test]
fn test_try_poll_and_timeout_without_traffic() {
    let address = "tcp://127.0.0.1:47315";
    let _tx = PushSocketBuilder::new().address(address).bind().unwrap();
    let mut rx = PullSocketBuilder::new().address(address).connect().unwrap();

    assert!(matches!(rx.try_poll_bytes(), Err(nb::Error::WouldBlock)));
    assert_eq!(
        rx.poll_bytes_timeout(Duration::from_millis(50)).unwrap(),
        None
    );
}

#[test]
fn test_close_twice_then_use() {
    let address = "tcp://127.0.0.1:47316";
    let mut tx = PushSocketBuilder::new().address(address).bind().unwrap();
    tx.close();
    tx.close();
    assert!(tx.is_closed());
    assert!(matches!(tx.send_raw_bytes(&[1]), Err(Error::Closed)));

    let mut rx = PullSocketBuilder::new().address(address).connect().unwrap();
    rx.close();
    rx.close();
    assert!(matches!(rx.poll_bytes(), Err(Error::Closed)));
}
