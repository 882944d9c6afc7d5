//! # ook390
//!
//! Line code, framing and message-queue plumbing for driving an on-off keyed
//! transmitter (such as a 390 MHz garage-door remote emulated on an SDR) from
//! a separate GNU Radio flowgraph.
//!
//! The crate covers everything between "which dip-switch code" and "bytes on
//! a ZeroMQ socket":
//! - a deterministic 4-chip line code with an X-STATE sync symbol
//! - repeated bursts with dead air, so a late receiver still locks on
//! - byte framing with preamble, duplicated length header and additive checksum
//! - the GNU Radio PMT PDU wire format `(metadata . u8vector)`
//! - PUSH/PULL socket wrappers with zero-linger shutdown
//!
//! The RF side (carrier, gain, tuning, sample-rate conversion) stays in the
//! flowgraph, which consumes the chips as unit-rate samples.
//!
//! ## Usage
//!
//! ```no_run
//! use ook390::encoding::LineCode;
//! use ook390::socket::{PullSocketBuilder, PushSocketBuilder};
//!
//! # fn main() -> Result<(), ook390::error::Error> {
//! // Transmit flowgraph pulls from here.
//! let mut tx = PushSocketBuilder::new().address("tcp://127.0.0.1:5555").bind()?;
//! tx.send_burst(&LineCode::default(), 0xae)?;
//!
//! // Receive flowgraph pushes decoded packets here.
//! let mut rx = PullSocketBuilder::new()
//!     .address("tcp://127.0.0.1:5556")
//!     .checksum(true)
//!     .connect()?;
//! let text = rx.poll_str()?;
//! println!("{text}");
//!
//! tx.close();
//! rx.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module       | Contents |
//! |--------------|----------|
//! | [`dip`]      | dip-switch code to switch positions |
//! | [`encoding`] | line code and burst builder |
//! | [`frame`]    | byte framing |
//! | [`checksum`] | additive checksum |
//! | [`pdu`]      | PMT PDU codec |
//! | [`socket`]   | push/pull sockets |
//! | [`fuzz`]     | paced sweeps over many codes |
//!
//! ## Integration Notes
//!
//! - The push side binds and the pull side connects. Flowgraph blocks must
//!   use the opposite role.
//! - Sends are fire-and-forget. Closing a socket discards anything still queued.
//! - Pacing between bursts is the caller's job; see [`fuzz::Sweep`].

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

pub mod checksum;
pub mod consts;
pub mod dip;
pub mod encoding;
pub mod error;
pub mod frame;
pub mod fuzz;
pub mod pdu;
pub mod socket;

pub use error::Error;
