//! Constants used across the line code, framing and transport layers.
//!
//! ## Key Concepts
//!
//! - **Codewords**: every logical bit is sent as exactly four chips. The
//!   receiver locks onto the fixed 4-chip rhythm, so these never change length.
//! - **X-STATE**: a third codeword, distinct from both data values, used as a
//!   start, middle and end marker inside a burst.
//! - **Dead air**: leading silence before each burst unit, giving the receiver
//!   a quiet gap to detect the start of the next repetition.
//! - **Frame silence**: zero bytes placed before and after a framed payload.
//! - **Endpoints**: the addresses the transmit and receive flowgraphs use by
//!   default. The push side binds, the pull side connects.

/// A single on/off sample of the line code, either 0 or 1.
pub type Chip = u8;

/// A fixed group of four chips encoding one symbol.
pub type Codeword = [Chip; CHIPS_PER_SYMBOL];

/// Number of chips per encoded symbol.
pub const CHIPS_PER_SYMBOL: usize = 4;

/// Codeword for a logical `0`.
pub const ZERO: Codeword = [0, 1, 1, 1];

/// Codeword for a logical `1`.
pub const ONE: Codeword = [0, 0, 1, 1];

/// Synchronization marker, distinct from both data codewords.
pub const X_STATE: Codeword = [0, 0, 0, 1];

/// Number of positions on the dip-switch bank.
pub const DIP_SWITCHES: usize = 8;

/// Switches sent between the start marker and the mid-burst marker.
pub const DIP_FIRST_GROUP: usize = 6;

/// Number of X-STATE markers in one burst unit.
pub const X_STATE_MARKERS: usize = 3;

/// Chips of leading silence in each burst unit.
///
/// Some receivers need a minimum gap to re-arm between repetitions.
pub const DEAD_AIR_LEN: usize = 40;

/// Number of times a burst unit is repeated per transmission.
pub const REPEAT_NUM: usize = 20;

/// Zero bytes placed before and after a framed payload.
pub const FRAME_SILENCE_LEN: usize = 10;

/// Size of the optional length header: `[0x00, len, 0x00, len]`.
pub const FRAME_HEADER_LEN: usize = 4;

/// Default endpoint for sending data to the transmitter.
pub const TCP_TX: &str = "tcp://127.0.0.1:5555";

/// Default endpoint for receiving data from the receiver.
pub const TCP_RX: &str = "tcp://127.0.0.1:5556";

/// Default pause between two bursts of a sweep, in milliseconds.
///
/// A default burst is 1680 chips at 1 ms per chip, so this leaves the
/// flowgraph enough time to radiate it before the next one is queued.
pub const SWEEP_INTERVAL_MS: u32 = 2_000;

/// Default duration of one chip on air, in microseconds.
pub const CHIP_PERIOD_US: u64 = 1_000;
