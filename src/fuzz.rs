//! Paced transmission of dip-switch bursts.
//!
//! A [`Sweep`] walks a list of codes (or the whole code space from
//! [`all_codes`]) and sends one burst per code through a [`PushSocket`],
//! pausing between bursts so the flowgraph has time to radiate each one
//! before the next is queued. Pacing is driven by any
//! [`DelayNs`](embedded_hal::delay::DelayNs) provider; [`StdDelay`] sleeps
//! the current thread.
//!
//! ```no_run
//! use ook390::fuzz::{StdDelay, Sweep, all_codes};
//! use ook390::socket::PushSocketBuilder;
//!
//! # fn main() -> Result<(), ook390::error::Error> {
//! let mut tx = PushSocketBuilder::new().bind()?;
//! let sent = Sweep::default().run(&mut tx, all_codes(), &mut StdDelay)?;
//! assert_eq!(sent, 256);
//! # Ok(())
//! # }
//! ```

use core::ops::RangeInclusive;
use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::consts::{CHIP_PERIOD_US, SWEEP_INTERVAL_MS};
use crate::dip::decompose;
use crate::encoding::LineCode;
use crate::error::Error;
use crate::socket::{MessageSink, PushSocket};

/// Every dip-switch code, `0x00` through `0xff`.
pub fn all_codes() -> RangeInclusive<u8> {
    0..=u8::MAX
}

/// A [`DelayNs`] provider backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Settings for a paced burst sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    line_code: LineCode,
    interval_ms: u32,
    chip_period: Duration,
}

impl Default for Sweep {
    fn default() -> Self {
        Self::new(LineCode::default())
    }
}

impl Sweep {
    /// A sweep with the default interval and chip period.
    pub fn new(line_code: LineCode) -> Self {
        Self {
            line_code,
            interval_ms: SWEEP_INTERVAL_MS,
            chip_period: Duration::from_micros(CHIP_PERIOD_US),
        }
    }

    /// Pause after each burst, in milliseconds.
    #[must_use]
    pub fn with_interval_ms(mut self, interval_ms: u32) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    /// Time the flowgraph spends on each chip.
    #[must_use]
    pub fn with_chip_period(mut self, chip_period: Duration) -> Self {
        self.chip_period = chip_period;
        self
    }

    /// The line code used for every burst.
    pub fn line_code(&self) -> &LineCode {
        &self.line_code
    }

    /// Pause after each burst, in milliseconds.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Whether the pause is long enough for a burst to finish on air.
    pub fn leaves_airtime(&self) -> bool {
        let interval = Duration::from_millis(u64::from(self.interval_ms));
        self.line_code.airtime(self.chip_period) <= interval
    }

    /// Sends one burst per code, pausing after each.
    ///
    /// Stops at the first transport failure. Returns the number of bursts sent.
    pub fn run<S, D, I>(
        &self,
        socket: &mut PushSocket<S>,
        codes: I,
        delay: &mut D,
    ) -> Result<usize, Error>
    where
        S: MessageSink,
        D: DelayNs,
        I: IntoIterator<Item = u8>,
    {
        if !self.leaves_airtime() {
            log::warn!(
                "interval of {} ms is shorter than the {:?} burst airtime",
                self.interval_ms,
                self.line_code.airtime(self.chip_period)
            );
        }

        let mut sent = 0;
        for code in codes {
            log::info!("DIP = {code:02x}");
            log::debug!("switches {:?}", decompose(code));
            socket.send_burst(&self.line_code, code)?;
            sent += 1;
            delay.delay_ms(self.interval_ms);
        }
        Ok(sent)
    }
}
