//! On-off keyed line code for dip-switch bursts.
//!
//! Each logical bit is expanded into a fixed 4-chip codeword, and a third
//! codeword (X-STATE) marks the start, middle and end of a command:
//!
//! | Symbol  | Chips       |
//! |---------|-------------|
//! | `0`     | `0 1 1 1`   |
//! | `1`     | `0 0 1 1`   |
//! | X-STATE | `0 0 0 1`   |
//!
//! A burst unit for one dip-switch code is laid out as
//!
//! ```text
//! [dead air][X][d0 d1 d2 d3 d4 d5][X][d6 d7][X]
//! ```
//!
//! and the whole unit is repeated so that a receiver which missed the start
//! of the transmission still sees complete copies.
//!
//! ## Usage
//!
//! ```rust
//! use ook390::encoding::LineCode;
//!
//! let code = LineCode::default();
//! let burst = code.build_payload(0x36);
//! assert_eq!(burst.len(), code.burst_len());
//! ```
//!
//! [`LineCode`] holds every parameter of the line code, so encoders with
//! different dead air, repeat counts or codewords can coexist.

use core::time::Duration;

use crate::consts::{
    CHIPS_PER_SYMBOL, Chip, Codeword, DEAD_AIR_LEN, DIP_FIRST_GROUP, DIP_SWITCHES, ONE,
    REPEAT_NUM, X_STATE, X_STATE_MARKERS, ZERO,
};
use crate::dip::decompose;
use crate::error::EncodingError;

/// Parameters of the on-off keyed line code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCode {
    zero: Codeword,
    one: Codeword,
    x_state: Codeword,
    dead_air: usize,
    repeat: usize,
}

impl Default for LineCode {
    fn default() -> Self {
        Self {
            zero: ZERO,
            one: ONE,
            x_state: X_STATE,
            dead_air: DEAD_AIR_LEN,
            repeat: REPEAT_NUM,
        }
    }
}

impl LineCode {
    /// Creates a line code with custom codewords and the default dead air
    /// and repeat count.
    ///
    /// # Errors
    /// [`EncodingError::InvalidChip`] if any chip is not 0 or 1.
    pub fn new(zero: Codeword, one: Codeword, x_state: Codeword) -> Result<Self, EncodingError> {
        for word in [&zero, &one, &x_state] {
            if let Some((index, &value)) = word.iter().enumerate().find(|&(_, &c)| c > 1) {
                return Err(EncodingError::InvalidChip { index, value });
            }
        }
        Ok(Self {
            zero,
            one,
            x_state,
            ..Self::default()
        })
    }

    /// Returns a copy with `chips` of leading silence per burst unit.
    #[must_use]
    pub fn with_dead_air(mut self, chips: usize) -> Self {
        self.dead_air = chips;
        self
    }

    /// Returns a copy that repeats each burst unit `repeat` times.
    #[must_use]
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    /// Codeword sent for a logical `0`.
    pub fn zero(&self) -> Codeword {
        self.zero
    }

    /// Codeword sent for a logical `1`.
    pub fn one(&self) -> Codeword {
        self.one
    }

    /// Synchronization marker codeword.
    pub fn x_state(&self) -> Codeword {
        self.x_state
    }

    /// Chips of leading silence per burst unit.
    pub fn dead_air(&self) -> usize {
        self.dead_air
    }

    /// Number of burst unit repetitions.
    pub fn repeat(&self) -> usize {
        self.repeat
    }

    /// Length in chips of one unrepeated burst unit.
    pub fn unit_len(&self) -> usize {
        self.dead_air
            .saturating_add((DIP_SWITCHES + X_STATE_MARKERS) * CHIPS_PER_SYMBOL)
    }

    /// Length in chips of a full burst. The same for every code.
    ///
    /// Saturates at `usize::MAX` for line codes too large to build.
    pub fn burst_len(&self) -> usize {
        self.repeat.saturating_mul(self.unit_len())
    }

    /// Time needed to radiate a full burst at `chip_period` per chip.
    pub fn airtime(&self, chip_period: Duration) -> Duration {
        chip_period.saturating_mul(u32::try_from(self.burst_len()).unwrap_or(u32::MAX))
    }

    /// Encodes a sequence of logical bits into chips.
    ///
    /// # Errors
    /// [`EncodingError::InvalidBit`] on the first value that is not 0 or 1.
    /// Nothing is returned for partially valid input, so a malformed bit can
    /// never shift the alignment of a burst.
    pub fn encode_bits(&self, bits: &[u8]) -> Result<Vec<Chip>, EncodingError> {
        let mut chips = Vec::with_capacity(bits.len() * CHIPS_PER_SYMBOL);
        for (index, &value) in bits.iter().enumerate() {
            match value {
                0 => chips.extend_from_slice(&self.zero),
                1 => chips.extend_from_slice(&self.one),
                _ => return Err(EncodingError::InvalidBit { index, value }),
            }
        }
        Ok(chips)
    }

    /// Builds one unrepeated burst unit for a dip-switch code.
    pub fn frame_chips(&self, code: u8) -> Vec<Chip> {
        let dip = decompose(code);
        let mut unit = Vec::with_capacity(self.unit_len());

        // Start with dead air
        unit.resize(self.dead_air, 0);

        unit.extend_from_slice(&self.x_state);
        self.push_switches(&mut unit, &dip[..DIP_FIRST_GROUP]);
        unit.extend_from_slice(&self.x_state);
        self.push_switches(&mut unit, &dip[DIP_FIRST_GROUP..]);
        unit.extend_from_slice(&self.x_state);
        unit
    }

    /// Builds the full repeated burst for a dip-switch code.
    ///
    /// The result is deterministic, which is what lets the receiver
    /// pattern-match repeated copies.
    pub fn build_payload(&self, code: u8) -> Vec<Chip> {
        let burst = self.frame_chips(code).repeat(self.repeat);
        log::trace!("dip {code:02x} burst: {burst:?}");
        burst
    }

    // Switch positions come from `decompose`, so they are always 0 or 1.
    fn push_switches(&self, out: &mut Vec<Chip>, switches: &[u8]) {
        for &s in switches {
            out.extend_from_slice(if s == 1 { &self.one } else { &self.zero });
        }
    }
}

/// Encodes bits with the default line code. See [`LineCode::encode_bits`].
pub fn encode_bits(bits: &[u8]) -> Result<Vec<Chip>, EncodingError> {
    LineCode::default().encode_bits(bits)
}

/// Builds a burst with the default line code. See [`LineCode::build_payload`].
pub fn build_payload(code: u8) -> Vec<Chip> {
    LineCode::default().build_payload(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA_SLOTS: [usize; 8] = [1, 2, 3, 4, 5, 6, 8, 9];
    const MARKER_SLOTS: [usize; 3] = [0, 7, 10];

    fn symbols(unit: &[Chip], dead_air: usize) -> Vec<Codeword> {
        unit[dead_air..]
            .chunks(CHIPS_PER_SYMBOL)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect()
    }

    #[test]
    fn test_encode_single_bits() {
        assert_eq!(encode_bits(&[1]), Ok(ONE.to_vec()));
        assert_eq!(encode_bits(&[0]), Ok(ZERO.to_vec()));
        assert_eq!(encode_bits(&[1]).map(|c| c.len()), Ok(4));
    }

    #[test]
    fn test_encode_bits_concatenates() {
        let chips = encode_bits(&[1, 0, 1]).unwrap();
        assert_eq!(chips, [ONE, ZERO, ONE].concat());
        assert_eq!(encode_bits(&[]), Ok(Vec::new()));
    }

    #[test]
    fn test_encode_bits_rejects_invalid_bit() {
        assert_eq!(
            encode_bits(&[0, 1, 7, 0]),
            Err(EncodingError::InvalidBit { index: 2, value: 7 })
        );
    }

    #[test]
    fn test_burst_length_is_constant() {
        let code = LineCode::default();
        assert_eq!(code.burst_len(), REPEAT_NUM * (DEAD_AIR_LEN + 32 + 12));
        for dip in 0..=u8::MAX {
            assert_eq!(build_payload(dip).len(), 20 * 84);
        }
    }

    #[test]
    fn test_all_zero_code() {
        let burst = build_payload(0x00);
        let unit = &burst[..84];
        assert!(unit[..40].iter().all(|&c| c == 0));
        let syms = symbols(unit, 40);
        assert_eq!(syms.len(), 11);
        for i in DATA_SLOTS {
            assert_eq!(syms[i], ZERO);
        }
        for i in MARKER_SLOTS {
            assert_eq!(syms[i], X_STATE);
        }
    }

    #[test]
    fn test_all_one_code() {
        let burst = build_payload(0xff);
        let syms = symbols(&burst[..84], 40);
        for i in DATA_SLOTS {
            assert_eq!(syms[i], ONE);
        }
        for i in MARKER_SLOTS {
            assert_eq!(syms[i], X_STATE);
        }
    }

    #[test]
    fn test_burst_repeats_unit() {
        let code = LineCode::default();
        let unit = code.frame_chips(0xa5);
        let burst = code.build_payload(0xa5);
        for copy in burst.chunks(unit.len()) {
            assert_eq!(copy, unit.as_slice());
        }
        assert_eq!(burst, code.build_payload(0xa5));
    }

    #[test]
    fn test_mixed_code_layout() {
        // 0x36 = 0b0011_0110
        let syms = symbols(&build_payload(0x36)[..84], 40);
        let expected = [
            X_STATE, ZERO, ZERO, ONE, ONE, ZERO, ONE, X_STATE, ONE, ZERO, X_STATE,
        ];
        assert_eq!(syms, expected);
    }

    #[test]
    fn test_custom_line_code() {
        let code = LineCode::new([1, 0, 0, 0], [1, 1, 0, 0], [1, 1, 1, 0])
            .unwrap()
            .with_dead_air(8)
            .with_repeat(3);
        assert_eq!(code.burst_len(), 3 * (8 + 44));
        let burst = code.build_payload(0x00);
        assert_eq!(burst.len(), code.burst_len());
        assert_eq!(&burst[8..12], &[1, 1, 1, 0]);
        assert_eq!(&burst[12..16], &[1, 0, 0, 0]);
        // The default encoder is unaffected.
        assert_eq!(LineCode::default().zero(), ZERO);
    }

    #[test]
    fn test_custom_line_code_rejects_bad_chip() {
        assert_eq!(
            LineCode::new(ZERO, [0, 0, 2, 1], X_STATE),
            Err(EncodingError::InvalidChip { index: 2, value: 2 })
        );
    }

    #[test]
    fn test_airtime_at_one_ms_per_chip() {
        let code = LineCode::default();
        assert_eq!(
            code.airtime(Duration::from_millis(1)),
            Duration::from_millis(1680)
        );
        assert_eq!(code.with_repeat(0).airtime(Duration::from_millis(1)), Duration::ZERO);
    }

    #[test]
    fn test_oversized_line_code_lengths_saturate() {
        let code = LineCode::default().with_dead_air(usize::MAX).with_repeat(usize::MAX);
        assert_eq!(code.unit_len(), usize::MAX);
        assert_eq!(code.burst_len(), usize::MAX);
        assert_eq!(
            LineCode::default().with_repeat(usize::MAX).burst_len(),
            usize::MAX
        );
    }
}
