//! Fixed-width binary words.
//!
//! A [`BinaryWord`] is an immutable bit vector of 1 to [`MAX_WIDTH`] bits.
//! Bit index 0 is the most significant bit, which is how registers are drawn
//! in a step trace. All arithmetic wraps modulo `2^width`: carries out of the
//! top bit are dropped, and the `overflowing_*` variants report them instead
//! of failing.

use std::{fmt, ops::Not, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::Display;

use crate::error::WordError;

/// Widest word the substrate can hold. A product of two 32-bit registers
/// needs all of it.
pub const MAX_WIDTH: u32 = 64;

/// How the bits of a word map to a decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Signedness {
    /// Two's complement: the MSB carries weight `-2^(width-1)`.
    Signed,
    /// Plain binary magnitude.
    Unsigned,
}

impl Signedness {
    /// Inclusive `(min, max)` decimal range representable in `width` bits.
    pub const fn range(self, width: u32) -> (i128, i128) {
        match self {
            Self::Signed => (-(1i128 << (width - 1)), (1i128 << (width - 1)) - 1),
            Self::Unsigned => (0, (1i128 << width) - 1),
        }
    }
}

/// Carry and overflow flags produced by a fixed-width addition or
/// subtraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Carry out of the MSB for an addition, borrow for a subtraction.
    pub carry: bool,
    /// The exact signed result does not fit in the word.
    pub overflow: bool,
}

/// A fixed-width two's-complement bit vector.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryWord {
    bits: u64,
    width: u32,
}

const fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn check_width(width: u32) -> Result<(), WordError> {
    if width == 0 || width > MAX_WIDTH {
        return Err(WordError::InvalidWidth(width));
    }
    Ok(())
}

impl BinaryWord {
    /// Builds a word from its raw bit pattern.
    ///
    /// Fails if `width` is not in `1..=64` or if `bits` has a bit set at or
    /// above `width`.
    pub fn new(bits: u64, width: u32) -> Result<Self, WordError> {
        check_width(width)?;
        if bits & !mask(width) != 0 {
            return Err(WordError::BitsExceedWidth { bits, width });
        }
        Ok(Self { bits, width })
    }

    /// Builds a word, silently discarding bits above `width`.
    pub(crate) const fn from_raw(bits: u64, width: u32) -> Self {
        debug_assert!(width > 0 && width <= MAX_WIDTH);
        Self {
            bits: bits & mask(width),
            width,
        }
    }

    /// The all-zero word of the given width.
    pub fn zero(width: u32) -> Result<Self, WordError> {
        Self::new(0, width)
    }

    /// A one-bit word holding `bit`.
    pub const fn from_bit(bit: bool) -> Self {
        Self {
            bits: bit as u64,
            width: 1,
        }
    }

    /// Encodes a signed decimal value in two's complement.
    ///
    /// ```
    /// use arithtrace_engine::BinaryWord;
    ///
    /// let word = BinaryWord::encode(-4, 4).unwrap();
    /// assert_eq!(word.to_string(), "1100");
    /// assert!(BinaryWord::encode(8, 4).is_err());
    /// ```
    pub fn encode(value: i64, width: u32) -> Result<Self, WordError> {
        Self::encode_with(value, width, Signedness::Signed)
    }

    /// Encodes a non-negative decimal value as a plain binary magnitude.
    pub fn encode_unsigned(value: i64, width: u32) -> Result<Self, WordError> {
        Self::encode_with(value, width, Signedness::Unsigned)
    }

    /// Encodes `value` under the given signedness, reporting values outside
    /// the representable range.
    pub fn encode_with(value: i64, width: u32, signedness: Signedness) -> Result<Self, WordError> {
        check_width(width)?;
        let (min, max) = signedness.range(width);
        let wide = i128::from(value);
        if wide < min || wide > max {
            return Err(WordError::OutOfRange {
                value: wide,
                min,
                max,
                width,
                signedness,
            });
        }
        // The low `width` bits of the 64-bit two's complement pattern are the
        // encoding for both conventions once the range is checked.
        Ok(Self::from_raw(value as u64, width))
    }

    /// Decodes the word as a two's-complement value.
    ///
    /// A set MSB means the value is negative; its magnitude is recovered by
    /// inverting and incrementing.
    pub fn decode(&self) -> i64 {
        if self.msb() {
            let magnitude = i128::from(self.negate().bits);
            (-magnitude) as i64
        } else {
            self.bits as i64
        }
    }

    /// Decodes the word as an unsigned magnitude.
    pub const fn decode_unsigned(&self) -> u64 {
        self.bits
    }

    /// Decodes the word under the given signedness.
    pub fn decode_with(&self, signedness: Signedness) -> i128 {
        match signedness {
            Signedness::Signed => i128::from(self.decode()),
            Signedness::Unsigned => i128::from(self.decode_unsigned()),
        }
    }

    /// Raw bit pattern, LSB in bit 0 of the integer.
    pub const fn val(&self) -> u64 {
        self.bits
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Bit at `index`, counting from the MSB.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub const fn bit(&self, index: u32) -> bool {
        assert!(index < self.width, "bit index out of range");
        (self.bits >> (self.width - 1 - index)) & 1 == 1
    }

    pub const fn msb(&self) -> bool {
        self.bit(0)
    }

    pub const fn lsb(&self) -> bool {
        self.bits & 1 == 1
    }

    /// Copy of the word with its LSB replaced by `bit`.
    #[must_use]
    pub const fn with_lsb(&self, bit: bool) -> Self {
        Self {
            bits: (self.bits & !1) | bit as u64,
            width: self.width,
        }
    }

    /// Bits from MSB to LSB.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.width).map(move |index| self.bit(index))
    }

    /// Ripple-carry addition modulo `2^width`.
    #[must_use]
    pub fn add(&self, rhs: &Self) -> Self {
        self.overflowing_add(rhs).0
    }

    /// Ripple-carry addition, also reporting the carry out of the MSB and
    /// signed overflow.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the widths differ.
    pub fn overflowing_add(&self, rhs: &Self) -> (Self, Flags) {
        debug_assert_eq!(self.width, rhs.width, "operand widths differ");
        let mut sum = 0u64;
        let mut carry = false;
        let mut carry_into_msb = false;
        for position in 0..self.width {
            let x = (self.bits >> position) & 1 == 1;
            let y = (rhs.bits >> position) & 1 == 1;
            if position == self.width - 1 {
                carry_into_msb = carry;
            }
            sum |= u64::from(x ^ y ^ carry) << position;
            carry = (x && y) || (carry && (x ^ y));
        }

        let flags = Flags {
            carry,
            overflow: carry_into_msb != carry,
        };
        (Self::from_raw(sum, self.width), flags)
    }

    /// Subtraction computed as `self + negate(rhs)`.
    #[must_use]
    pub fn subtract(&self, rhs: &Self) -> Self {
        self.add(&rhs.negate())
    }

    /// Subtraction, also reporting the unsigned borrow and signed overflow.
    ///
    /// Overflow is derived from the operand signs rather than from the
    /// addition of the negated operand, since negating the most negative
    /// value is itself an overflow.
    pub fn overflowing_sub(&self, rhs: &Self) -> (Self, Flags) {
        let difference = self.subtract(rhs);
        let flags = Flags {
            carry: self.bits < rhs.bits,
            overflow: self.msb() != rhs.msb() && difference.msb() != self.msb(),
        };
        (difference, flags)
    }

    /// Two's-complement negation: invert every bit, then add one.
    #[must_use]
    pub fn negate(&self) -> Self {
        (!*self).add(&Self::from_raw(1, self.width))
    }

    /// Shifts right by one. The vacated MSB takes `bit_in`; the bit leaving
    /// the LSB is returned alongside the new word.
    pub const fn shift_right(&self, bit_in: bool) -> (Self, bool) {
        let bits = (self.bits >> 1) | ((bit_in as u64) << (self.width - 1));
        (Self::from_raw(bits, self.width), self.lsb())
    }

    /// Arithmetic right shift: the sign bit is duplicated into the MSB.
    pub const fn arithmetic_shift_right(&self) -> (Self, bool) {
        self.shift_right(self.msb())
    }

    /// Shifts left by one. The vacated LSB takes `bit_in`; the bit leaving
    /// the MSB is returned alongside the new word.
    pub const fn shift_left(&self, bit_in: bool) -> (Self, bool) {
        let bits = (self.bits << 1) | bit_in as u64;
        (Self::from_raw(bits, self.width), self.msb())
    }

    /// Joins `high` and `low` into one word, `high` supplying the MSBs.
    ///
    /// # Panics
    ///
    /// Panics if the combined width exceeds [`MAX_WIDTH`].
    pub fn concat(high: &Self, low: &Self) -> Self {
        let width = high.width + low.width;
        assert!(width <= MAX_WIDTH, "concatenated width {width} exceeds {MAX_WIDTH}");
        Self::from_raw((high.bits << low.width) | low.bits, width)
    }

    /// Widens the word, copying the sign bit into the new MSBs.
    ///
    /// # Panics
    ///
    /// Panics if `width` is narrower than the word or wider than
    /// [`MAX_WIDTH`].
    #[must_use]
    pub fn sign_extend(&self, width: u32) -> Self {
        assert!(
            width >= self.width && width <= MAX_WIDTH,
            "cannot sign-extend {} bits to {width}",
            self.width
        );
        let fill = if self.msb() {
            mask(width) & !mask(self.width)
        } else {
            0
        };
        Self::from_raw(self.bits | fill, width)
    }

    /// Widens the word with zero MSBs.
    ///
    /// # Panics
    ///
    /// Panics if `width` is narrower than the word or wider than
    /// [`MAX_WIDTH`].
    #[must_use]
    pub fn zero_extend(&self, width: u32) -> Self {
        assert!(
            width >= self.width && width <= MAX_WIDTH,
            "cannot zero-extend {} bits to {width}",
            self.width
        );
        Self::from_raw(self.bits, width)
    }

    /// Keeps the `width` least significant bits.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or wider than the word.
    #[must_use]
    pub fn truncate(&self, width: u32) -> Self {
        assert!(
            width > 0 && width <= self.width,
            "cannot truncate {} bits to {width}",
            self.width
        );
        Self::from_raw(self.bits, width)
    }
}

impl Not for BinaryWord {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::from_raw(!self.bits, self.width)
    }
}

impl fmt::Display for BinaryWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BinaryWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BinaryWord(0b{self})")
    }
}

impl FromStr for BinaryWord {
    type Err = WordError;

    /// Parses a string of `'0'`/`'1'` characters, MSB first. The word is as
    /// wide as the string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || WordError::Malformed(s.to_string());
        let width = u32::try_from(s.len()).map_err(|_| malformed())?;
        if width == 0 || width > MAX_WIDTH {
            return Err(malformed());
        }

        let mut bits = 0u64;
        for c in s.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                _ => return Err(malformed()),
            };
            bits = (bits << 1) | bit;
        }
        Ok(Self::from_raw(bits, width))
    }
}

impl Serialize for BinaryWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BinaryWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
