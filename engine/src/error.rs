//! Error types for the arithmetic engine.
//!
//! [`WordError`] is raised by the binary word substrate. [`EngineError`] is
//! what the run functions report: every variant is detected before the step
//! loop starts, so a failed run never produces a partial trace.

use num_enum::TryFromPrimitiveError;
use thiserror::Error;

use crate::{
    operand::OperandRole,
    width::BitWidth,
    word::{Signedness, MAX_WIDTH},
};

/// Errors raised while building or parsing a [`BinaryWord`](crate::BinaryWord).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// Word width outside `1..=64`.
    #[error("word width {0} is outside 1..={max}", max = MAX_WIDTH)]
    InvalidWidth(u32),

    /// Decimal value not representable in the requested width.
    #[error("{value} does not fit the {width}-bit {signedness} range [{min}, {max}]")]
    OutOfRange {
        value: i128,
        min: i128,
        max: i128,
        width: u32,
        signedness: Signedness,
    },

    /// Raw bit pattern wider than the requested width.
    #[error("bit pattern {bits:#b} does not fit in {width} bits")]
    BitsExceedWidth { bits: u64, width: u32 },

    /// Binary literal with more digits than the register holds.
    #[error("binary literal has {digits} digits but the register holds {width}")]
    TooManyDigits { digits: u32, width: u32 },

    /// Decimal text beyond the 64-bit integer range, and so beyond any
    /// register.
    #[error("{text} does not fit the {width}-bit {signedness} range")]
    DecimalOverflow {
        text: String,
        width: u32,
        signedness: Signedness,
    },

    /// Text that is not a string of `0` and `1` characters.
    #[error("{0:?} is not a bit string")]
    Malformed(String),
}

/// Why operand text could not be read as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatIssue {
    #[error("operand is empty")]
    Empty,
    #[error("not a decimal integer")]
    NotAnInteger,
    #[error("not a binary literal")]
    NotBinary,
}

/// Errors reported by the run functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An operand does not fit the range implied by the bit width.
    #[error("{operand} out of range: {source}")]
    Range {
        operand: OperandRole,
        #[source]
        source: WordError,
    },

    /// The divisor is zero.
    #[error("cannot divide by zero")]
    DivideByZero,

    /// Operand text is not a well-formed integer.
    #[error("invalid operand {input:?}: {issue}")]
    InvalidFormat { input: String, issue: FormatIssue },

    /// Bit width other than 4, 8, 16 or 32.
    #[error("unsupported bit width {0}, expected one of 4, 8, 16 or 32")]
    UnsupportedWidth(u32),
}

impl From<TryFromPrimitiveError<BitWidth>> for EngineError {
    fn from(err: TryFromPrimitiveError<BitWidth>) -> Self {
        Self::UnsupportedWidth(err.number)
    }
}

/// Result type for the arithmetic engine.
pub type Result<T> = std::result::Result<T, EngineError>;
