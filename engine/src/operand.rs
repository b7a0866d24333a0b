//! Operand parsing and validation at the engine boundary.
//!
//! Text operands are parsed here and checked against the bit width before
//! any register is touched, so errors never reach the step loop.

use std::{num::IntErrorKind, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::{
    error::{EngineError, FormatIssue, Result, WordError},
    width::BitWidth,
    word::{BinaryWord, Signedness},
};

/// Which operand of an algorithm a value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OperandRole {
    Multiplicand,
    Multiplier,
    Dividend,
    Divisor,
}

/// An operand as typed by the user.
///
/// Decimal text such as `-12` or `+7` is read as an integer. Text starting
/// with `0b` is a binary literal: it is zero-extended to the register width
/// and then read with the signedness of the algorithm, so `0b1100` is `-4`
/// for a 4-bit multiplication and `12` for a 4-bit division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Decimal(i64),
    Binary(BinaryWord),
    /// A decimal integer too large for 64 bits. It resolves to a range error.
    Oversized(String),
}

impl Operand {
    /// Decimal value of the operand for a register of `width` bits.
    pub fn resolve(
        self,
        role: OperandRole,
        width: BitWidth,
        signedness: Signedness,
    ) -> Result<i64> {
        match self {
            Self::Decimal(value) => Ok(value),
            Self::Binary(literal) => {
                if literal.width() > width.bits() {
                    return Err(EngineError::Range {
                        operand: role,
                        source: WordError::TooManyDigits {
                            digits: literal.width(),
                            width: width.bits(),
                        },
                    });
                }
                // At most 32 bits, so the value always fits an i64.
                Ok(literal.zero_extend(width.bits()).decode_with(signedness) as i64)
            }
            Self::Oversized(text) => Err(EngineError::Range {
                operand: role,
                source: WordError::DecimalOverflow {
                    text,
                    width: width.bits(),
                    signedness,
                },
            }),
        }
    }
}

impl FromStr for Operand {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |issue| EngineError::InvalidFormat {
            input: s.to_string(),
            issue,
        };

        let text = s.trim();
        if text.is_empty() {
            return Err(invalid(FormatIssue::Empty));
        }
        if let Some(digits) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
            return digits
                .parse::<BinaryWord>()
                .map(Self::Binary)
                .map_err(|_| invalid(FormatIssue::NotBinary));
        }
        match text.parse::<i64>() {
            Ok(value) => Ok(Self::Decimal(value)),
            Err(err) => match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    Ok(Self::Oversized(text.to_string()))
                }
                _ => Err(invalid(FormatIssue::NotAnInteger)),
            },
        }
    }
}

/// Encodes one operand, attributing a range failure to `role`.
pub(crate) fn encode_operand(
    role: OperandRole,
    value: i64,
    width: BitWidth,
    signedness: Signedness,
) -> Result<BinaryWord> {
    BinaryWord::encode_with(value, width.bits(), signedness)
        .map_err(|source| EngineError::Range {
            operand: role,
            source,
        })
}

/// Validated, encoded operands of a division.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DivisionOperands {
    pub(crate) dividend: BinaryWord,
    pub(crate) divisor: BinaryWord,
}

/// Checks and encodes division operands as unsigned words.
///
/// A zero divisor is reported before either range is checked.
pub(crate) fn encode_division_operands(
    dividend: i64,
    divisor: i64,
    width: BitWidth,
) -> Result<DivisionOperands> {
    if divisor == 0 {
        return Err(EngineError::DivideByZero);
    }
    Ok(DivisionOperands {
        dividend: encode_operand(OperandRole::Dividend, dividend, width, Signedness::Unsigned)?,
        divisor: encode_operand(OperandRole::Divisor, divisor, width, Signedness::Unsigned)?,
    })
}
