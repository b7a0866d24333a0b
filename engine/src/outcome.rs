//! Results of a run.

use serde::Serialize;

use crate::{
    operand::DivisionOperands,
    stats::OperationStats,
    trace::{Registers, Step, Trace},
    word::BinaryWord,
};

/// Result of a Booth multiplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiplicationOutcome {
    pub multiplicand: BinaryWord,
    pub multiplier: BinaryWord,
    pub steps: Trace,
    /// Final registers.
    pub registers: Registers,
    /// `[A, Q]` as one word, twice the run width.
    pub product: BinaryWord,
    pub product_decimal: i64,
    pub stats: OperationStats,
}

/// Result of a restoring or non-restoring division.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DivisionOutcome {
    pub dividend: BinaryWord,
    pub divisor: BinaryWord,
    pub steps: Trace,
    /// Final remainder correction of non-restoring division, numbered after
    /// the last step of `steps`. Always `None` for restoring division.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correction: Option<Step>,
    /// Final registers, after any correction.
    pub registers: Registers,
    pub quotient: BinaryWord,
    pub quotient_decimal: u64,
    pub remainder: BinaryWord,
    pub remainder_decimal: u64,
    pub stats: OperationStats,
}

impl DivisionOutcome {
    pub(crate) fn new(
        operands: DivisionOperands,
        steps: Trace,
        correction: Option<Step>,
        quotient: BinaryWord,
        remainder: BinaryWord,
        registers: Registers,
        stats: OperationStats,
    ) -> Self {
        Self {
            dividend: operands.dividend,
            divisor: operands.divisor,
            steps,
            correction,
            registers,
            quotient,
            quotient_decimal: quotient.decode_unsigned(),
            remainder,
            remainder_decimal: remainder.decode_unsigned(),
            stats,
        }
    }
}

/// Result of any algorithm, as returned by [`run`](crate::run).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Multiplication(MultiplicationOutcome),
    Division(DivisionOutcome),
}

impl Outcome {
    pub fn steps(&self) -> &Trace {
        match self {
            Self::Multiplication(outcome) => &outcome.steps,
            Self::Division(outcome) => &outcome.steps,
        }
    }

    pub fn stats(&self) -> &OperationStats {
        match self {
            Self::Multiplication(outcome) => &outcome.stats,
            Self::Division(outcome) => &outcome.stats,
        }
    }

    pub fn registers(&self) -> &Registers {
        match self {
            Self::Multiplication(outcome) => &outcome.registers,
            Self::Division(outcome) => &outcome.registers,
        }
    }

    /// The step reported after the trace, if any.
    pub fn correction(&self) -> Option<&Step> {
        match self {
            Self::Multiplication(_) => None,
            Self::Division(outcome) => outcome.correction.as_ref(),
        }
    }
}
