//! Register-level simulations of the supported algorithms.
//!
//! Each algorithm is a [`Machine`]: a register set that knows how to perform
//! one loop iteration and report every micro-step of it. The shared driver
//! records the initial values, runs one iteration per register bit, and
//! hands back the finished [`Trace`].
//!
//! All machines carry one guard bit above the `A` register: `A` is held one
//! bit wider than the registers shown to the caller, and sign decisions read
//! that extra bit. It only differs from the visible MSB when the exact value
//! of `A` does not fit the register width.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, info, instrument, trace};

use crate::{
    error::Result,
    operand::{Operand, OperandRole},
    outcome::Outcome,
    stats::OperationStats,
    trace::{Action, Registers, Step, Trace},
    width::BitWidth,
    word::{BinaryWord, Signedness},
};

pub(crate) mod booth;
pub(crate) mod non_restoring;
pub(crate) mod restoring;

pub use booth::run_booth_multiplication;
pub use non_restoring::run_non_restoring_division;
pub use restoring::run_restoring_division;

/// The algorithms the engine can run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Booth,
    Restoring,
    NonRestoring,
}

impl Algorithm {
    /// How operands of this algorithm are read.
    pub const fn signedness(self) -> Signedness {
        match self {
            Self::Booth => Signedness::Signed,
            Self::Restoring | Self::NonRestoring => Signedness::Unsigned,
        }
    }

    /// Roles of the first and second operand.
    pub const fn operand_roles(self) -> [OperandRole; 2] {
        match self {
            Self::Booth => [OperandRole::Multiplicand, OperandRole::Multiplier],
            Self::Restoring | Self::NonRestoring => [OperandRole::Dividend, OperandRole::Divisor],
        }
    }
}

/// Parses two operands from text and runs `algorithm` on them.
///
/// Operands are decimal integers or `0b` binary literals; see [`Operand`].
///
/// ```
/// use arithtrace_engine::{run, Algorithm, BitWidth, Outcome};
///
/// let outcome = run(Algorithm::Booth, "0b0011", "-4", BitWidth::W4).unwrap();
/// let Outcome::Multiplication(product) = outcome else {
///     unreachable!()
/// };
/// assert_eq!(product.product_decimal, -12);
/// ```
#[instrument(level = "debug")]
pub fn run(algorithm: Algorithm, first: &str, second: &str, width: BitWidth) -> Result<Outcome> {
    let [first_role, second_role] = algorithm.operand_roles();
    let signedness = algorithm.signedness();
    let first = first
        .parse::<Operand>()?
        .resolve(first_role, width, signedness)?;
    let second = second
        .parse::<Operand>()?
        .resolve(second_role, width, signedness)?;
    info!(%algorithm, first, second, %width, "running");

    let outcome = match algorithm {
        Algorithm::Booth => {
            Outcome::Multiplication(run_booth_multiplication(first, second, width)?)
        }
        Algorithm::Restoring => Outcome::Division(run_restoring_division(first, second, width)?),
        Algorithm::NonRestoring => {
            Outcome::Division(run_non_restoring_division(first, second, width)?)
        }
    };
    Ok(outcome)
}

/// A register set driven one iteration at a time.
pub(crate) trait Machine {
    /// Registers as shown to the caller.
    fn registers(&self) -> Registers;

    /// Performs one iteration, recording each micro-step into `ctx`.
    fn iterate(&mut self, ctx: &mut StepContext);
}

/// Collects the steps of a run in order.
pub(crate) struct StepContext {
    trace: Trace,
    stats: OperationStats,
    iteration: usize,
}

impl StepContext {
    fn new(capacity: usize) -> Self {
        Self {
            trace: Trace::with_capacity(capacity),
            stats: OperationStats::default(),
            iteration: 0,
        }
    }

    fn make_step(&mut self, action: Action, registers: Registers, explanation: String) -> Step {
        let ordinal = self.trace.len();
        debug!(
            ordinal,
            iteration = self.iteration,
            %action,
            a = %registers.a,
            q = %registers.q,
            "step"
        );
        self.stats.record(action);
        Step::new(ordinal, self.iteration, action, registers, explanation)
    }

    /// Appends a step to the trace.
    pub(crate) fn record(
        &mut self,
        action: Action,
        registers: Registers,
        explanation: impl Into<String>,
    ) {
        let step = self.make_step(action, registers, explanation.into());
        self.trace.push(step);
    }

    /// Builds the step that would come next without appending it to the
    /// trace. Used for transitions reported beside the trace.
    pub(crate) fn detached(
        &mut self,
        action: Action,
        registers: Registers,
        explanation: impl Into<String>,
    ) -> Step {
        self.make_step(action, registers, explanation.into())
    }

    pub(crate) fn finish(self) -> (Trace, OperationStats) {
        (self.trace, self.stats)
    }
}

/// Records the initial registers, then runs one iteration per register bit.
pub(crate) fn drive<M: Machine>(
    machine: &mut M,
    width: BitWidth,
    steps_per_iteration: usize,
    explanation: &str,
) -> StepContext {
    let iterations = width.bits() as usize;
    let mut ctx = StepContext::new(1 + iterations * steps_per_iteration);
    ctx.record(Action::Initialize, machine.registers(), explanation);

    for iteration in 1..=iterations {
        ctx.iteration = iteration;
        machine.iterate(&mut ctx);
    }
    ctx
}

/// Explanation suffix for a guarded `A` whose exact value does not fit the
/// visible register. Empty when the guard bit matches the visible MSB.
pub(crate) fn guard_note(guarded: &BinaryWord) -> &'static str {
    if guarded.msb() == guarded.bit(1) {
        return "";
    }
    trace!(a = %guarded, "A exceeds the register width");
    if guarded.msb() {
        " The exact value of A needs one more bit than shown: it is negative."
    } else {
        " The exact value of A needs one more bit than shown: it is not negative."
    }
}

/// Formats a bit as `0` or `1`.
pub(crate) const fn bit_char(bit: bool) -> char {
    if bit {
        '1'
    } else {
        '0'
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{EngineError, FormatIssue, WordError};

    #[test]
    fn test_guard_note() {
        let fits: BinaryWord = "11101".parse().unwrap();
        assert_eq!(guard_note(&fits), "");
        let negative: BinaryWord = "10101".parse().unwrap();
        assert!(guard_note(&negative).ends_with("it is negative."));
        let positive: BinaryWord = "01000".parse().unwrap();
        assert!(guard_note(&positive).ends_with("it is not negative."));
    }

    #[test]
    fn test_algorithm_names() {
        for algorithm in Algorithm::iter() {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!(Algorithm::NonRestoring.to_string(), "non-restoring");
    }

    #[test]
    fn test_run_dispatch() {
        let outcome = run(Algorithm::Restoring, "11", "0b11", BitWidth::W4).unwrap();
        let Outcome::Division(division) = outcome else {
            panic!("expected a division");
        };
        assert_eq!(division.quotient_decimal, 3);
        assert_eq!(division.remainder_decimal, 2);

        let outcome = run(Algorithm::NonRestoring, "2", "3", BitWidth::W4).unwrap();
        assert!(outcome.correction().is_some());
        assert_eq!(outcome.steps().len(), 9);
    }

    #[test]
    fn test_binary_literal_follows_signedness() {
        let outcome = run(Algorithm::Booth, "0b1100", "1", BitWidth::W4).unwrap();
        let Outcome::Multiplication(product) = outcome else {
            panic!("expected a multiplication");
        };
        assert_eq!(product.product_decimal, -4);

        let outcome = run(Algorithm::Restoring, "0b1100", "1", BitWidth::W4).unwrap();
        let Outcome::Division(division) = outcome else {
            panic!("expected a division");
        };
        assert_eq!(division.quotient_decimal, 12);
    }

    #[test]
    fn test_run_errors() {
        assert_eq!(
            run(Algorithm::Booth, "", "1", BitWidth::W8),
            Err(EngineError::InvalidFormat {
                input: String::new(),
                issue: FormatIssue::Empty,
            })
        );
        assert_eq!(
            run(Algorithm::Restoring, "7", "0", BitWidth::W8),
            Err(EngineError::DivideByZero)
        );
        assert!(matches!(
            run(Algorithm::Booth, "99999999999999999999", "1", BitWidth::W8),
            Err(EngineError::Range {
                operand: OperandRole::Multiplicand,
                source: WordError::DecimalOverflow { .. },
            })
        ));
        assert!(matches!(
            run(Algorithm::Restoring, "4", "-99999999999999999999", BitWidth::W8),
            Err(EngineError::Range {
                operand: OperandRole::Divisor,
                ..
            })
        ));
        assert!(matches!(
            run(Algorithm::Booth, "1", "0b111111111", BitWidth::W8),
            Err(EngineError::Range {
                operand: OperandRole::Multiplier,
                source: WordError::TooManyDigits { .. },
            })
        ));
    }
}
