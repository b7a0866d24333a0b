//! Restoring division of unsigned integers.
//!
//! Registers: `A` (partial remainder), `Q` (dividend, then quotient) and `M`
//! (divisor). Each iteration shifts `[A, Q]` left, tentatively subtracts `M`
//! from `A`, and undoes the subtraction when it went negative.

use tracing::instrument;

use super::{drive, guard_note, Machine, StepContext};
use crate::{
    error::Result,
    operand::{encode_division_operands, DivisionOperands},
    outcome::DivisionOutcome,
    trace::{Action, Registers},
    width::BitWidth,
    word::BinaryWord,
};

/// Steps recorded per iteration: shift, subtract, then restore or keep.
const STEPS_PER_ITERATION: usize = 3;

pub(super) struct RestoringMachine {
    width: u32,
    /// Partial remainder with a guard bit on top.
    a: BinaryWord,
    q: BinaryWord,
    m: BinaryWord,
    m_extended: BinaryWord,
}

impl RestoringMachine {
    pub(super) fn new(operands: &DivisionOperands) -> Self {
        let width = operands.divisor.width();
        Self {
            width,
            a: BinaryWord::from_raw(0, width + 1),
            q: operands.dividend,
            m: operands.divisor,
            m_extended: operands.divisor.zero_extend(width + 1),
        }
    }

    pub(super) fn quotient(&self) -> BinaryWord {
        self.q
    }

    pub(super) fn remainder(&self) -> BinaryWord {
        self.a.truncate(self.width)
    }
}

impl Machine for RestoringMachine {
    fn registers(&self) -> Registers {
        Registers {
            a: self.remainder(),
            q: self.q,
            q_minus_1: None,
            m: self.m,
        }
    }

    fn iterate(&mut self, ctx: &mut StepContext) {
        let (q, q_out) = self.q.shift_left(false);
        let (a, _) = self.a.shift_left(q_out);
        self.q = q;
        self.a = a;
        ctx.record(
            Action::ShiftLeft,
            self.registers(),
            "Shift A and Q left by 1 bit. The MSB of Q moves into the LSB of A.",
        );

        let trial = self.a.subtract(&self.m_extended);
        let note = guard_note(&trial);
        ctx.record(
            Action::Subtract,
            Registers {
                a: trial.truncate(self.width),
                ..self.registers()
            },
            format!("Subtract the divisor from A.{note}"),
        );

        if trial.msb() {
            self.q = self.q.with_lsb(false);
            ctx.record(
                Action::Restore,
                self.registers(),
                format!(
                    "A - M is negative: restore A to its previous value and set Q[n-1] = 0.{note}"
                ),
            );
        } else {
            self.a = trial;
            self.q = self.q.with_lsb(true);
            ctx.record(
                Action::Keep,
                self.registers(),
                format!(
                    "A - M is not negative: keep the subtraction result and set Q[n-1] = 1.{note}"
                ),
            );
        }
    }
}

/// Divides `dividend` by `divisor` with restoring division.
///
/// Operands are unsigned: the dividend must lie in `[0, 2^width - 1]` and the
/// divisor in `[1, 2^width - 1]`. The trace holds `3 × width + 1` steps.
///
/// ```
/// use arithtrace_engine::{run_restoring_division, BitWidth};
///
/// let outcome = run_restoring_division(11, 3, BitWidth::W4).unwrap();
/// assert_eq!(outcome.quotient.to_string(), "0011");
/// assert_eq!(outcome.remainder.to_string(), "0010");
/// assert_eq!(outcome.steps.len(), 13);
/// ```
#[instrument(level = "debug")]
pub fn run_restoring_division(
    dividend: i64,
    divisor: i64,
    width: BitWidth,
) -> Result<DivisionOutcome> {
    let operands = encode_division_operands(dividend, divisor, width)?;

    let mut machine = RestoringMachine::new(&operands);
    let ctx = drive(
        &mut machine,
        width,
        STEPS_PER_ITERATION,
        "Initialize A to 0, Q to the dividend and M to the divisor.",
    );
    let (steps, stats) = ctx.finish();

    Ok(DivisionOutcome::new(
        operands,
        steps,
        None,
        machine.quotient(),
        machine.remainder(),
        machine.registers(),
        stats,
    ))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{operand::OperandRole, EngineError};

    #[test]
    fn test_eleven_by_three() {
        let outcome = run_restoring_division(11, 3, BitWidth::W4).unwrap();
        assert_eq!(outcome.dividend.to_string(), "1011");
        assert_eq!(outcome.divisor.to_string(), "0011");
        assert_eq!(outcome.quotient_decimal, 3);
        assert_eq!(outcome.remainder_decimal, 2);
        assert!(outcome.correction.is_none());

        let rows: Vec<(&str, String, String)> = outcome
            .steps
            .iter()
            .map(|step| {
                (
                    step.label(),
                    step.registers().a.to_string(),
                    step.registers().q.to_string(),
                )
            })
            .collect();
        let expected = [
            ("Initial values", "0000", "1011"),
            ("Left shift A,Q", "0001", "0110"),
            ("A = A - M", "1110", "0110"),
            ("Restore A, Q[n-1]=0", "0001", "0110"),
            ("Left shift A,Q", "0010", "1100"),
            ("A = A - M", "1111", "1100"),
            ("Restore A, Q[n-1]=0", "0010", "1100"),
            ("Left shift A,Q", "0101", "1000"),
            ("A = A - M", "0010", "1000"),
            ("Keep A, Q[n-1]=1", "0010", "1001"),
            ("Left shift A,Q", "0101", "0010"),
            ("A = A - M", "0010", "0010"),
            ("Keep A, Q[n-1]=1", "0010", "0011"),
        ];
        assert_eq!(rows.len(), expected.len());
        for (row, (label, a, q)) in rows.iter().zip(expected) {
            assert_eq!((row.0, row.1.as_str(), row.2.as_str()), (label, a, q));
        }
    }

    #[test]
    fn test_zero_difference_commits() {
        // 4 / 4: the last subtraction leaves exactly zero.
        let outcome = run_restoring_division(4, 4, BitWidth::W4).unwrap();
        assert_eq!(outcome.quotient_decimal, 1);
        assert_eq!(outcome.remainder_decimal, 0);
        assert_eq!(outcome.steps.last().unwrap().action(), Action::Keep);
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            run_restoring_division(5, 0, BitWidth::W8),
            Err(EngineError::DivideByZero)
        );
    }

    #[test]
    fn test_unsigned_ranges() {
        let err = run_restoring_division(-1, 3, BitWidth::W4).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Range {
                operand: OperandRole::Dividend,
                ..
            }
        ));
        let err = run_restoring_division(3, 16, BitWidth::W4).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Range {
                operand: OperandRole::Divisor,
                ..
            }
        ));
    }

    #[test]
    fn test_large_divisor() {
        // Divisors with the MSB set rely on the guard bit.
        let outcome = run_restoring_division(15, 12, BitWidth::W4).unwrap();
        assert_eq!(outcome.quotient_decimal, 1);
        assert_eq!(outcome.remainder_decimal, 3);

        let outcome = run_restoring_division(255, 255, BitWidth::W8).unwrap();
        assert_eq!(outcome.quotient_decimal, 1);
        assert_eq!(outcome.remainder_decimal, 0);
    }

    #[test]
    fn test_large_divisor_explains_guard_bit() {
        // 1 - 12 is -11: the visible four bits read 0101, the guard bit is 1.
        let outcome = run_restoring_division(15, 12, BitWidth::W4).unwrap();
        let subtract = &outcome.steps[2];
        assert_eq!(subtract.action(), Action::Subtract);
        assert_eq!(subtract.registers().a.to_string(), "0101");
        assert!(subtract.explanation().contains("needs one more bit"));
        assert!(subtract.explanation().ends_with("it is negative."));

        let restore = &outcome.steps[3];
        assert_eq!(restore.action(), Action::Restore);
        assert_eq!(restore.registers().a.to_string(), "0001");
        assert!(restore.explanation().ends_with("it is negative."));

        // Every subtraction whose visible MSB disagrees with the decision
        // carries the note.
        for iteration in 1..=4 {
            let steps = outcome.steps.iteration(iteration);
            let shown_negative = steps[1].registers().a.msb();
            let restored = steps[2].action() == Action::Restore;
            if shown_negative != restored {
                assert!(steps[1].explanation().contains("needs one more bit"));
                assert!(steps[2].explanation().contains("needs one more bit"));
            } else {
                assert!(!steps[1].explanation().contains("needs one more bit"));
            }
        }
    }

    #[test]
    fn test_exhaustive_4_bits() {
        for a in 0..=15 {
            for b in 1..=15 {
                let outcome = run_restoring_division(a, b, BitWidth::W4).unwrap();
                assert_eq!(outcome.quotient_decimal, (a / b) as u64, "{a} / {b}");
                assert_eq!(outcome.remainder_decimal, (a % b) as u64, "{a} % {b}");
            }
        }
    }

    #[test]
    fn test_trace_shape() {
        for width in BitWidth::iter() {
            let outcome = run_restoring_division(7, 2, width).unwrap();
            let n = width.bits() as usize;
            assert_eq!(outcome.steps.len(), 3 * n + 1);
            for iteration in 1..=n {
                let actions: Vec<Action> = outcome
                    .steps
                    .iteration(iteration)
                    .iter()
                    .map(|step| step.action())
                    .collect();
                assert_eq!(actions.len(), 3);
                assert_eq!(actions[0], Action::ShiftLeft);
                assert_eq!(actions[1], Action::Subtract);
                assert!(matches!(actions[2], Action::Restore | Action::Keep));
            }
        }
    }

    fn operands(width: BitWidth) -> impl Strategy<Value = (i64, i64, BitWidth)> {
        let max = (1i64 << width.bits()) - 1;
        (0..=max, 1..=max, Just(width))
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn test_quotient_and_remainder(
            (a, b, width) in prop_oneof![
                operands(BitWidth::W8),
                operands(BitWidth::W16),
                operands(BitWidth::W32),
            ]
        ) {
            let outcome = run_restoring_division(a, b, width).unwrap();
            prop_assert_eq!(outcome.quotient_decimal, (a / b) as u64);
            prop_assert_eq!(outcome.remainder_decimal, (a % b) as u64);
            prop_assert_eq!(
                outcome.quotient_decimal * b as u64 + outcome.remainder_decimal,
                a as u64
            );
        }
    }
}
