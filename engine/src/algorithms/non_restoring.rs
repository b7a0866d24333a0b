//! Non-restoring division of unsigned integers.
//!
//! Same registers as restoring division, plus a sign flag holding the sign of
//! the last addition or subtraction. A negative partial remainder is not
//! undone; instead the next iteration adds `M` rather than subtracting it.
//! If the remainder is still negative after the last iteration, a single
//! correction adds `M` back.

use tracing::instrument;

use super::{bit_char, drive, guard_note, Machine, StepContext};
use crate::{
    error::Result,
    operand::{encode_division_operands, DivisionOperands},
    outcome::DivisionOutcome,
    trace::{Action, Registers, Step},
    width::BitWidth,
    word::BinaryWord,
};

/// Steps recorded per iteration: shift, then add or subtract.
const STEPS_PER_ITERATION: usize = 2;

struct NonRestoringMachine {
    width: u32,
    /// Partial remainder with a guard bit on top.
    a: BinaryWord,
    q: BinaryWord,
    m: BinaryWord,
    m_extended: BinaryWord,
    /// Sign of the partial remainder after the last operation.
    negative: bool,
}

impl NonRestoringMachine {
    fn new(operands: &DivisionOperands) -> Self {
        let width = operands.divisor.width();
        Self {
            width,
            a: BinaryWord::from_raw(0, width + 1),
            q: operands.dividend,
            m: operands.divisor,
            m_extended: operands.divisor.zero_extend(width + 1),
            negative: false,
        }
    }

    fn remainder(&self) -> BinaryWord {
        self.a.truncate(self.width)
    }

    /// Final transition: a negative remainder gets `M` added back.
    ///
    /// Returns the correction step when one was needed. The step is numbered
    /// after the trace but is not part of it.
    fn correct(&mut self, ctx: &mut StepContext) -> Option<Step> {
        if !self.negative {
            return None;
        }

        self.a = self.a.add(&self.m_extended);
        self.negative = self.a.msb();
        debug_assert!(!self.negative, "corrected remainder is negative");
        Some(ctx.detached(
            Action::Correct,
            self.registers(),
            "The final remainder is negative: add the divisor back to A.",
        ))
    }
}

impl Machine for NonRestoringMachine {
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

        let was_negative = self.negative;
        let action = if was_negative {
            self.a = self.a.add(&self.m_extended);
            Action::Add
        } else {
            self.a = self.a.subtract(&self.m_extended);
            Action::Subtract
        };
        self.negative = self.a.msb();
        self.q = self.q.with_lsb(!self.negative);

        let (operation, sign) = if was_negative {
            ("add the divisor to A", "negative")
        } else {
            ("subtract the divisor from A", "not negative")
        };
        let outcome = if self.negative {
            "negative"
        } else {
            "not negative"
        };
        ctx.record(
            action,
            self.registers(),
            format!(
                "The previous remainder was {sign}: {operation}. The result is {outcome}, \
                 so Q[n-1] = {}.{}",
                bit_char(!self.negative),
                guard_note(&self.a)
            ),
        );
    }
}

/// Divides `dividend` by `divisor` with non-restoring division.
///
/// Same contract as [`run_restoring_division`](crate::run_restoring_division).
/// The trace holds `2 × width + 1` steps; the final remainder correction, if
/// any, is returned separately as `correction`.
///
/// ```
/// use arithtrace_engine::{run_non_restoring_division, BitWidth};
///
/// let outcome = run_non_restoring_division(11, 3, BitWidth::W4).unwrap();
/// assert_eq!(outcome.quotient_decimal, 3);
/// assert_eq!(outcome.remainder_decimal, 2);
/// assert_eq!(outcome.steps.len(), 9);
/// ```
#[instrument(level = "debug")]
pub fn run_non_restoring_division(
    dividend: i64,
    divisor: i64,
    width: BitWidth,
) -> Result<DivisionOutcome> {
    let operands = encode_division_operands(dividend, divisor, width)?;

    let mut machine = NonRestoringMachine::new(&operands);
    let mut ctx = drive(
        &mut machine,
        width,
        STEPS_PER_ITERATION,
        "Initialize A to 0, Q to the dividend and M to the divisor.",
    );
    let correction = machine.correct(&mut ctx);
    let (steps, stats) = ctx.finish();

    Ok(DivisionOutcome::new(
        operands,
        steps,
        correction,
        machine.q,
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
    use crate::{run_restoring_division, EngineError};

    #[test]
    fn test_eleven_by_three() {
        let outcome = run_non_restoring_division(11, 3, BitWidth::W4).unwrap();
        assert_eq!(outcome.quotient.to_string(), "0011");
        assert_eq!(outcome.remainder.to_string(), "0010");
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
            ("Left shift A,Q", "1100", "1100"),
            ("A = A + M", "1111", "1100"),
            ("Left shift A,Q", "1111", "1000"),
            ("A = A + M", "0010", "1001"),
            ("Left shift A,Q", "0101", "0010"),
            ("A = A - M", "0010", "0011"),
        ];
        assert_eq!(rows.len(), expected.len());
        for (row, (label, a, q)) in rows.iter().zip(expected) {
            assert_eq!((row.0, row.1.as_str(), row.2.as_str()), (label, a, q));
        }
    }

    #[test]
    fn test_correction_step() {
        // 2 / 3: every operation after the first shift leaves A negative, so
        // the remainder must be corrected.
        let outcome = run_non_restoring_division(2, 3, BitWidth::W4).unwrap();
        assert_eq!(outcome.quotient_decimal, 0);
        assert_eq!(outcome.remainder_decimal, 2);
        assert_eq!(outcome.steps.len(), 9);

        let correction = outcome.correction.as_ref().unwrap();
        assert_eq!(correction.action(), Action::Correct);
        assert_eq!(correction.ordinal(), 9);
        assert_eq!(correction.registers().a.to_string(), "0010");
        assert_eq!(outcome.registers.a.to_string(), "0010");
        // Before the correction, A held the negative remainder -1.
        assert_eq!(outcome.steps[8].registers().a.to_string(), "1111");
        assert_eq!(outcome.stats.count(Action::Correct), 1);
        assert_eq!(outcome.stats.total(), outcome.steps.len() + 1);
    }

    #[test]
    fn test_no_correction_for_exact_division() {
        let outcome = run_non_restoring_division(12, 4, BitWidth::W8).unwrap();
        assert_eq!(outcome.quotient_decimal, 3);
        assert_eq!(outcome.remainder_decimal, 0);
        assert!(outcome.correction.is_none());
        assert_eq!(outcome.stats.count(Action::Correct), 0);
    }

    #[test]
    fn test_large_divisor_explains_guard_bit() {
        let outcome = run_non_restoring_division(15, 12, BitWidth::W4).unwrap();
        assert_eq!(outcome.quotient_decimal, 1);
        assert_eq!(outcome.remainder_decimal, 3);

        // 1 - 12 = -11 shows as 0101.
        let subtract = &outcome.steps[2];
        assert_eq!(subtract.action(), Action::Subtract);
        assert_eq!(subtract.registers().a.to_string(), "0101");
        assert!(subtract.explanation().contains("The result is negative"));
        assert!(subtract.explanation().ends_with("it is negative."));

        // 2 × -11 + 1 + 12 = -9 shows as 0111.
        let add = &outcome.steps[4];
        assert_eq!(add.action(), Action::Add);
        assert_eq!(add.registers().a.to_string(), "0111");
        assert!(add.explanation().contains("The result is negative"));
        assert!(add.explanation().ends_with("it is negative."));

        // 2 × -9 + 1 + 12 = -5 shows as 1011 and needs no note.
        let add = &outcome.steps[6];
        assert_eq!(add.registers().a.to_string(), "1011");
        assert!(!add.explanation().contains("needs one more bit"));

        for step in outcome.steps.iter().filter(|step| step.iteration() > 0) {
            if matches!(step.action(), Action::Add | Action::Subtract) {
                let negative = step.explanation().contains("The result is negative");
                assert_eq!(
                    negative != step.registers().a.msb(),
                    step.explanation().contains("needs one more bit"),
                    "step {}",
                    step.ordinal()
                );
            }
        }
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(
            run_non_restoring_division(0, 0, BitWidth::W4),
            Err(EngineError::DivideByZero)
        );
    }

    #[test]
    fn test_exhaustive_4_bits_agrees_with_restoring() {
        for a in 0..=15 {
            for b in 1..=15 {
                let fast = run_non_restoring_division(a, b, BitWidth::W4).unwrap();
                let slow = run_restoring_division(a, b, BitWidth::W4).unwrap();
                assert_eq!(fast.quotient, slow.quotient, "{a} / {b}");
                assert_eq!(fast.remainder, slow.remainder, "{a} % {b}");
                assert_eq!(fast.quotient_decimal, (a / b) as u64);
            }
        }
    }

    #[test]
    fn test_trace_shape() {
        for width in BitWidth::iter() {
            let outcome = run_non_restoring_division(100, 7, width).unwrap();
            let n = width.bits() as usize;
            assert_eq!(outcome.steps.len(), 2 * n + 1);
            for iteration in 1..=n {
                let steps = outcome.steps.iteration(iteration);
                assert_eq!(steps.len(), 2);
                assert_eq!(steps[0].action(), Action::ShiftLeft);
                assert!(matches!(steps[1].action(), Action::Add | Action::Subtract));
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
        fn test_agrees_with_restoring(
            (a, b, width) in prop_oneof![
                operands(BitWidth::W8),
                operands(BitWidth::W16),
                operands(BitWidth::W32),
            ]
        ) {
            let fast = run_non_restoring_division(a, b, width).unwrap();
            let slow = run_restoring_division(a, b, width).unwrap();
            prop_assert_eq!(fast.quotient_decimal, (a / b) as u64);
            prop_assert_eq!(fast.remainder_decimal, (a % b) as u64);
            prop_assert_eq!(fast.quotient, slow.quotient);
            prop_assert_eq!(fast.remainder, slow.remainder);
        }
    }
}
