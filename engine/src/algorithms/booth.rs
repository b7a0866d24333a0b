//! Booth's signed multiplication.
//!
//! Registers: `A` (accumulator), `Q` (multiplier, then the low half of the
//! product), `Q₋₁` (the bit shifted out of `Q`) and `M` (multiplicand). Each
//! iteration inspects `(Q₀, Q₋₁)`, adds or subtracts `M` into `A`, then shifts
//! `[A, Q, Q₋₁]` right arithmetically as one register.

use tracing::instrument;

use super::{bit_char, drive, guard_note, Machine, StepContext};
use crate::{
    error::Result,
    operand::{encode_operand, OperandRole},
    outcome::MultiplicationOutcome,
    trace::{Action, Registers},
    width::BitWidth,
    word::{BinaryWord, Signedness},
};

/// Steps recorded per iteration: the operation, then the shift.
const STEPS_PER_ITERATION: usize = 2;

struct BoothMachine {
    width: u32,
    /// Accumulator with a guard bit on top.
    a: BinaryWord,
    q: BinaryWord,
    q_minus_1: bool,
    /// Multiplicand as entered.
    m: BinaryWord,
    /// Multiplicand sign-extended to the guarded accumulator.
    m_extended: BinaryWord,
}

impl BoothMachine {
    fn new(multiplicand: BinaryWord, multiplier: BinaryWord) -> Self {
        let width = multiplicand.width();
        Self {
            width,
            a: BinaryWord::from_raw(0, width + 1),
            q: multiplier,
            q_minus_1: false,
            m: multiplicand,
            m_extended: multiplicand.sign_extend(width + 1),
        }
    }

    fn visible_a(&self) -> BinaryWord {
        self.a.truncate(self.width)
    }

    /// The `2 × width`-bit product held in `[A, Q]`.
    fn product(&self) -> BinaryWord {
        BinaryWord::concat(&self.visible_a(), &self.q)
    }
}

impl Machine for BoothMachine {
    fn registers(&self) -> Registers {
        Registers {
            a: self.visible_a(),
            q: self.q,
            q_minus_1: Some(BinaryWord::from_bit(self.q_minus_1)),
            m: self.m,
        }
    }

    fn iterate(&mut self, ctx: &mut StepContext) {
        let q0 = self.q.lsb();
        let (action, explanation) = match (q0, self.q_minus_1) {
            (false, true) => {
                self.a = self.a.add(&self.m_extended);
                (
                    Action::Add,
                    format!(
                        "Q₀ = 0, Q₋₁ = 1: add the multiplicand to A.{}",
                        guard_note(&self.a)
                    ),
                )
            }
            (true, false) => {
                self.a = self.a.subtract(&self.m_extended);
                (
                    Action::Subtract,
                    format!(
                        "Q₀ = 1, Q₋₁ = 0: subtract the multiplicand from A.{}",
                        guard_note(&self.a)
                    ),
                )
            }
            (q0, q_minus_1) => (
                Action::NoOperation,
                format!(
                    "Q₀ = {}, Q₋₁ = {}: no arithmetic operation needed.",
                    bit_char(q0),
                    bit_char(q_minus_1)
                ),
            ),
        };
        ctx.record(action, self.registers(), explanation);

        // [A, Q, Q₋₁] shift as one register: A's LSB enters Q, Q's LSB
        // becomes Q₋₁.
        let (a, a_out) = self.a.arithmetic_shift_right();
        let (q, q_out) = self.q.shift_right(a_out);
        self.a = a;
        self.q = q;
        self.q_minus_1 = q_out;
        ctx.record(
            Action::ArithmeticShiftRight,
            self.registers(),
            "Arithmetic right shift of [A, Q, Q₋₁]: the sign of A is kept, \
             A's LSB moves into Q and Q's LSB into Q₋₁.",
        );
    }
}

/// Multiplies two signed integers with Booth's algorithm.
///
/// Both operands must fit the signed range of `width`. The trace holds
/// `2 × width + 1` steps and the product is a `2 × width`-bit word.
///
/// ```
/// use arithtrace_engine::{run_booth_multiplication, BitWidth};
///
/// let outcome = run_booth_multiplication(3, -4, BitWidth::W4).unwrap();
/// assert_eq!(outcome.product_decimal, -12);
/// assert_eq!(outcome.product.to_string(), "11110100");
/// assert_eq!(outcome.steps.len(), 9);
/// ```
#[instrument(level = "debug")]
pub fn run_booth_multiplication(
    multiplicand: i64,
    multiplier: i64,
    width: BitWidth,
) -> Result<MultiplicationOutcome> {
    let m = encode_operand(OperandRole::Multiplicand, multiplicand, width, Signedness::Signed)?;
    let q = encode_operand(OperandRole::Multiplier, multiplier, width, Signedness::Signed)?;

    let mut machine = BoothMachine::new(m, q);
    let ctx = drive(
        &mut machine,
        width,
        STEPS_PER_ITERATION,
        "Initialize A to 0, Q to the multiplier, Q₋₁ to 0 and M to the multiplicand.",
    );
    let (steps, stats) = ctx.finish();

    let product = machine.product();
    Ok(MultiplicationOutcome {
        multiplicand: m,
        multiplier: q,
        registers: machine.registers(),
        steps,
        product,
        product_decimal: product.decode(),
        stats,
    })
}
