//! Bit-level simulation of Booth multiplication and binary division.
//!
//! The engine runs an algorithm over fixed-width registers and records every
//! register mutation as a [`Step`]. A run returns the final result together
//! with the full [`Trace`], so a front end can replay the computation one
//! micro-step at a time.
//!
//! ```
//! use arithtrace_engine::{run_restoring_division, BitWidth};
//!
//! let outcome = run_restoring_division(11, 3, BitWidth::W4).unwrap();
//! for step in &outcome.steps {
//!     let registers = step.registers();
//!     println!("{:>2} {:<22} A={} Q={}", step.ordinal(), step.label(), registers.a, registers.q);
//! }
//! assert_eq!((outcome.quotient_decimal, outcome.remainder_decimal), (3, 2));
//! ```

pub mod algorithms;
pub mod error;
pub mod operand;
pub mod outcome;
pub mod stats;
pub mod trace;
pub mod width;
pub mod word;

pub use algorithms::{
    run, run_booth_multiplication, run_non_restoring_division, run_restoring_division, Algorithm,
};
pub use error::{EngineError, FormatIssue, Result, WordError};
pub use operand::{Operand, OperandRole};
pub use outcome::{DivisionOutcome, MultiplicationOutcome, Outcome};
pub use stats::OperationStats;
pub use trace::{Action, Registers, Step, Trace};
pub use width::BitWidth;
pub use word::{BinaryWord, Flags, Signedness, MAX_WIDTH};
