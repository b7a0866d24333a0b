//! Step records and the ordered trace of a run.
//!
//! Every register mutation performed by an algorithm is recorded as a
//! [`Step`], which captures the action taken, a snapshot of the registers
//! after it, and a human-readable explanation. Steps are appended in
//! execution order into a [`Trace`]; the trace is handed to the caller by
//! value and never changes afterwards.

use std::{ops::Index, slice, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

use crate::word::BinaryWord;

/// The kind of micro-step a [`Step`] records. Its string form is the label
/// shown to the user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
pub enum Action {
    #[strum(serialize = "Initial values")]
    Initialize,
    #[strum(serialize = "A = A + M")]
    Add,
    #[strum(serialize = "A = A - M")]
    Subtract,
    #[strum(serialize = "No operation")]
    NoOperation,
    #[strum(serialize = "Arithmetic right shift")]
    ArithmeticShiftRight,
    #[strum(serialize = "Left shift A,Q")]
    ShiftLeft,
    #[strum(serialize = "Restore A, Q[n-1]=0")]
    Restore,
    #[strum(serialize = "Keep A, Q[n-1]=1")]
    Keep,
    #[strum(serialize = "Correct remainder, A = A + M")]
    Correct,
}

impl Action {
    /// The label of this action.
    pub fn label(self) -> &'static str {
        self.into()
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Action::from_str(&label).map_err(|_| de::Error::custom(format!("unknown action {label:?}")))
    }
}

/// Register snapshot attached to each step.
///
/// `Q-1` is only present for Booth multiplication. Every register is
/// serialized as a bit string, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registers {
    #[serde(rename = "A")]
    pub a: BinaryWord,
    #[serde(rename = "Q")]
    pub q: BinaryWord,
    #[serde(rename = "Q-1", default, skip_serializing_if = "Option::is_none")]
    pub q_minus_1: Option<BinaryWord>,
    #[serde(rename = "M")]
    pub m: BinaryWord,
}

/// One immutable entry of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    ordinal: usize,
    iteration: usize,
    action: Action,
    registers: Registers,
    explanation: String,
}

impl Step {
    pub(crate) fn new(
        ordinal: usize,
        iteration: usize,
        action: Action,
        registers: Registers,
        explanation: String,
    ) -> Self {
        Self {
            ordinal,
            iteration,
            action,
            registers,
            explanation,
        }
    }

    /// Position of the step in execution order, starting at 0.
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Loop iteration the step belongs to; 0 for the initial values.
    pub const fn iteration(&self) -> usize {
        self.iteration
    }

    pub const fn action(&self) -> Action {
        self.action
    }

    pub fn label(&self) -> &'static str {
        self.action.label()
    }

    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

/// Ordered, append-only sequence of steps produced by one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, step: Step) {
        debug_assert_eq!(step.ordinal, self.steps.len(), "steps out of order");
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn iter(&self) -> slice::Iter<'_, Step> {
        self.steps.iter()
    }

    /// Step with the given ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&Step> {
        self.steps.get(ordinal)
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Steps recorded during `iteration`, in order. Iteration 0 holds the
    /// initial values only.
    pub fn iteration(&self, iteration: usize) -> &[Step] {
        let start = self.steps.partition_point(|step| step.iteration < iteration);
        let end = self.steps.partition_point(|step| step.iteration <= iteration);
        &self.steps[start..end]
    }
}

impl Index<usize> for Trace {
    type Output = Step;

    fn index(&self, ordinal: usize) -> &Self::Output {
        &self.steps[ordinal]
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
