use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

use crate::word::Signedness;

/// Register widths the engine simulates.
///
/// Converts from a raw bit count with `BitWidth::try_from(8u32)`; any other
/// count is rejected.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumCount,
    EnumIter,
    TryFromPrimitive,
    IntoPrimitive,
    Serialize,
    Deserialize,
)]
#[repr(u32)]
#[serde(into = "u32", try_from = "u32")]
pub enum BitWidth {
    W4 = 4,
    #[default]
    W8 = 8,
    W16 = 16,
    W32 = 32,
}

impl BitWidth {
    /// Number of bits in each register.
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Inclusive decimal range of an operand under `signedness`.
    pub const fn range(self, signedness: Signedness) -> (i128, i128) {
        signedness.range(self.bits())
    }
}

impl fmt::Display for BitWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}
