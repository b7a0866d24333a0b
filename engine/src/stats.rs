use serde::{ser::SerializeMap, Serialize, Serializer};
use strum::{EnumCount, IntoEnumIterator};

use crate::trace::Action;

/// Per-action step counts of one run.
///
/// Booth's algorithm exists to skip additions on runs of equal multiplier
/// bits; comparing [`arithmetic_operations`](Self::arithmetic_operations)
/// against the bit width shows how many it saved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationStats {
    counts: [usize; Action::COUNT],
}

impl OperationStats {
    pub(crate) fn record(&mut self, action: Action) {
        self.counts[action as usize] += 1;
    }

    /// Number of recorded steps with the given action.
    pub const fn count(&self, action: Action) -> usize {
        self.counts[action as usize]
    }

    /// Additions and subtractions, including a final correction.
    pub const fn arithmetic_operations(&self) -> usize {
        self.count(Action::Add) + self.count(Action::Subtract) + self.count(Action::Correct)
    }

    pub const fn shifts(&self) -> usize {
        self.count(Action::ArithmeticShiftRight) + self.count(Action::ShiftLeft)
    }

    pub const fn total(&self) -> usize {
        let mut total = 0;
        let mut index = 0;
        while index < Action::COUNT {
            total += self.counts[index];
            index += 1;
        }
        total
    }

    /// Actions that occurred at least once, with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (Action, usize)> + '_ {
        Action::iter()
            .map(|action| (action, self.count(action)))
            .filter(|&(_, count)| count > 0)
    }
}

impl Serialize for OperationStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (action, count) in self.iter() {
            map.serialize_entry(action.label(), &count)?;
        }
        map.end()
    }
}
