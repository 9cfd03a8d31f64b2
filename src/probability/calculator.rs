use serde::{Deserialize, Serialize};

use crate::rotation::FrontRow;
use crate::stats::{Ledger, Rotation};

/// Percent share of the next set for each front-row player, in front-row order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution([u8; 3]);

/// Used when none of the three players has any recorded event
pub const DEFAULT_DISTRIBUTION: Distribution = Distribution([33, 33, 34]);

impl Distribution {
    pub fn shares(&self) -> [u8; 3] {
        self.0
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&share| u32::from(share)).sum()
    }

    /// Floors the first two shares; the third takes whatever is left so the
    /// result always sums to 100. The last-listed player wins rounding ties.
    pub fn from_counts(counts: [u64; 3]) -> Self {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return DEFAULT_DISTRIBUTION;
        }

        let first = percent_floor(counts[0], total);
        let second = percent_floor(counts[1], total);
        Self([first, second, 100 - first - second])
    }
}

impl Default for Distribution {
    fn default() -> Self {
        DEFAULT_DISTRIBUTION
    }
}

fn percent_floor(count: u64, total: u64) -> u8 {
    // count <= total, so the quotient is at most 100
    (count * 100 / total) as u8
}

/// Share of recorded events (kills + errors + attempts) for the given front row
pub fn distribution(ledger: &Ledger, rotation: Rotation, front_row: &FrontRow) -> Distribution {
    let counts = front_row
        .players()
        .each_ref()
        .map(|player| ledger.event_count(rotation, player));
    Distribution::from_counts(counts)
}
