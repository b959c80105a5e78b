//! Absolute threshold: the phase closes once either side reaches a fixed amount.

use crate::{CriterionStrategy, PhaseTally};
use serde::{Deserialize, Serialize};
use verity_types::{Amount, Status};

/// Default threshold used by deployments that do not override it.
pub const DEFAULT_CRITERION_AMOUNT: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsoluteThreshold {
    #[serde(default = "default_amount")]
    pub amount: Amount,
}

fn default_amount() -> Amount {
    Amount::from(DEFAULT_CRITERION_AMOUNT)
}

impl AbsoluteThreshold {
    pub fn new(amount: Amount) -> Self {
        Self { amount }
    }
}

impl Default for AbsoluteThreshold {
    fn default() -> Self {
        Self::new(default_amount())
    }
}

impl CriterionStrategy for AbsoluteThreshold {
    fn criteria_met(&self, tally: &PhaseTally) -> bool {
        tally.true_stake >= self.amount || tally.false_stake >= self.amount
    }

    fn delta_amount(&self, tally: &PhaseTally, status: Status) -> Amount {
        self.amount.saturating_sub(tally.stake(status))
    }
}
