//! Alpha/beta/gamma criterion.
//!
//! Three independent gates, all of which must hold before a phase closes:
//!
//! - **alpha**: total stake is at least `alpha` times the phase bounty;
//! - **beta**: the leading side holds at least `beta` of the total stake;
//! - **gamma**: at least `gamma` distinct wallets have staked.
//!
//! Alpha and beta are measured in tokens and feed [`CriterionStrategy::delta_amount`].
//! Gamma counts wallets and can only be satisfied by new stakers, so its
//! delta is reported separately by [`TriCriterion::gamma_delta`].

use crate::{CriterionStrategy, PhaseTally};
use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use verity_types::{Amount, Fraction, Status, PARTS_PER};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriCriterion {
    pub alpha: u64,
    pub beta: Fraction,
    pub gamma: u64,
}

impl TriCriterion {
    pub fn new(alpha: u64, beta: Fraction, gamma: u64) -> Self {
        Self { alpha, beta, gamma }
    }

    fn alpha_target(&self, tally: &PhaseTally) -> Amount {
        tally
            .bounty_amount
            .checked_mul(Amount::from(self.alpha))
            .unwrap_or(Amount::MAX)
    }

    pub fn alpha_met(&self, tally: &PhaseTally) -> bool {
        tally.total() >= self.alpha_target(tally)
    }

    pub fn alpha_delta(&self, tally: &PhaseTally) -> Amount {
        self.alpha_target(tally).saturating_sub(tally.total())
    }

    /// `max(true, false) / total >= beta`, false while nothing is staked.
    pub fn beta_met(&self, tally: &PhaseTally) -> bool {
        let total = tally.total();
        if total.is_zero() {
            return false;
        }
        let leading = tally.true_stake.max(tally.false_stake);
        let lhs = leading.raw().full_mul(U256::from(PARTS_PER));
        let rhs = self.beta.as_amount().raw().full_mul(total.raw());
        lhs >= rhs
    }

    /// Tokens `status` needs so that `(stake + d) / (total + d) >= beta`, truncated.
    ///
    /// With `beta == PARTS_PER` and any opposing stake the target is
    /// unreachable and the delta is `Amount::MAX`.
    pub fn beta_delta(&self, tally: &PhaseTally, status: Status) -> Amount {
        let wanted = self.beta.as_amount().raw().full_mul(tally.total().raw());
        let held = tally.stake(status).raw().full_mul(U256::from(PARTS_PER));
        if wanted <= held {
            return Amount::ZERO;
        }
        let denominator = PARTS_PER - self.beta.parts();
        if denominator == 0 {
            return Amount::MAX;
        }
        let delta: U512 = (wanted - held) / U512::from(denominator);
        U256::try_from(delta).map(Amount::new).unwrap_or(Amount::MAX)
    }

    pub fn gamma_met(&self, tally: &PhaseTally) -> bool {
        tally.number_of_wallets >= self.gamma
    }

    /// Distinct wallets still missing.
    pub fn gamma_delta(&self, tally: &PhaseTally) -> u64 {
        self.gamma.saturating_sub(tally.number_of_wallets)
    }
}

impl CriterionStrategy for TriCriterion {
    fn criteria_met(&self, tally: &PhaseTally) -> bool {
        self.alpha_met(tally) && self.beta_met(tally) && self.gamma_met(tally)
    }

    fn delta_amount(&self, tally: &PhaseTally, status: Status) -> Amount {
        self.alpha_delta(tally).max(self.beta_delta(tally, status))
    }
}
