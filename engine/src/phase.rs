//! Phase records and stake metrics.

use serde::{Deserialize, Serialize};
use verity_criteria::PhaseTally;
use verity_types::{Amount, BlockNumber, Status, VerificationStatus};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseState {
    #[default]
    Unopened,
    Opened,
    Closed,
}

/// Running stake sums on each side.
///
/// Kept per (phase, wallet), per wallet across phases, and per block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeMetrics {
    pub true_stake_amount: Amount,
    pub false_stake_amount: Amount,
}

impl StakeMetrics {
    pub fn stake(&self, status: Status) -> Amount {
        match status {
            Status::True => self.true_stake_amount,
            Status::False => self.false_stake_amount,
        }
    }

    pub fn stake_amount(&self) -> Amount {
        self.true_stake_amount.saturating_add(self.false_stake_amount)
    }

    pub(crate) fn add(&mut self, status: Status, amount: Amount) -> Option<()> {
        let slot = match status {
            Status::True => &mut self.true_stake_amount,
            Status::False => &mut self.false_stake_amount,
        };
        *slot = slot.checked_add(amount)?;
        Some(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationPhase {
    pub number: u64,
    pub state: PhaseState,
    pub stakes: StakeMetrics,
    pub number_of_wallets: u64,
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
    /// Fixed when the phase opens.
    pub bounty_amount: Amount,
    pub bounty_awarded: bool,
    /// Set once, when the phase closes.
    pub verification_status: VerificationStatus,
}

impl VerificationPhase {
    pub(crate) fn open(number: u64, start_block: BlockNumber, bounty_amount: Amount) -> Self {
        Self {
            number,
            state: PhaseState::Opened,
            start_block,
            bounty_amount,
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == PhaseState::Opened
    }

    pub fn is_closed(&self) -> bool {
        self.state == PhaseState::Closed
    }

    pub fn tally(&self) -> PhaseTally {
        PhaseTally {
            true_stake: self.stakes.true_stake_amount,
            false_stake: self.stakes.false_stake_amount,
            number_of_wallets: self.number_of_wallets,
            bounty_amount: self.bounty_amount,
        }
    }

    /// The side holding strictly more stake wins `True`; ties resolve to `False`.
    pub fn leading_status(&self) -> Status {
        if self.stakes.true_stake_amount > self.stakes.false_stake_amount {
            Status::True
        } else {
            Status::False
        }
    }
}

/// Flattened view of a phase as returned by metrics queries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMetrics {
    pub state: PhaseState,
    pub true_stake_amount: Amount,
    pub false_stake_amount: Amount,
    pub stake_amount: Amount,
    pub number_of_wallets: u64,
    pub bounty_amount: Amount,
    pub bounty_awarded: bool,
    pub start_block: BlockNumber,
    pub end_block: BlockNumber,
    pub number_of_blocks: u64,
}

impl PhaseMetrics {
    /// `latest_block` bounds an open phase's block count.
    pub(crate) fn from_phase(phase: &VerificationPhase, latest_block: BlockNumber) -> Self {
        let last = if phase.is_closed() {
            phase.end_block
        } else {
            latest_block
        };
        Self {
            state: phase.state,
            true_stake_amount: phase.stakes.true_stake_amount,
            false_stake_amount: phase.stakes.false_stake_amount,
            stake_amount: phase.stakes.stake_amount(),
            number_of_wallets: phase.number_of_wallets,
            bounty_amount: phase.bounty_amount,
            bounty_awarded: phase.bounty_awarded,
            start_block: phase.start_block,
            end_block: phase.end_block,
            number_of_blocks: last.saturating_sub(phase.start_block),
        }
    }
}
