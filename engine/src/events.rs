use crate::EngineAction;
use serde::{Deserialize, Serialize};
use verity_types::{Address, Amount, BlockNumber, Fraction, Status, VerificationStatus};

/// Events emitted by the engine, drained by the node after each transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    VerificationPhaseOpened {
        phase_number: u64,
        bounty_amount: Amount,
        start_block: BlockNumber,
    },
    VerificationPhaseClosed {
        phase_number: u64,
        verification_status: VerificationStatus,
        bounty_awarded: bool,
        end_block: BlockNumber,
    },
    Staked {
        wallet: Address,
        phase_number: u64,
        status: Status,
        amount: Amount,
    },
    Resolved {
        phase_number: u64,
    },
    BountyAllocatorSet {
        allocator: Address,
    },
    Staged {
        wallet: Address,
        amount: Amount,
    },
    PayoutStaged {
        wallet: Address,
        first_phase: u64,
        last_phase: u64,
        amount: Amount,
    },
    StakeStaged {
        wallet: Address,
        phase_number: u64,
        amount: Amount,
    },
    BountyStaged {
        wallet: Address,
        amount: Amount,
    },
    BountyWithdrawn {
        wallet: Address,
        amount: Amount,
    },
    Withdrawn {
        wallet: Address,
        amount: Amount,
    },
    Disabled {
        action: EngineAction,
    },
    Enabled {
        action: EngineAction,
    },
    Frozen,
    NextAmountSet {
        amount: Amount,
    },
    NextAlphaSet {
        alpha: u64,
    },
    NextBetaSet {
        beta: Fraction,
    },
    NextGammaSet {
        gamma: u64,
    },
}
