use thiserror::Error;
use verity_bounty::BountyError;
use verity_engine::EngineError;
use verity_rbac::RbacError;
use verity_types::{Address, Timestamp};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OperatorError {
    #[error("operator is frozen")]
    Frozen,

    #[error("timeout {timeout}s is below the minimum of {minimum}s")]
    TimeoutTooShort { timeout: u64, minimum: u64 },

    #[error("disablement timer already running for {0}")]
    TimerAlreadyArmed(Address),

    #[error("no disablement timer for {0}")]
    NoTimer(Address),

    #[error("disablement timer for {engine} expires at {expires_at}")]
    TimerNotExpired { engine: Address, expires_at: Timestamp },

    #[error("engine {0} is already disabled")]
    AlreadyDisabled(Address),

    #[error("engine {0} must have RESOLVE disabled first")]
    ResolveNotDisabled(Address),

    #[error("fund is bound to {actual:?}, expected {expected}")]
    FundMismatch {
        expected: Address,
        actual: Option<Address>,
    },

    #[error(transparent)]
    Rbac(#[from] RbacError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Bounty(#[from] BountyError),
}
