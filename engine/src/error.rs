use crate::EngineAction;
use thiserror::Error;
use verity_bounty::BountyError;
use verity_criteria::CriterionError;
use verity_rbac::RbacError;
use verity_token::TokenError;
use verity_types::{Address, Amount, TypesError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("engine already initialized")]
    AlreadyInitialized,

    #[error("engine not initialized")]
    NotInitialized,

    #[error("bounty allocator not set")]
    AllocatorNotSet,

    #[error("engine is frozen")]
    Frozen,

    #[error("action {0} is disabled")]
    ActionDisabled(EngineAction),

    #[error("action {0} is already disabled")]
    AlreadyDisabled(EngineAction),

    #[error("action {0} is already enabled")]
    AlreadyEnabled(EngineAction),

    #[error("action {0} must be disabled first")]
    ActionEnabled(EngineAction),

    #[error("insufficient staged balance for {wallet}: requested {requested}, staged {staged}")]
    InsufficientStagedBalance {
        wallet: Address,
        requested: Amount,
        staged: Amount,
    },

    #[error("bounty fund mismatch: engine uses {expected}, got {actual}")]
    FundMismatch { expected: Address, actual: Address },

    #[error("bounty allocator mismatch: engine uses {expected}, got {actual}")]
    AllocatorMismatch { expected: Address, actual: Address },

    #[error("arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Rbac(#[from] RbacError),

    #[error(transparent)]
    Bounty(#[from] BountyError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Criterion(#[from] CriterionError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
