use thiserror::Error;
use verity_engine::EngineError;
use verity_rbac::RbacError;
use verity_token::TokenError;
use verity_types::Address;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("resolution engine {0} is not registered")]
    UnregisteredEngine(Address),

    #[error("phase mismatch on {engine}: open phase is {expected}, got {got}")]
    PhaseMismatch {
        engine: Address,
        expected: u64,
        got: u64,
    },

    #[error("stake amount must be non-zero")]
    ZeroAmount,

    #[error(transparent)]
    Rbac(#[from] RbacError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Token(#[from] TokenError),
}
