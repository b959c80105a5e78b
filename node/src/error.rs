use thiserror::Error;
use verity_bounty::BountyError;
use verity_engine::EngineError;
use verity_operator::OperatorError;
use verity_oracle::OracleError;
use verity_rbac::RbacError;
use verity_token::TokenError;
use verity_types::{Address, TypesError};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown engine {0:?}")]
    UnknownEngine(String),

    #[error("no component at {0}")]
    UnknownComponent(Address),

    #[error("engine {0:?} does not use a fractional allocator")]
    NotFractional(String),

    #[error("node lock poisoned")]
    Poisoned,

    #[error("oracle: {0}")]
    Oracle(#[from] OracleError),

    #[error("operator: {0}")]
    Operator(#[from] OperatorError),

    #[error("engine: {0}")]
    Engine(#[from] EngineError),

    #[error("bounty: {0}")]
    Bounty(#[from] BountyError),

    #[error("access control: {0}")]
    Rbac(#[from] RbacError),

    #[error("token: {0}")]
    Token(#[from] TokenError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
