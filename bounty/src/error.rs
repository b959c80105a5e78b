use thiserror::Error;
use verity_rbac::RbacError;
use verity_token::TokenError;
use verity_types::{Address, TypesError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BountyError {
    #[error("resolution engine already bound to {0}")]
    EngineAlreadySet(Address),

    #[error("cannot bind the null address")]
    NullEngine,

    #[error("{caller} is not the bound resolution engine")]
    NotBoundEngine { caller: Address },

    #[error("allocator is frozen")]
    Frozen,

    #[error(transparent)]
    Rbac(#[from] RbacError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
