use thiserror::Error;
use verity_types::{Address, Amount};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance for {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        holder: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("transfer to the null address")]
    NullRecipient,

    #[error("total supply overflow")]
    SupplyOverflow,

    #[error("{0}")]
    Other(String),
}
