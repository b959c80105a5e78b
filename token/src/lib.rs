//! The fungible stake token.
//!
//! Components never own token balances directly: they move tokens through a
//! [`TokenLedger`], the external collaborator that tracks who holds what.

pub mod error;
pub mod memory;

pub use error::TokenError;
pub use memory::InMemoryLedger;

use verity_types::{Address, Amount};

/// Minimal ERC-20 style ledger surface.
pub trait TokenLedger {
    fn balance_of(&self, holder: &Address) -> Amount;

    fn total_supply(&self) -> Amount;

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError>;

    /// Let `spender` move up to `amount` of `owner`'s tokens.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), TokenError>;

    /// `spender` moves `amount` from `from` to `to`, consuming allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError>;

    fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TokenError>;
}
