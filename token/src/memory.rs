//! In-memory token ledger used by the node and in tests.

use crate::{TokenError, TokenLedger};
use std::collections::HashMap;
use tracing::trace;
use verity_types::{Address, Amount};

#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn debit(&mut self, holder: &Address, amount: Amount) -> Result<(), TokenError> {
        let available = self.balance_of(holder);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TokenError::InsufficientBalance {
                holder: holder.clone(),
                needed: amount,
                available,
            })?;
        self.balances.insert(holder.clone(), remaining);
        Ok(())
    }

    fn credit(&mut self, holder: &Address, amount: Amount) {
        // Credits are bounded by total supply, which is checked at mint.
        let entry = self.balances.entry(holder.clone()).or_default();
        *entry = entry.saturating_add(amount);
    }
}

impl TokenLedger for InMemoryLedger {
    fn balance_of(&self, holder: &Address) -> Amount {
        self.balances.get(holder).copied().unwrap_or_default()
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_null() {
            return Err(TokenError::NullRecipient);
        }
        self.debit(from, amount)?;
        self.credit(to, amount);
        trace!(from = %from, to = %to, amount = %amount, "transfer");
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), TokenError> {
        self.allowances
            .insert((owner.clone(), spender.clone()), amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let available = self.allowance(from, spender);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TokenError::InsufficientAllowance {
                owner: from.clone(),
                spender: spender.clone(),
                needed: amount,
                available,
            })?;
        self.transfer(from, to, amount)?;
        self.allowances
            .insert((from.clone(), spender.clone()), remaining);
        Ok(())
    }

    fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_null() {
            return Err(TokenError::NullRecipient);
        }
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;
        self.credit(to, amount);
        Ok(())
    }
}
