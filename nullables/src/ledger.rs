//! Nullable token ledger: records transfers and fails on demand.

use std::collections::BTreeSet;
use verity_token::{InMemoryLedger, TokenError, TokenLedger};
use verity_types::{Address, Amount};

/// A transfer that went through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedTransfer {
    pub from: Address,
    pub to: Address,
    pub amount: Amount,
}

/// An [`InMemoryLedger`] that records every transfer and can be told to
/// reject any transfer touching chosen addresses.
///
/// Used to drive failures deep inside multi-component calls, e.g. a bounty
/// allocation that fails after the stake itself was recorded.
#[derive(Clone, Debug, Default)]
pub struct NullLedger {
    inner: InMemoryLedger,
    blocked: BTreeSet<Address>,
    transfers: Vec<RecordedTransfer>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every transfer from or to `address` fail until
    /// [`unblock`](Self::unblock) is called.
    pub fn block(&mut self, address: Address) {
        self.blocked.insert(address);
    }

    pub fn unblock(&mut self, address: &Address) {
        self.blocked.remove(address);
    }

    /// Transfers that succeeded, in order.
    pub fn transfers(&self) -> &[RecordedTransfer] {
        &self.transfers
    }

    fn check(&self, from: &Address, to: &Address) -> Result<(), TokenError> {
        match [from, to].into_iter().find(|a| self.blocked.contains(*a)) {
            Some(address) => Err(TokenError::Other(format!("transfers involving {address} are blocked"))),
            None => Ok(()),
        }
    }

    fn record(&mut self, from: &Address, to: &Address, amount: Amount) {
        self.transfers.push(RecordedTransfer {
            from: from.clone(),
            to: to.clone(),
            amount,
        });
    }
}

impl TokenLedger for NullLedger {
    fn balance_of(&self, holder: &Address) -> Amount {
        self.inner.balance_of(holder)
    }

    fn total_supply(&self) -> Amount {
        self.inner.total_supply()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.inner.allowance(owner, spender)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.check(from, to)?;
        self.inner.transfer(from, to, amount)?;
        self.record(from, to, amount);
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount) -> Result<(), TokenError> {
        self.inner.approve(owner, spender, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.check(from, to)?;
        self.inner.transfer_from(spender, from, to, amount)?;
        self.record(from, to, amount);
        Ok(())
    }

    fn mint(&mut self, to: &Address, amount: Amount) -> Result<(), TokenError> {
        self.inner.mint(to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet(name: &str) -> Address {
        Address::new(name)
    }

    #[test]
    fn records_successful_transfers() {
        let mut ledger = NullLedger::new();
        ledger.mint(&wallet("a1"), Amount::from(10u64)).unwrap();
        ledger
            .transfer(&wallet("a1"), &wallet("a2"), Amount::from(4u64))
            .unwrap();
        assert!(ledger
            .transfer(&wallet("a1"), &wallet("a2"), Amount::from(40u64))
            .is_err());
        assert_eq!(
            ledger.transfers(),
            [RecordedTransfer {
                from: wallet("a1"),
                to: wallet("a2"),
                amount: Amount::from(4u64),
            }]
        );
    }

    #[test]
    fn blocked_address_rejects_until_unblocked() {
        let mut ledger = NullLedger::new();
        ledger.mint(&wallet("a1"), Amount::from(10u64)).unwrap();
        ledger.block(wallet("a2"));
        assert!(matches!(
            ledger.transfer(&wallet("a1"), &wallet("a2"), Amount::from(1u64)),
            Err(TokenError::Other(_))
        ));
        ledger.approve(&wallet("a1"), &wallet("a3"), Amount::from(5u64)).unwrap();
        ledger.block(wallet("a1"));
        assert!(ledger
            .transfer_from(&wallet("a3"), &wallet("a1"), &wallet("a3"), Amount::from(1u64))
            .is_err());
        ledger.unblock(&wallet("a1"));
        assert_eq!(ledger.balance_of(&wallet("a1")), Amount::from(10u64));
        ledger.unblock(&wallet("a2"));
        ledger
            .transfer(&wallet("a1"), &wallet("a2"), Amount::from(1u64))
            .unwrap();
        assert_eq!(ledger.balance_of(&wallet("a2")), Amount::from(1u64));
    }
}
