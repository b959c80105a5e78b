//! Bounty sizing strategies.

use crate::BountyError;
use serde::{Deserialize, Serialize};
use tracing::info;
use verity_rbac::{AccessControl, Role, RoleRegistry};
use verity_types::{Address, Amount, Fraction, TxContext, PARTS_PER};

/// Default allocator fraction: a tenth of the fund per phase.
pub const DEFAULT_BOUNTY_FRACTION: u64 = PARTS_PER / 10;

/// Computes how much of a fund's balance becomes the next phase's bounty.
pub trait BountyAllocator {
    fn address(&self) -> &Address;

    /// Bounty for a fund currently holding `fund_balance`. Never exceeds it.
    fn allocate(&self, fund_balance: Amount) -> Amount;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AllocatorEvent {
    FractionSet { fraction: Fraction },
    Frozen,
}

/// Allocates `floor(balance * fraction / PARTS_PER)`.
#[derive(Clone, Debug)]
pub struct FractionalBalanceAllocator {
    address: Address,
    roles: RoleRegistry,
    fraction: Fraction,
    frozen: bool,
    pending_events: Vec<AllocatorEvent>,
}

impl FractionalBalanceAllocator {
    pub fn new(address: Address, owner: Address, fraction: Fraction) -> Self {
        Self {
            address,
            roles: RoleRegistry::new(owner),
            fraction,
            frozen: false,
            pending_events: Vec::new(),
        }
    }

    pub fn fraction(&self) -> Fraction {
        self.fraction
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut RoleRegistry {
        &mut self.roles
    }

    /// Owner only, before freeze. `parts` must lie in `[0, PARTS_PER]`.
    pub fn set_fraction(&mut self, tx: &TxContext, parts: u64) -> Result<(), BountyError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.frozen {
            return Err(BountyError::Frozen);
        }
        let fraction = Fraction::new(parts)?;
        info!(allocator = %self.address, fraction = parts, "allocator fraction set");
        self.fraction = fraction;
        self.pending_events.push(AllocatorEvent::FractionSet { fraction });
        Ok(())
    }

    pub fn freeze(&mut self, tx: &TxContext) -> Result<(), BountyError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.frozen {
            return Err(BountyError::Frozen);
        }
        self.frozen = true;
        self.pending_events.push(AllocatorEvent::Frozen);
        Ok(())
    }

    pub fn drain_events(&mut self) -> Vec<AllocatorEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl BountyAllocator for FractionalBalanceAllocator {
    fn address(&self) -> &Address {
        &self.address
    }

    fn allocate(&self, fund_balance: Amount) -> Amount {
        self.fraction.of(fund_balance)
    }
}

/// Allocates a constant amount, or whatever is left if the fund holds less.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedAmountAllocator {
    address: Address,
    amount: Amount,
}

impl FixedAmountAllocator {
    pub fn new(address: Address, amount: Amount) -> Self {
        Self { address, amount }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl BountyAllocator for FixedAmountAllocator {
    fn address(&self) -> &Address {
        &self.address
    }

    fn allocate(&self, fund_balance: Amount) -> Amount {
        self.amount.min(fund_balance)
    }
}

/// The allocator strategies a deployment can choose from.
#[derive(Clone, Debug)]
pub enum Allocator {
    Fractional(FractionalBalanceAllocator),
    Fixed(FixedAmountAllocator),
}

impl Allocator {
    pub fn drain_events(&mut self) -> Vec<AllocatorEvent> {
        match self {
            Self::Fractional(a) => a.drain_events(),
            Self::Fixed(_) => Vec::new(),
        }
    }
}

impl BountyAllocator for Allocator {
    fn address(&self) -> &Address {
        match self {
            Self::Fractional(a) => a.address(),
            Self::Fixed(a) => a.address(),
        }
    }

    fn allocate(&self, fund_balance: Amount) -> Amount {
        match self {
            Self::Fractional(a) => a.allocate(fund_balance),
            Self::Fixed(a) => a.allocate(fund_balance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::{Timestamp, TypesError};

    fn wallet(name: &str) -> Address {
        Address::new(name)
    }

    fn tx(caller: &str) -> TxContext {
        TxContext::new(caller, 1, Timestamp::new(0))
    }

    fn allocator() -> FractionalBalanceAllocator {
        FractionalBalanceAllocator::new(
            wallet("allocator"),
            wallet("owner"),
            Fraction::new(DEFAULT_BOUNTY_FRACTION).unwrap(),
        )
    }

    #[test]
    fn allocates_fraction_of_balance() {
        let a = allocator();
        assert_eq!(a.allocate(Amount::from(1000u64)), Amount::from(100u64));
        assert_eq!(a.allocate(Amount::from(9u64)), Amount::ZERO);
    }

    #[test]
    fn set_fraction_is_owner_only_and_bounded() {
        let mut a = allocator();
        assert!(matches!(
            a.set_fraction(&tx("mallory"), PARTS_PER / 2),
            Err(BountyError::Rbac(_))
        ));
        assert!(matches!(
            a.set_fraction(&tx("owner"), PARTS_PER * 2),
            Err(BountyError::Types(TypesError::FractionOutOfRange { .. }))
        ));
        a.set_fraction(&tx("owner"), PARTS_PER / 2).unwrap();
        assert_eq!(a.allocate(Amount::from(10u64)), Amount::from(5u64));
        assert_eq!(a.drain_events().len(), 1);
    }

    #[test]
    fn freeze_blocks_setters() {
        let mut a = allocator();
        a.freeze(&tx("owner")).unwrap();
        assert!(a.frozen());
        assert_eq!(a.set_fraction(&tx("owner"), 0), Err(BountyError::Frozen));
        assert_eq!(a.fraction(), Fraction::new(DEFAULT_BOUNTY_FRACTION).unwrap());
        assert_eq!(a.freeze(&tx("owner")), Err(BountyError::Frozen));
        assert_eq!(a.drain_events(), vec![AllocatorEvent::Frozen]);
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&AllocatorEvent::Frozen).unwrap();
        assert_eq!(json, r#"{"event":"Frozen"}"#);
    }
}
