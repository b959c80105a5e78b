//! The bounty fund: a passive escrow bound once to a single engine.

use crate::{BountyAllocator, BountyError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use verity_rbac::{AccessControl, Role, RoleRegistry};
use verity_token::TokenLedger;
use verity_types::{Address, Amount, TxContext};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum FundEvent {
    ResolutionEngineSet { engine: Address },
    TokensDeposited { wallet: Address, amount: Amount },
    TokensAllocated { engine: Address, allocator: Address, amount: Amount },
    TokensWithdrawn { wallet: Address, amount: Amount },
}

#[derive(Clone, Debug)]
pub struct BountyFund {
    address: Address,
    token: Address,
    roles: RoleRegistry,
    resolution_engine: Option<Address>,
    pending_events: Vec<FundEvent>,
}

impl BountyFund {
    /// `operator` may drain the fund once its engine has been retired.
    pub fn new(address: Address, token: Address, owner: Address, operator: Address) -> Self {
        let mut roles = RoleRegistry::new(owner);
        roles.grant(Role::OPERATOR, operator);
        Self {
            address,
            token,
            roles,
            resolution_engine: None,
            pending_events: Vec::new(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn token(&self) -> &Address {
        &self.token
    }

    pub fn resolution_engine(&self) -> Option<&Address> {
        self.resolution_engine.as_ref()
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut RoleRegistry {
        &mut self.roles
    }

    pub fn balance(&self, ledger: &dyn TokenLedger) -> Amount {
        ledger.balance_of(&self.address)
    }

    /// Bind the one caller allowed to pull bounties. Succeeds exactly once.
    pub fn set_resolution_engine(&mut self, engine: Address) -> Result<(), BountyError> {
        if engine.is_null() {
            return Err(BountyError::NullEngine);
        }
        if let Some(existing) = &self.resolution_engine {
            return Err(BountyError::EngineAlreadySet(existing.clone()));
        }
        info!(fund = %self.address, engine = %engine, "bounty fund bound");
        self.resolution_engine = Some(engine.clone());
        self.pending_events
            .push(FundEvent::ResolutionEngineSet { engine });
        Ok(())
    }

    /// Pull `amount` from the caller into the fund. Requires prior approval of the fund.
    pub fn deposit_tokens(
        &mut self,
        tx: &TxContext,
        amount: Amount,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(), BountyError> {
        ledger.transfer_from(&self.address, &tx.caller, &self.address, amount)?;
        debug!(fund = %self.address, wallet = %tx.caller, amount = %amount, "tokens deposited");
        self.pending_events.push(FundEvent::TokensDeposited {
            wallet: tx.caller.clone(),
            amount,
        });
        Ok(())
    }

    /// Transfer the bounty computed by `allocator` to the bound engine.
    pub fn allocate_tokens(
        &mut self,
        tx: &TxContext,
        allocator: &dyn BountyAllocator,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Amount, BountyError> {
        let engine = match &self.resolution_engine {
            Some(engine) if *engine == tx.caller => engine.clone(),
            _ => {
                return Err(BountyError::NotBoundEngine {
                    caller: tx.caller.clone(),
                })
            }
        };
        let amount = allocator.allocate(self.balance(ledger));
        ledger.transfer(&self.address, &engine, amount)?;
        info!(fund = %self.address, engine = %engine, amount = %amount, "bounty allocated");
        self.pending_events.push(FundEvent::TokensAllocated {
            engine,
            allocator: allocator.address().clone(),
            amount,
        });
        Ok(amount)
    }

    /// Drain the whole balance to `wallet` (operator only).
    pub fn withdraw_tokens(
        &mut self,
        tx: &TxContext,
        wallet: &Address,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Amount, BountyError> {
        self.roles.require(&Role::OPERATOR, &tx.caller)?;
        let amount = self.balance(ledger);
        ledger.transfer(&self.address, wallet, amount)?;
        info!(fund = %self.address, wallet = %wallet, amount = %amount, "bounty fund drained");
        self.pending_events.push(FundEvent::TokensWithdrawn {
            wallet: wallet.clone(),
            amount,
        });
        Ok(amount)
    }

    pub fn drain_events(&mut self) -> Vec<FundEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
