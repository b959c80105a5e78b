//! Engine registry and staking entry points.

use crate::OracleError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};
use verity_engine::{BountySource, EngineAction, EngineError, ResolutionEngine};
use verity_rbac::{AccessControl, Role, RoleRegistry};
use verity_token::TokenLedger;
use verity_types::{Address, Amount, Status, TxContext};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum OracleEvent {
    ResolutionEngineAdded {
        engine: Address,
    },
    ResolutionEngineRemoved {
        engine: Address,
    },
    TokensStaked {
        wallet: Address,
        engine: Address,
        phase_number: u64,
        status: Status,
        amount: Amount,
        refunded: Amount,
    },
    PayoutStaged {
        wallet: Address,
        engine: Address,
        first_phase: u64,
        last_phase: u64,
        amount: Amount,
    },
    StakeStaged {
        wallet: Address,
        engine: Address,
        amount: Amount,
    },
    Withdrawn {
        wallet: Address,
        engine: Address,
        amount: Amount,
    },
}

/// Outcome of an accepted stake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeReceipt {
    pub phase_number: u64,
    /// Amount added to the phase.
    pub staked: Amount,
    /// Excess staged back to the wallet.
    pub refunded: Amount,
    /// Whether this stake closed the phase.
    pub resolved: bool,
}

#[derive(Clone, Debug)]
pub struct Oracle {
    address: Address,
    roles: RoleRegistry,
    engines: BTreeSet<Address>,
    pending_events: Vec<OracleEvent>,
}

impl Oracle {
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            roles: RoleRegistry::new(owner),
            engines: BTreeSet::new(),
            pending_events: Vec::new(),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut RoleRegistry {
        &mut self.roles
    }

    pub fn drain_events(&mut self) -> Vec<OracleEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── registry ──

    pub fn has_resolution_engine(&self, engine: &Address) -> bool {
        self.engines.contains(engine)
    }

    pub fn resolution_engines_count(&self) -> usize {
        self.engines.len()
    }

    pub fn resolution_engines(&self) -> impl Iterator<Item = &Address> {
        self.engines.iter()
    }

    /// Register an engine (owner only). Registering twice is a no-op.
    pub fn add_resolution_engine(&mut self, tx: &TxContext, engine: Address) -> Result<(), OracleError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.engines.insert(engine.clone()) {
            info!(oracle = %self.address, engine = %engine, "resolution engine added");
            self.pending_events
                .push(OracleEvent::ResolutionEngineAdded { engine });
        }
        Ok(())
    }

    pub fn remove_resolution_engine(&mut self, tx: &TxContext, engine: &Address) -> Result<(), OracleError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.engines.remove(engine) {
            info!(oracle = %self.address, engine = %engine, "resolution engine removed");
            self.pending_events.push(OracleEvent::ResolutionEngineRemoved {
                engine: engine.clone(),
            });
        }
        Ok(())
    }

    // ── staking ──

    /// Stake `amount` of the caller's tokens on `status` in phase `phase_number`.
    ///
    /// The whole amount moves to the engine (the caller must have approved the
    /// oracle). Anything above the engine's resolution delta is staged back to
    /// the caller. The engine is then asked to resolve.
    pub fn stake(
        &mut self,
        tx: &TxContext,
        engine: &mut ResolutionEngine,
        phase_number: u64,
        status: Status,
        amount: Amount,
        source: BountySource<'_>,
    ) -> Result<StakeReceipt, OracleError> {
        self.require_registered(engine)?;
        let open = engine.verification_phase_number();
        if phase_number != open {
            debug!(engine = %engine.address(), expected = open, got = phase_number, "stale phase rejected");
            return Err(OracleError::PhaseMismatch {
                engine: engine.address().clone(),
                expected: open,
                got: phase_number,
            });
        }
        if amount.is_zero() {
            return Err(OracleError::ZeroAmount);
        }
        if engine.current_tally().is_none() {
            return Err(EngineError::NotInitialized.into());
        }
        for action in [EngineAction::Stake, EngineAction::Resolve] {
            if !engine.is_enabled(action) {
                return Err(EngineError::ActionDisabled(action).into());
            }
        }
        engine.roles().require(&Role::ORACLE, &self.address)?;

        let wallet = tx.caller.clone();
        let delta = engine.resolution_delta_amount(status);
        // With a zero delta and the criterion unmet, only wallets new to the
        // phase can close it. Their stakes are not capped; everyone else's are.
        let newcomer = engine
            .metrics_by_verification_phase_number_and_wallet(phase_number, &wallet)
            .stake_amount()
            .is_zero();
        let staked = if delta.is_zero() && !engine.criteria_met() && newcomer {
            amount
        } else {
            amount.min(delta)
        };
        let refunded = amount.saturating_sub(staked);
        let fwd = tx.forwarded(&self.address);

        source
            .ledger
            .transfer_from(&self.address, &wallet, engine.address(), amount)?;
        if !refunded.is_zero() {
            engine.stage(&fwd, &wallet, refunded)?;
        }
        if !staked.is_zero() {
            engine.stake(&fwd, &wallet, status, staked)?;
        }
        let resolved = engine.resolve_if_criteria_met(&fwd, source)?;

        info!(
            oracle = %self.address,
            engine = %engine.address(),
            wallet = %wallet,
            phase = phase_number,
            %status,
            staked = %staked,
            refunded = %refunded,
            resolved,
            "tokens staked"
        );
        self.pending_events.push(OracleEvent::TokensStaked {
            wallet,
            engine: engine.address().clone(),
            phase_number,
            status,
            amount: staked,
            refunded,
        });
        Ok(StakeReceipt {
            phase_number,
            staked,
            refunded,
            resolved,
        })
    }

    /// Stage the caller's payout over `first..=last`.
    pub fn stage_payout(
        &mut self,
        tx: &TxContext,
        engine: &mut ResolutionEngine,
        first: u64,
        last: u64,
    ) -> Result<Amount, OracleError> {
        self.require_registered(engine)?;
        let amount = engine.stage_payout(&tx.forwarded(&self.address), &tx.caller, first, last)?;
        self.pending_events.push(OracleEvent::PayoutStaged {
            wallet: tx.caller.clone(),
            engine: engine.address().clone(),
            first_phase: first,
            last_phase: last,
            amount,
        });
        Ok(amount)
    }

    /// Stage the caller's open-phase stake of a retired engine.
    pub fn stage_stake(&mut self, tx: &TxContext, engine: &mut ResolutionEngine) -> Result<Amount, OracleError> {
        self.require_registered(engine)?;
        let amount = engine.stage_stake(&tx.forwarded(&self.address), &tx.caller)?;
        self.pending_events.push(OracleEvent::StakeStaged {
            wallet: tx.caller.clone(),
            engine: engine.address().clone(),
            amount,
        });
        Ok(amount)
    }

    /// Withdraw `amount` of the caller's staged balance.
    pub fn withdraw(
        &mut self,
        tx: &TxContext,
        engine: &mut ResolutionEngine,
        amount: Amount,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(), OracleError> {
        self.require_registered(engine)?;
        engine.withdraw(&tx.forwarded(&self.address), &tx.caller, amount, ledger)?;
        self.pending_events.push(OracleEvent::Withdrawn {
            wallet: tx.caller.clone(),
            engine: engine.address().clone(),
            amount,
        });
        Ok(())
    }

    fn require_registered(&self, engine: &ResolutionEngine) -> Result<(), OracleError> {
        if self.engines.contains(engine.address()) {
            Ok(())
        } else {
            Err(OracleError::UnregisteredEngine(engine.address().clone()))
        }
    }
}
