//! Disablement timers and bounty sweeps.

use crate::OperatorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};
use verity_bounty::BountyFund;
use verity_engine::{EngineAction, ResolutionEngine};
use verity_rbac::{AccessControl, Role, RoleRegistry};
use verity_token::TokenLedger;
use verity_types::{Address, Amount, Timestamp, TxContext};

/// 30 days.
pub const DEFAULT_MINIMUM_TIMEOUT_SECS: u64 = 30 * 24 * 60 * 60;

/// Timer state of one engine. Engines without an entry have no timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisablementTimer {
    Armed { started_at: Timestamp, timeout: u64 },
    Disabled,
}

impl DisablementTimer {
    pub fn expires_at(&self) -> Option<Timestamp> {
        match self {
            Self::Armed { started_at, timeout } => Some(started_at.plus(*timeout)),
            Self::Disabled => None,
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self {
            Self::Armed { started_at, timeout } => started_at.has_expired(*timeout, now),
            Self::Disabled => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum OperatorEvent {
    DisablementTimerStarted {
        engine: Address,
        timeout: u64,
        expires_at: Timestamp,
    },
    DisablementTimerStopped {
        engine: Address,
    },
    Disabled {
        engine: Address,
    },
    AllocatedBountyWithdrawn {
        engine: Address,
        wallet: Address,
        amount: Amount,
    },
    UnallocatedBountyWithdrawn {
        fund: Address,
        wallet: Address,
        amount: Amount,
    },
    MinimumTimeoutSet {
        timeout: u64,
    },
    Frozen,
}

#[derive(Clone, Debug)]
pub struct Operator {
    address: Address,
    roles: RoleRegistry,
    minimum_timeout: u64,
    frozen: bool,
    timers: BTreeMap<Address, DisablementTimer>,
    pending_events: Vec<OperatorEvent>,
}

impl Operator {
    pub fn new(address: Address, owner: Address, minimum_timeout: u64) -> Self {
        Self {
            address,
            roles: RoleRegistry::new(owner),
            minimum_timeout,
            frozen: false,
            timers: BTreeMap::new(),
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

    pub fn minimum_timeout(&self) -> u64 {
        self.minimum_timeout
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn timer(&self, engine: &Address) -> Option<DisablementTimer> {
        self.timers.get(engine).copied()
    }

    /// Expiry of `engine`'s armed timer, `None` when no timer is running.
    pub fn disablement_timeout_by_resolution_engine(&self, engine: &Address) -> Option<Timestamp> {
        self.timers.get(engine).and_then(DisablementTimer::expires_at)
    }

    /// Whether `engine`'s timer has run out at `now`. No timer reads as not expired.
    pub fn is_disablement_timer_expired(&self, engine: &Address, now: Timestamp) -> bool {
        self.timers.get(engine).is_some_and(|t| t.is_expired(now))
    }

    pub fn drain_events(&mut self) -> Vec<OperatorEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── administration ──

    pub fn freeze(&mut self, tx: &TxContext) -> Result<(), OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.frozen {
            return Err(OperatorError::Frozen);
        }
        self.frozen = true;
        info!(operator = %self.address, "operator frozen");
        self.pending_events.push(OperatorEvent::Frozen);
        Ok(())
    }

    pub fn set_minimum_timeout(&mut self, tx: &TxContext, timeout: u64) -> Result<(), OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.frozen {
            return Err(OperatorError::Frozen);
        }
        self.minimum_timeout = timeout;
        info!(operator = %self.address, timeout, "minimum timeout set");
        self.pending_events
            .push(OperatorEvent::MinimumTimeoutSet { timeout });
        Ok(())
    }

    // ── disablement ──

    /// Arm a timer on `engine` and stop it accepting stakes.
    pub fn start_disablement_timer(
        &mut self,
        tx: &TxContext,
        engine: &mut ResolutionEngine,
        timeout: u64,
    ) -> Result<(), OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if timeout < self.minimum_timeout {
            return Err(OperatorError::TimeoutTooShort {
                timeout,
                minimum: self.minimum_timeout,
            });
        }
        let key = engine.address().clone();
        match self.timers.get(&key) {
            Some(DisablementTimer::Armed { .. }) => return Err(OperatorError::TimerAlreadyArmed(key)),
            Some(DisablementTimer::Disabled) => return Err(OperatorError::AlreadyDisabled(key)),
            None => {}
        }
        engine.disable(&tx.forwarded(&self.address), EngineAction::Stake)?;

        let timer = DisablementTimer::Armed {
            started_at: tx.timestamp,
            timeout,
        };
        let expires_at = tx.timestamp.plus(timeout);
        self.timers.insert(key.clone(), timer);
        info!(operator = %self.address, engine = %key, timeout, %expires_at, "disablement timer started");
        self.pending_events
            .push(OperatorEvent::DisablementTimerStarted {
                engine: key,
                timeout,
                expires_at,
            });
        Ok(())
    }

    /// Cancel a running timer and let `engine` accept stakes again.
    pub fn stop_disablement_timer(
        &mut self,
        tx: &TxContext,
        engine: &mut ResolutionEngine,
    ) -> Result<(), OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        let key = engine.address().clone();
        match self.timers.get(&key) {
            Some(DisablementTimer::Armed { .. }) => {}
            Some(DisablementTimer::Disabled) => return Err(OperatorError::AlreadyDisabled(key)),
            None => return Err(OperatorError::NoTimer(key)),
        }
        engine.enable(&tx.forwarded(&self.address), EngineAction::Stake)?;
        self.timers.remove(&key);
        info!(operator = %self.address, engine = %key, "disablement timer stopped");
        self.pending_events
            .push(OperatorEvent::DisablementTimerStopped { engine: key });
        Ok(())
    }

    /// Disable RESOLVE on `engine` once its timer has expired.
    pub fn disable(&mut self, tx: &TxContext, engine: &mut ResolutionEngine) -> Result<(), OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        let key = engine.address().clone();
        match self.timers.get(&key) {
            None => return Err(OperatorError::NoTimer(key)),
            Some(DisablementTimer::Disabled) => return Err(OperatorError::AlreadyDisabled(key)),
            Some(timer) if !timer.is_expired(tx.timestamp) => {
                debug!(engine = %key, now = %tx.timestamp, "disablement timer still running");
                return Err(OperatorError::TimerNotExpired {
                    expires_at: timer.expires_at().unwrap_or(tx.timestamp),
                    engine: key,
                });
            }
            Some(_) => {}
        }
        engine.disable(&tx.forwarded(&self.address), EngineAction::Resolve)?;
        self.timers.insert(key.clone(), DisablementTimer::Disabled);
        info!(operator = %self.address, engine = %key, "engine disabled");
        self.pending_events
            .push(OperatorEvent::Disabled { engine: key });
        Ok(())
    }

    // ── bounty sweeps ──

    /// Move the bounty `engine` still holds to `wallet`.
    pub fn withdraw_allocated_bounty(
        &mut self,
        tx: &TxContext,
        engine: &mut ResolutionEngine,
        wallet: &Address,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Amount, OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        let amount = engine.withdraw_bounty(&tx.forwarded(&self.address), wallet, ledger)?;
        info!(operator = %self.address, engine = %engine.address(), wallet = %wallet, amount = %amount, "allocated bounty withdrawn");
        self.pending_events
            .push(OperatorEvent::AllocatedBountyWithdrawn {
                engine: engine.address().clone(),
                wallet: wallet.clone(),
                amount,
            });
        Ok(amount)
    }

    /// Drain `engine`'s fund to `wallet`. `engine` must have RESOLVE disabled.
    pub fn withdraw_unallocated_bounty(
        &mut self,
        tx: &TxContext,
        engine: &ResolutionEngine,
        fund: &mut BountyFund,
        wallet: &Address,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Amount, OperatorError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if fund.resolution_engine() != Some(engine.address()) {
            return Err(OperatorError::FundMismatch {
                expected: engine.address().clone(),
                actual: fund.resolution_engine().cloned(),
            });
        }
        if engine.is_enabled(EngineAction::Resolve) {
            return Err(OperatorError::ResolveNotDisabled(engine.address().clone()));
        }
        let amount = fund.withdraw_tokens(&tx.forwarded(&self.address), wallet, ledger)?;
        info!(operator = %self.address, fund = %fund.address(), wallet = %wallet, amount = %amount, "unallocated bounty withdrawn");
        self.pending_events
            .push(OperatorEvent::UnallocatedBountyWithdrawn {
                fund: fund.address().clone(),
                wallet: wallet.clone(),
                amount,
            });
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_bounty::FractionalBalanceAllocator;
    use verity_criteria::{AbsoluteThreshold, Criterion};
    use verity_engine::{BountyAwardPolicy, BountySource, EngineError};
    use verity_token::InMemoryLedger;
    use verity_types::{Fraction, Status, PARTS_PER};

    fn wallet(name: &str) -> Address {
        Address::new(name)
    }

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    fn at(caller: &str, secs: u64) -> TxContext {
        TxContext::new(caller, secs, Timestamp::new(secs))
    }

    struct Stack {
        operator: Operator,
        engine: ResolutionEngine,
        fund: BountyFund,
        ledger: InMemoryLedger,
    }

    fn stack() -> Stack {
        let mut ledger = InMemoryLedger::new();
        ledger.mint(&wallet("fund"), amt(100)).unwrap();
        let mut fund = BountyFund::new(wallet("fund"), wallet("token"), wallet("owner"), wallet("operator"));
        let mut engine = ResolutionEngine::new(
            wallet("engine"),
            wallet("owner"),
            wallet("oracle"),
            wallet("operator"),
            &mut fund,
            Criterion::AbsoluteThreshold(AbsoluteThreshold::new(amt(100))),
            BountyAwardPolicy::Always,
        )
        .unwrap();
        let allocator = FractionalBalanceAllocator::new(
            wallet("allocator"),
            wallet("owner"),
            Fraction::new(PARTS_PER / 10).unwrap(),
        );
        let owner = at("owner", 1);
        engine.set_bounty_allocator(&owner, wallet("allocator")).unwrap();
        engine
            .initialize(
                &owner,
                BountySource {
                    fund: &mut fund,
                    allocator: &allocator,
                    ledger: &mut ledger,
                },
            )
            .unwrap();
        Stack {
            operator: Operator::new(wallet("operator"), wallet("owner"), 2),
            engine,
            fund,
            ledger,
        }
    }

    #[test]
    fn new_operator_defaults() {
        let op = Operator::new(wallet("operator"), wallet("owner"), DEFAULT_MINIMUM_TIMEOUT_SECS);
        assert!(op.roles().is_role_accessor(&Role::OWNER, &wallet("owner")));
        assert!(!op.roles().is_role_accessor(&Role::OWNER, &wallet("a1")));
        assert!(!op.frozen());
        assert_eq!(op.minimum_timeout(), 2_592_000);
    }

    // ── administration ──

    #[test]
    fn freeze_blocks_minimum_timeout_changes() {
        let mut op = Operator::new(wallet("operator"), wallet("owner"), 2);
        assert!(op.freeze(&at("a1", 1)).is_err());
        op.set_minimum_timeout(&at("owner", 1), 10).unwrap();
        assert_eq!(op.minimum_timeout(), 10);
        op.freeze(&at("owner", 2)).unwrap();
        assert_eq!(op.set_minimum_timeout(&at("owner", 3), 20), Err(OperatorError::Frozen));
        assert_eq!(op.freeze(&at("owner", 4)), Err(OperatorError::Frozen));
        assert_eq!(
            op.drain_events(),
            vec![OperatorEvent::MinimumTimeoutSet { timeout: 10 }, OperatorEvent::Frozen]
        );
    }

    // ── timers ──

    #[test]
    fn start_timer_checks_owner_and_minimum() {
        let mut s = stack();
        assert!(matches!(
            s.operator.start_disablement_timer(&at("a1", 10), &mut s.engine, 10),
            Err(OperatorError::Rbac(_))
        ));
        assert_eq!(
            s.operator.start_disablement_timer(&at("owner", 10), &mut s.engine, 1),
            Err(OperatorError::TimeoutTooShort { timeout: 1, minimum: 2 })
        );
        assert!(s.engine.is_enabled(EngineAction::Stake));
    }

    #[test]
    fn start_timer_disables_staking() {
        let mut s = stack();
        s.operator
            .start_disablement_timer(&at("owner", 10), &mut s.engine, 2)
            .unwrap();
        assert!(!s.engine.is_enabled(EngineAction::Stake));
        assert!(s.engine.is_enabled(EngineAction::Resolve));
        assert_eq!(
            s.operator.disablement_timeout_by_resolution_engine(&wallet("engine")),
            Some(Timestamp::new(12))
        );
        assert!(matches!(
            s.operator.drain_events()[0],
            OperatorEvent::DisablementTimerStarted { timeout: 2, .. }
        ));
        assert_eq!(
            s.operator.start_disablement_timer(&at("owner", 11), &mut s.engine, 2),
            Err(OperatorError::TimerAlreadyArmed(wallet("engine")))
        );
    }

    #[test]
    fn stop_timer_reenables_staking() {
        let mut s = stack();
        assert_eq!(
            s.operator.stop_disablement_timer(&at("owner", 10), &mut s.engine),
            Err(OperatorError::NoTimer(wallet("engine")))
        );
        s.operator
            .start_disablement_timer(&at("owner", 10), &mut s.engine, 2)
            .unwrap();
        assert!(s.operator.stop_disablement_timer(&at("a1", 11), &mut s.engine).is_err());
        s.operator
            .stop_disablement_timer(&at("owner", 11), &mut s.engine)
            .unwrap();
        assert!(s.engine.is_enabled(EngineAction::Stake));
        assert_eq!(s.operator.disablement_timeout_by_resolution_engine(&wallet("engine")), None);
    }

    #[test]
    fn timer_expiry_is_a_time_check() {
        let mut s = stack();
        assert!(!s.operator.is_disablement_timer_expired(&wallet("engine"), Timestamp::new(100)));
        s.operator
            .start_disablement_timer(&at("owner", 10), &mut s.engine, 2)
            .unwrap();
        assert!(!s.operator.is_disablement_timer_expired(&wallet("engine"), Timestamp::new(11)));
        assert!(s.operator.is_disablement_timer_expired(&wallet("engine"), Timestamp::new(12)));
        assert!(s.operator.is_disablement_timer_expired(&wallet("engine"), Timestamp::new(13)));
    }

    #[test]
    fn disable_requires_expired_timer() {
        let mut s = stack();
        assert_eq!(
            s.operator.disable(&at("owner", 5), &mut s.engine),
            Err(OperatorError::NoTimer(wallet("engine")))
        );
        s.operator
            .start_disablement_timer(&at("owner", 10), &mut s.engine, 2)
            .unwrap();
        assert!(matches!(
            s.operator.disable(&at("owner", 11), &mut s.engine),
            Err(OperatorError::TimerNotExpired { .. })
        ));
        assert!(matches!(
            s.operator.disable(&at("a1", 13), &mut s.engine),
            Err(OperatorError::Rbac(_))
        ));
        s.operator.disable(&at("owner", 13), &mut s.engine).unwrap();
        assert!(!s.engine.is_enabled(EngineAction::Resolve));
        assert_eq!(s.operator.timer(&wallet("engine")), Some(DisablementTimer::Disabled));
        assert_eq!(
            s.operator.disable(&at("owner", 14), &mut s.engine),
            Err(OperatorError::AlreadyDisabled(wallet("engine")))
        );
    }

    // ── sweeps ──

    #[test]
    fn sweeps_after_teardown() {
        let mut s = stack();
        let dest = wallet("treasury");
        // Resolve still enabled: both sweeps refuse.
        assert_eq!(
            s.operator
                .withdraw_allocated_bounty(&at("owner", 10), &mut s.engine, &dest, &mut s.ledger),
            Err(OperatorError::Engine(EngineError::ActionEnabled(EngineAction::Resolve)))
        );
        assert_eq!(
            s.operator.withdraw_unallocated_bounty(
                &at("owner", 10),
                &s.engine,
                &mut s.fund,
                &dest,
                &mut s.ledger
            ),
            Err(OperatorError::ResolveNotDisabled(wallet("engine")))
        );

        s.operator
            .start_disablement_timer(&at("owner", 10), &mut s.engine, 2)
            .unwrap();
        s.operator.disable(&at("owner", 20), &mut s.engine).unwrap();

        let allocated = s
            .operator
            .withdraw_allocated_bounty(&at("owner", 21), &mut s.engine, &dest, &mut s.ledger)
            .unwrap();
        assert_eq!(allocated, amt(10));
        let unallocated = s
            .operator
            .withdraw_unallocated_bounty(&at("owner", 22), &s.engine, &mut s.fund, &dest, &mut s.ledger)
            .unwrap();
        assert_eq!(unallocated, amt(90));
        assert_eq!(s.ledger.balance_of(&dest), amt(100));

        // Repeat sweeps move nothing.
        assert_eq!(
            s.operator
                .withdraw_allocated_bounty(&at("owner", 23), &mut s.engine, &dest, &mut s.ledger),
            Ok(Amount::ZERO)
        );
    }

    #[test]
    fn sweep_rejects_foreign_fund() {
        let mut s = stack();
        let mut other = BountyFund::new(wallet("other"), wallet("token"), wallet("owner"), wallet("operator"));
        assert!(matches!(
            s.operator.withdraw_unallocated_bounty(
                &at("owner", 10),
                &s.engine,
                &mut other,
                &wallet("treasury"),
                &mut s.ledger
            ),
            Err(OperatorError::FundMismatch { .. })
        ));
    }

    #[test]
    fn staking_stops_once_timer_armed() {
        let mut s = stack();
        s.operator
            .start_disablement_timer(&at("owner", 10), &mut s.engine, 2)
            .unwrap();
        assert_eq!(
            s.engine.stake(&at("oracle", 11), &wallet("a1"), Status::True, amt(5)),
            Err(EngineError::ActionDisabled(EngineAction::Stake))
        );
    }
}
