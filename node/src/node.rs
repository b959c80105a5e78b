//! The node struct: wires the oracle, operator and engines together.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use verity_bounty::{Allocator, BountyAllocator, BountyFund, FixedAmountAllocator, FractionalBalanceAllocator};
use verity_engine::{BountySource, PhaseMetrics, ResolutionEngine};
use verity_operator::Operator;
use verity_oracle::{Oracle, OracleError, StakeReceipt};
use verity_rbac::{Role, RoleRegistry};
use verity_token::{InMemoryLedger, TokenLedger};
use verity_types::{Address, Amount, BlockNumber, Clock, Fraction, Status, SystemClock, Timestamp, TxContext};

use crate::config::{AllocatorConfig, EngineConfig, NodeConfig};
use crate::event::{ComponentEvent, NodeEvent};
use crate::NodeError;

/// One resolution engine with the fund and allocator that feed it.
#[derive(Clone, Debug)]
pub struct Deployment {
    name: String,
    engine: ResolutionEngine,
    fund: BountyFund,
    allocator: Allocator,
}

impl Deployment {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine(&self) -> &ResolutionEngine {
        &self.engine
    }

    pub fn fund(&self) -> &BountyFund {
        &self.fund
    }

    pub fn allocator(&self) -> &Allocator {
        &self.allocator
    }
}

/// Everything a transaction may touch. Cloned as the rollback snapshot.
#[derive(Clone)]
struct State<L> {
    ledger: L,
    oracle: Oracle,
    operator: Operator,
    deployments: BTreeMap<String, Deployment>,
}

impl<L> State<L> {
    fn is_component(&self, address: &Address) -> bool {
        self.oracle.address() == address
            || self.operator.address() == address
            || self.deployments.values().any(|d| {
                d.engine.address() == address || d.fund.address() == address || d.allocator.address() == address
            })
    }

    fn roles_mut(&mut self, component: &Address) -> Result<&mut RoleRegistry, NodeError> {
        if self.oracle.address() == component {
            return Ok(self.oracle.roles_mut());
        }
        if self.operator.address() == component {
            return Ok(self.operator.roles_mut());
        }
        for d in self.deployments.values_mut() {
            if d.engine.address() == component {
                return Ok(d.engine.roles_mut());
            }
            if d.fund.address() == component {
                return Ok(d.fund.roles_mut());
            }
            if let Allocator::Fractional(a) = &mut d.allocator {
                if a.address() == component {
                    return Ok(a.roles_mut());
                }
            }
        }
        Err(NodeError::UnknownComponent(component.clone()))
    }
}

/// A running verity node.
///
/// Generic over the token ledger so tests can inject a
/// [`NullLedger`](verity_nullables::NullLedger).
pub struct OracleNode<L = InMemoryLedger> {
    owner: Address,
    token: Address,
    state: State<L>,
    clock: Arc<dyn Clock>,
    block: BlockNumber,
    next_seq: u64,
    events: Vec<NodeEvent>,
}

impl OracleNode<InMemoryLedger> {
    /// Deploy `config` on an in-memory ledger with wall-clock time.
    pub fn new(config: &NodeConfig) -> Result<Self, NodeError> {
        Self::with_parts(config, InMemoryLedger::new(), Arc::new(SystemClock))
    }
}

impl<L: TokenLedger + Clone> OracleNode<L> {
    /// Deploy `config` on `ledger`, reading time from `clock`.
    pub fn with_parts(config: &NodeConfig, ledger: L, clock: Arc<dyn Clock>) -> Result<Self, NodeError> {
        config.validate()?;
        let state = State {
            ledger,
            oracle: Oracle::new(config.oracle.clone(), config.owner.clone()),
            operator: Operator::new(
                config.operator.address.clone(),
                config.owner.clone(),
                config.operator.minimum_timeout_secs,
            ),
            deployments: BTreeMap::new(),
        };
        let mut node = Self {
            owner: config.owner.clone(),
            token: config.token.address.clone(),
            state,
            clock,
            block: 0,
            next_seq: 0,
            events: Vec::new(),
        };

        if !config.token.mints.is_empty() {
            let owner = node.owner.clone();
            node.transact(&owner, "mint", |state, _tx| {
                for mint in &config.token.mints {
                    state.ledger.mint(&mint.wallet, mint.amount)?;
                }
                Ok(())
            })?;
        }
        for engine in &config.engines {
            node.deploy(engine)?;
        }
        info!(
            engines = node.state.deployments.len(),
            oracle = %node.state.oracle.address(),
            operator = %node.state.operator.address(),
            "node deployed"
        );
        Ok(node)
    }

    /// Deploy one engine with its fund and allocator, open its first phase
    /// and register it with the oracle.
    pub fn deploy(&mut self, config: &EngineConfig) -> Result<(), NodeError> {
        let owner = self.owner.clone();
        let token = self.token.clone();
        self.transact(&owner, "deploy", |state, tx| {
            if state.deployments.contains_key(&config.name) {
                return Err(NodeError::Config(format!("engine {:?} already deployed", config.name)));
            }
            for (address, what) in config.component_addresses() {
                if address == owner || address == token || state.is_component(&address) {
                    return Err(NodeError::Config(format!("address {address} of {what} is already taken")));
                }
            }
            let fund_address = config.fund_address();
            let mut fund = BountyFund::new(
                fund_address.clone(),
                token,
                owner.clone(),
                state.operator.address().clone(),
            );
            let mut engine = ResolutionEngine::new(
                Address::new(config.name.clone()),
                owner.clone(),
                state.oracle.address().clone(),
                state.operator.address().clone(),
                &mut fund,
                config.criterion.clone(),
                config.award_policy,
            )?;
            let allocator = match &config.bounty.allocator {
                AllocatorConfig::Fractional { fraction } => Allocator::Fractional(FractionalBalanceAllocator::new(
                    config.allocator_address(),
                    owner.clone(),
                    Fraction::new(*fraction)?,
                )),
                AllocatorConfig::Fixed { amount } => {
                    Allocator::Fixed(FixedAmountAllocator::new(config.allocator_address(), *amount))
                }
            };
            if !config.bounty.deposit.is_zero() {
                state.ledger.mint(&fund_address, config.bounty.deposit)?;
            }
            engine.set_bounty_allocator(tx, config.allocator_address())?;
            engine.initialize(
                tx,
                BountySource {
                    fund: &mut fund,
                    allocator: &allocator,
                    ledger: &mut state.ledger,
                },
            )?;
            state.oracle.add_resolution_engine(tx, engine.address().clone())?;
            info!(
                engine = %engine.address(),
                criterion = config.criterion.kind(),
                deposit = %config.bounty.deposit,
                "engine deployed"
            );
            state.deployments.insert(
                config.name.clone(),
                Deployment {
                    name: config.name.clone(),
                    engine,
                    fund,
                    allocator,
                },
            );
            Ok(())
        })
    }

    // ── queries ──

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn block_number(&self) -> BlockNumber {
        self.block
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn oracle(&self) -> &Oracle {
        &self.state.oracle
    }

    pub fn operator(&self) -> &Operator {
        &self.state.operator
    }

    pub fn ledger(&self) -> &L {
        &self.state.ledger
    }

    /// Direct ledger access, outside any transaction.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.state.ledger
    }

    pub fn balance_of(&self, wallet: &Address) -> Amount {
        self.state.ledger.balance_of(wallet)
    }

    pub fn deployments(&self) -> impl Iterator<Item = &Deployment> {
        self.state.deployments.values()
    }

    pub fn deployment(&self, name: &str) -> Result<&Deployment, NodeError> {
        self.state
            .deployments
            .get(name)
            .ok_or_else(|| NodeError::UnknownEngine(name.to_string()))
    }

    pub fn engine(&self, name: &str) -> Result<&ResolutionEngine, NodeError> {
        self.deployment(name).map(Deployment::engine)
    }

    pub fn verification_phase_number(&self, name: &str) -> Result<u64, NodeError> {
        Ok(self.engine(name)?.verification_phase_number())
    }

    pub fn phase_metrics(&self, name: &str, phase: u64) -> Result<PhaseMetrics, NodeError> {
        Ok(self.engine(name)?.metrics_by_verification_phase_number(phase))
    }

    pub fn staged_amount(&self, name: &str, wallet: &Address) -> Result<Amount, NodeError> {
        Ok(self.engine(name)?.staged_amount_by_wallet(wallet))
    }

    pub fn calculate_payout(&self, name: &str, wallet: &Address, first: u64, last: u64) -> Result<Amount, NodeError> {
        Ok(self.engine(name)?.calculate_payout(wallet, first, last))
    }

    pub fn is_disablement_timer_expired(&self, name: &str) -> Result<bool, NodeError> {
        let engine = self.engine(name)?;
        Ok(self
            .state
            .operator
            .is_disablement_timer_expired(engine.address(), self.clock.now()))
    }

    pub fn events(&self) -> &[NodeEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<NodeEvent> {
        std::mem::take(&mut self.events)
    }

    // ── token ──

    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: Amount) -> Result<(), NodeError> {
        self.transact(caller, "approve", |state, tx| {
            state.ledger.approve(&tx.caller, spender, amount)?;
            Ok(())
        })
    }

    /// Add tokens to `engine`'s bounty fund. The caller must have approved the fund.
    pub fn deposit(&mut self, caller: &Address, engine: &str, amount: Amount) -> Result<(), NodeError> {
        self.transact(caller, "deposit", |state, tx| {
            let State { ledger, deployments, .. } = state;
            let d = find(deployments, engine)?;
            d.fund.deposit_tokens(tx, amount, ledger)?;
            Ok(())
        })
    }

    // ── oracle ──

    /// Stake through the oracle. `phase` must be the engine's open phase.
    pub fn stake(
        &mut self,
        caller: &Address,
        engine: &str,
        phase: u64,
        status: Status,
        amount: Amount,
    ) -> Result<StakeReceipt, NodeError> {
        self.transact(caller, "stake", |state, tx| {
            let State {
                ledger,
                oracle,
                deployments,
                ..
            } = state;
            let Deployment {
                engine,
                fund,
                allocator,
                ..
            } = find(deployments, engine)?;
            let receipt = oracle.stake(
                tx,
                engine,
                phase,
                status,
                amount,
                BountySource {
                    fund,
                    allocator: &*allocator,
                    ledger,
                },
            )?;
            Ok(receipt)
        })
    }

    pub fn stage_payout(&mut self, caller: &Address, engine: &str, first: u64, last: u64) -> Result<Amount, NodeError> {
        self.transact(caller, "stage_payout", |state, tx| {
            let d = find(&mut state.deployments, engine)?;
            Ok(state.oracle.stage_payout(tx, &mut d.engine, first, last)?)
        })
    }

    pub fn stage_stake(&mut self, caller: &Address, engine: &str) -> Result<Amount, NodeError> {
        self.transact(caller, "stage_stake", |state, tx| {
            let d = find(&mut state.deployments, engine)?;
            Ok(state.oracle.stage_stake(tx, &mut d.engine)?)
        })
    }

    pub fn withdraw(&mut self, caller: &Address, engine: &str, amount: Amount) -> Result<(), NodeError> {
        self.transact(caller, "withdraw", |state, tx| {
            let State {
                ledger,
                oracle,
                deployments,
                ..
            } = state;
            let d = find(deployments, engine)?;
            oracle.withdraw(tx, &mut d.engine, amount, ledger)?;
            Ok(())
        })
    }

    pub fn remove_resolution_engine(&mut self, caller: &Address, engine: &str) -> Result<(), NodeError> {
        self.transact(caller, "remove_resolution_engine", |state, tx| {
            let address = find(&mut state.deployments, engine)?.engine.address().clone();
            state.oracle.remove_resolution_engine(tx, &address)?;
            Ok(())
        })
    }

    // ── operator ──

    pub fn start_disablement_timer(&mut self, caller: &Address, engine: &str, timeout_secs: u64) -> Result<(), NodeError> {
        self.transact(caller, "start_disablement_timer", |state, tx| {
            let d = find(&mut state.deployments, engine)?;
            state.operator.start_disablement_timer(tx, &mut d.engine, timeout_secs)?;
            Ok(())
        })
    }

    pub fn stop_disablement_timer(&mut self, caller: &Address, engine: &str) -> Result<(), NodeError> {
        self.transact(caller, "stop_disablement_timer", |state, tx| {
            let d = find(&mut state.deployments, engine)?;
            state.operator.stop_disablement_timer(tx, &mut d.engine)?;
            Ok(())
        })
    }

    pub fn disable_engine(&mut self, caller: &Address, engine: &str) -> Result<(), NodeError> {
        self.transact(caller, "disable_engine", |state, tx| {
            let d = find(&mut state.deployments, engine)?;
            state.operator.disable(tx, &mut d.engine)?;
            Ok(())
        })
    }

    pub fn withdraw_allocated_bounty(
        &mut self,
        caller: &Address,
        engine: &str,
        wallet: &Address,
    ) -> Result<Amount, NodeError> {
        self.transact(caller, "withdraw_allocated_bounty", |state, tx| {
            let State {
                ledger,
                operator,
                deployments,
                ..
            } = state;
            let d = find(deployments, engine)?;
            Ok(operator.withdraw_allocated_bounty(tx, &mut d.engine, wallet, ledger)?)
        })
    }

    pub fn withdraw_unallocated_bounty(
        &mut self,
        caller: &Address,
        engine: &str,
        wallet: &Address,
    ) -> Result<Amount, NodeError> {
        self.transact(caller, "withdraw_unallocated_bounty", |state, tx| {
            let State {
                ledger,
                operator,
                deployments,
                ..
            } = state;
            let Deployment { engine, fund, .. } = find(deployments, engine)?;
            Ok(operator.withdraw_unallocated_bounty(tx, engine, fund, wallet, ledger)?)
        })
    }

    pub fn set_minimum_timeout(&mut self, caller: &Address, secs: u64) -> Result<(), NodeError> {
        self.transact(caller, "set_minimum_timeout", |state, tx| {
            state.operator.set_minimum_timeout(tx, secs)?;
            Ok(())
        })
    }

    pub fn freeze_operator(&mut self, caller: &Address) -> Result<(), NodeError> {
        self.transact(caller, "freeze_operator", |state, tx| {
            state.operator.freeze(tx)?;
            Ok(())
        })
    }

    // ── engine administration ──

    pub fn set_next_amount(&mut self, caller: &Address, engine: &str, amount: Amount) -> Result<(), NodeError> {
        self.transact(caller, "set_next_amount", |state, tx| {
            find(&mut state.deployments, engine)?.engine.set_next_amount(tx, amount)?;
            Ok(())
        })
    }

    pub fn set_next_alpha(&mut self, caller: &Address, engine: &str, alpha: u64) -> Result<(), NodeError> {
        self.transact(caller, "set_next_alpha", |state, tx| {
            find(&mut state.deployments, engine)?.engine.set_next_alpha(tx, alpha)?;
            Ok(())
        })
    }

    /// `beta` in parts per 10^18.
    pub fn set_next_beta(&mut self, caller: &Address, engine: &str, beta: u64) -> Result<(), NodeError> {
        self.transact(caller, "set_next_beta", |state, tx| {
            find(&mut state.deployments, engine)?.engine.set_next_beta(tx, beta)?;
            Ok(())
        })
    }

    pub fn set_next_gamma(&mut self, caller: &Address, engine: &str, gamma: u64) -> Result<(), NodeError> {
        self.transact(caller, "set_next_gamma", |state, tx| {
            find(&mut state.deployments, engine)?.engine.set_next_gamma(tx, gamma)?;
            Ok(())
        })
    }

    pub fn freeze_engine(&mut self, caller: &Address, engine: &str) -> Result<(), NodeError> {
        self.transact(caller, "freeze_engine", |state, tx| {
            find(&mut state.deployments, engine)?.engine.freeze(tx)?;
            Ok(())
        })
    }

    /// `fraction` in parts per 10^18 of the fund balance.
    pub fn set_bounty_fraction(&mut self, caller: &Address, engine: &str, fraction: u64) -> Result<(), NodeError> {
        self.transact(caller, "set_bounty_fraction", |state, tx| {
            match &mut find(&mut state.deployments, engine)?.allocator {
                Allocator::Fractional(a) => Ok(a.set_fraction(tx, fraction)?),
                Allocator::Fixed(_) => Err(NodeError::NotFractional(engine.to_string())),
            }
        })
    }

    pub fn freeze_allocator(&mut self, caller: &Address, engine: &str) -> Result<(), NodeError> {
        self.transact(caller, "freeze_allocator", |state, tx| {
            match &mut find(&mut state.deployments, engine)?.allocator {
                Allocator::Fractional(a) => Ok(a.freeze(tx)?),
                Allocator::Fixed(_) => Err(NodeError::NotFractional(engine.to_string())),
            }
        })
    }

    // ── roles ──

    pub fn add_role_accessor(
        &mut self,
        caller: &Address,
        component: &Address,
        role: Role,
        accessor: Address,
    ) -> Result<(), NodeError> {
        self.transact(caller, "add_role_accessor", |state, tx| {
            state.roles_mut(component)?.add_role_accessor(tx, role, accessor)?;
            Ok(())
        })
    }

    pub fn remove_role_accessor(
        &mut self,
        caller: &Address,
        component: &Address,
        role: Role,
        accessor: &Address,
    ) -> Result<(), NodeError> {
        self.transact(caller, "remove_role_accessor", |state, tx| {
            state.roles_mut(component)?.remove_role_accessor(tx, role, accessor.clone())?;
            Ok(())
        })
    }

    // ── internals ──

    /// Run `f` as one transaction. On error the state is restored from a
    /// snapshot taken before `f` ran, and no events are recorded.
    ///
    /// The snapshot is a clone of the whole [`State`]: the ledger, and every
    /// deployment with its full phase and metrics history. Each call therefore
    /// costs time and memory linear in the history of all engines, not just the
    /// one it touches.
    fn transact<T>(
        &mut self,
        caller: &Address,
        op: &'static str,
        f: impl FnOnce(&mut State<L>, &TxContext) -> Result<T, NodeError>,
    ) -> Result<T, NodeError> {
        let tx = TxContext::new(caller.clone(), self.block + 1, self.clock.now());
        let snapshot = self.state.clone();
        match f(&mut self.state, &tx) {
            Ok(value) => {
                self.block = tx.block;
                self.collect_events(&tx);
                debug!(op, caller = %caller, block = tx.block, "transaction committed");
                Ok(value)
            }
            Err(err) => {
                self.state = snapshot;
                match &err {
                    NodeError::Oracle(OracleError::PhaseMismatch { .. }) => {
                        debug!(op, caller = %caller, error = %err, "transaction reverted")
                    }
                    _ => warn!(op, caller = %caller, error = %err, "transaction reverted"),
                }
                Err(err)
            }
        }
    }

    fn collect_events(&mut self, tx: &TxContext) {
        let mut batch: Vec<(Address, ComponentEvent)> = Vec::new();
        let State {
            oracle,
            operator,
            deployments,
            ..
        } = &mut self.state;

        let oracle_address = oracle.address().clone();
        batch.extend(roles_events(&oracle_address, oracle.roles_mut()));
        let operator_address = operator.address().clone();
        batch.extend(roles_events(&operator_address, operator.roles_mut()));
        for d in deployments.values_mut() {
            let address = d.engine.address().clone();
            batch.extend(roles_events(&address, d.engine.roles_mut()));
            let address = d.fund.address().clone();
            batch.extend(roles_events(&address, d.fund.roles_mut()));
            if let Allocator::Fractional(a) = &mut d.allocator {
                let address = a.address().clone();
                batch.extend(roles_events(&address, a.roles_mut()));
            }
        }

        batch.extend(
            oracle
                .drain_events()
                .into_iter()
                .map(|e| (oracle_address.clone(), ComponentEvent::Oracle(e))),
        );
        batch.extend(
            operator
                .drain_events()
                .into_iter()
                .map(|e| (operator_address.clone(), ComponentEvent::Operator(e))),
        );
        for d in deployments.values_mut() {
            let engine = d.engine.address().clone();
            batch.extend(
                d.engine
                    .drain_events()
                    .into_iter()
                    .map(|e| (engine.clone(), ComponentEvent::Engine(e))),
            );
            let fund = d.fund.address().clone();
            batch.extend(
                d.fund
                    .drain_events()
                    .into_iter()
                    .map(|e| (fund.clone(), ComponentEvent::Fund(e))),
            );
            let allocator = d.allocator.address().clone();
            batch.extend(
                d.allocator
                    .drain_events()
                    .into_iter()
                    .map(|e| (allocator.clone(), ComponentEvent::Allocator(e))),
            );
        }

        for (source, payload) in batch {
            self.next_seq += 1;
            self.events.push(NodeEvent {
                seq: self.next_seq,
                block: tx.block,
                timestamp: tx.timestamp,
                source,
                payload,
            });
        }
    }
}

fn find<'a>(deployments: &'a mut BTreeMap<String, Deployment>, name: &str) -> Result<&'a mut Deployment, NodeError> {
    deployments
        .get_mut(name)
        .ok_or_else(|| NodeError::UnknownEngine(name.to_string()))
}

fn roles_events(source: &Address, roles: &mut RoleRegistry) -> Vec<(Address, ComponentEvent)> {
    roles
        .drain_events()
        .into_iter()
        .map(|e| (source.clone(), ComponentEvent::Roles(e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MintConfig;
    use verity_bounty::FundEvent;
    use verity_criteria::{AbsoluteThreshold, Criterion};
    use verity_engine::EngineEvent;
    use verity_rbac::RbacEvent;
    use verity_types::PARTS_PER as PARTS;

    fn wallet(name: &str) -> Address {
        Address::new(name)
    }

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    fn config() -> NodeConfig {
        let mut config = NodeConfig::default();
        config.token.mints.push(MintConfig {
            wallet: wallet("a1"),
            amount: amt(500),
        });
        let mut engine = EngineConfig::new(
            "naive",
            Criterion::AbsoluteThreshold(AbsoluteThreshold::new(amt(100))),
        );
        engine.bounty.deposit = amt(100);
        config.engines.push(engine);
        let mut fixed = EngineConfig::new("fixed", Criterion::default());
        fixed.bounty.deposit = amt(50);
        fixed.bounty.allocator = AllocatorConfig::Fixed { amount: amt(20) };
        config.engines.push(fixed);
        config
    }

    #[test]
    fn deployment_opens_phase_one_with_bounty() {
        let node = OracleNode::new(&config()).unwrap();
        assert_eq!(node.verification_phase_number("naive").unwrap(), 1);
        assert_eq!(node.phase_metrics("naive", 1).unwrap().bounty_amount, amt(10));
        assert_eq!(node.phase_metrics("fixed", 1).unwrap().bounty_amount, amt(20));
        assert_eq!(node.balance_of(&wallet("naive.fund")), amt(90));
        assert!(node.oracle().has_resolution_engine(&wallet("naive")));
        assert!(node.oracle().has_resolution_engine(&wallet("fixed")));
        assert_eq!(node.deployments().count(), 2);
    }

    #[test]
    fn deployment_events_are_logged_in_order() {
        let node = OracleNode::new(&config()).unwrap();
        let events = node.events();
        assert!(events.windows(2).all(|w| w[0].seq + 1 == w[1].seq));
        let naive: Vec<_> = events.iter().filter(|e| e.source == wallet("naive")).collect();
        assert!(matches!(
            naive.last().map(|e| &e.payload),
            Some(ComponentEvent::Engine(EngineEvent::VerificationPhaseOpened { phase_number: 1, .. }))
        ));
        assert!(events.iter().any(|e| matches!(
            &e.payload,
            ComponentEvent::Fund(FundEvent::TokensAllocated { amount, .. }) if *amount == amt(10)
        )));
    }

    #[test]
    fn unknown_engine_is_rejected_without_advancing_the_block() {
        let mut node = OracleNode::new(&config()).unwrap();
        let block = node.block_number();
        assert!(matches!(
            node.stake(&wallet("a1"), "nope", 1, Status::True, amt(1)),
            Err(NodeError::UnknownEngine(_))
        ));
        assert_eq!(node.block_number(), block);
    }

    #[test]
    fn failed_stake_leaves_no_trace() {
        let mut node = OracleNode::new(&config()).unwrap();
        let logged = node.events().len();
        // No allowance for the oracle yet.
        assert!(matches!(
            node.stake(&wallet("a1"), "naive", 1, Status::True, amt(10)),
            Err(NodeError::Oracle(_))
        ));
        assert_eq!(node.events().len(), logged);
        assert_eq!(node.balance_of(&wallet("a1")), amt(500));
        assert!(node.phase_metrics("naive", 1).unwrap().stake_amount.is_zero());
    }

    #[test]
    fn deploy_rejects_addresses_already_taken() {
        let mut node = OracleNode::new(&config()).unwrap();
        let deployed = node.deployments().count();
        for name in ["naive.fund", "fixed.allocator", "oracle", "owner"] {
            assert!(
                matches!(
                    node.deploy(&EngineConfig::new(name, Criterion::default())),
                    Err(NodeError::Config(_))
                ),
                "{name}"
            );
        }
        assert_eq!(node.deployments().count(), deployed);
    }

    #[test]
    fn fraction_admin_requires_fractional_allocator() {
        let mut node = OracleNode::new(&config()).unwrap();
        let owner = wallet("owner");
        node.set_bounty_fraction(&owner, "naive", PARTS / 2).unwrap();
        assert!(matches!(
            node.set_bounty_fraction(&owner, "fixed", PARTS / 2),
            Err(NodeError::NotFractional(_))
        ));
        node.freeze_allocator(&owner, "naive").unwrap();
        assert!(matches!(
            node.set_bounty_fraction(&owner, "naive", 1),
            Err(NodeError::Bounty(_))
        ));
    }

    #[test]
    fn role_accessors_managed_by_component_address() {
        let mut node = OracleNode::new(&config()).unwrap();
        let owner = wallet("owner");
        node.add_role_accessor(&owner, &wallet("oracle"), Role::OWNER, wallet("deputy"))
            .unwrap();
        assert!(matches!(
            node.events().last().map(|e| &e.payload),
            Some(ComponentEvent::Roles(RbacEvent::RoleAccessorAdded { .. }))
        ));
        // The deputy can now register engines on the oracle.
        node.remove_resolution_engine(&wallet("deputy"), "fixed").unwrap();
        assert!(!node.oracle().has_resolution_engine(&wallet("fixed")));

        node.remove_role_accessor(&owner, &wallet("oracle"), Role::OWNER, &wallet("deputy"))
            .unwrap();
        assert!(node
            .remove_resolution_engine(&wallet("deputy"), "naive")
            .is_err());
        assert!(matches!(
            node.add_role_accessor(&owner, &wallet("ghost"), Role::OWNER, wallet("x")),
            Err(NodeError::UnknownComponent(_))
        ));
    }
}
