//! Resolution engine state machine.

use crate::{phase_payout, EngineError, EngineEvent, PhaseMetrics, PhaseState, StakeMetrics, VerificationPhase};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, info};
use verity_bounty::{BountyAllocator, BountyFund};
use verity_criteria::{Criterion, CriterionStrategy, PhaseTally};
use verity_rbac::{AccessControl, Role, RoleRegistry};
use verity_token::TokenLedger;
use verity_types::{Address, Amount, BlockNumber, Fraction, Status, TxContext, VerificationStatus};

/// Actions the operator can switch off independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineAction {
    Stake,
    Resolve,
}

impl fmt::Display for EngineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stake => f.write_str("STAKE"),
            Self::Resolve => f.write_str("RESOLVE"),
        }
    }
}

/// When a closing phase hands its bounty to the winners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyAwardPolicy {
    /// Every closed phase awards its bounty.
    #[default]
    Always,
    /// Only a phase whose outcome differs from the previous phase's awards it.
    /// Unawarded bounties stay in the engine until the operator sweeps them.
    OnStatusChange,
}

/// Where the next phase's bounty comes from.
pub struct BountySource<'a> {
    pub fund: &'a mut BountyFund,
    pub allocator: &'a dyn BountyAllocator,
    pub ledger: &'a mut dyn TokenLedger,
}

/// The resolution engine.
///
/// Only the oracle may stake, resolve and stage; only the operator may
/// disable actions and sweep the bounty; only the owner may configure.
#[derive(Clone, Debug)]
pub struct ResolutionEngine {
    address: Address,
    roles: RoleRegistry,
    oracle: Address,
    operator: Address,
    bounty_fund: Address,
    bounty_allocator: Option<Address>,
    frozen: bool,
    disabled: BTreeSet<EngineAction>,
    award_policy: BountyAwardPolicy,
    criterion: Criterion,
    /// Swapped into `criterion` when the next phase opens.
    next_criterion: Criterion,
    phases: BTreeMap<u64, VerificationPhase>,
    phase_number: u64,
    latest_block: BlockNumber,
    wallet_phase_metrics: BTreeMap<u64, HashMap<Address, StakeMetrics>>,
    wallet_metrics: HashMap<Address, StakeMetrics>,
    block_metrics: BTreeMap<BlockNumber, StakeMetrics>,
    staged: HashMap<Address, Amount>,
    /// Phases whose payout each wallet has already staged.
    payouts_staged: HashMap<Address, BTreeSet<u64>>,
    /// Open-phase stake already swept back to each wallet.
    stakes_staged: HashMap<(u64, Address), Amount>,
    /// Bounties of closed phases that were not awarded.
    retained_bounty: Amount,
    bounty_swept: bool,
    pending_events: Vec<EngineEvent>,
}

impl ResolutionEngine {
    /// Create an engine and bind `fund` to it. Fails if the fund is already bound.
    pub fn new(
        address: Address,
        owner: Address,
        oracle: Address,
        operator: Address,
        fund: &mut BountyFund,
        criterion: Criterion,
        award_policy: BountyAwardPolicy,
    ) -> Result<Self, EngineError> {
        fund.set_resolution_engine(address.clone())?;
        let mut roles = RoleRegistry::new(owner);
        roles.grant(Role::ORACLE, oracle.clone());
        roles.grant(Role::OPERATOR, operator.clone());
        Ok(Self {
            address,
            roles,
            oracle,
            operator,
            bounty_fund: fund.address().clone(),
            bounty_allocator: None,
            frozen: false,
            disabled: BTreeSet::new(),
            award_policy,
            criterion: criterion.clone(),
            next_criterion: criterion,
            phases: BTreeMap::new(),
            phase_number: 0,
            latest_block: 0,
            wallet_phase_metrics: BTreeMap::new(),
            wallet_metrics: HashMap::new(),
            block_metrics: BTreeMap::new(),
            staged: HashMap::new(),
            payouts_staged: HashMap::new(),
            stakes_staged: HashMap::new(),
            retained_bounty: Amount::ZERO,
            bounty_swept: false,
            pending_events: Vec::new(),
        })
    }

    // ── accessors ──

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn oracle(&self) -> &Address {
        &self.oracle
    }

    pub fn operator(&self) -> &Address {
        &self.operator
    }

    pub fn bounty_fund(&self) -> &Address {
        &self.bounty_fund
    }

    pub fn bounty_allocator(&self) -> Option<&Address> {
        self.bounty_allocator.as_ref()
    }

    pub fn frozen(&self) -> bool {
        self.frozen
    }

    pub fn award_policy(&self) -> BountyAwardPolicy {
        self.award_policy
    }

    pub fn criterion(&self) -> &Criterion {
        &self.criterion
    }

    pub fn next_criterion(&self) -> &Criterion {
        &self.next_criterion
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn roles_mut(&mut self) -> &mut RoleRegistry {
        &mut self.roles
    }

    pub fn is_enabled(&self, action: EngineAction) -> bool {
        !self.disabled.contains(&action)
    }

    pub fn retained_bounty(&self) -> Amount {
        self.retained_bounty
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── queries ──

    /// Number of the currently open phase; 0 before `initialize`.
    pub fn verification_phase_number(&self) -> u64 {
        self.phase_number
    }

    pub fn verification_phase(&self, number: u64) -> Option<&VerificationPhase> {
        self.phases.get(&number)
    }

    /// Outcome of the most recently closed phase.
    pub fn verification_status(&self) -> VerificationStatus {
        self.phase_number
            .checked_sub(1)
            .and_then(|n| self.phases.get(&n))
            .map(|p| p.verification_status)
            .unwrap_or_default()
    }

    /// Tally of the open phase, if any.
    pub fn current_tally(&self) -> Option<PhaseTally> {
        self.current_phase().map(VerificationPhase::tally)
    }

    pub fn criteria_met(&self) -> bool {
        self.current_tally()
            .is_some_and(|t| self.criterion.criteria_met(&t))
    }

    /// Tokens `status` still needs before the open phase could close.
    pub fn resolution_delta_amount(&self, status: Status) -> Amount {
        let tally = self.current_tally().unwrap_or_default();
        self.criterion.delta_amount(&tally, status)
    }

    /// Default (unopened) metrics for phases that do not exist.
    pub fn metrics_by_verification_phase_number(&self, number: u64) -> PhaseMetrics {
        self.phases
            .get(&number)
            .map(|p| PhaseMetrics::from_phase(p, self.latest_block))
            .unwrap_or_default()
    }

    pub fn metrics_by_verification_phase_number_and_wallet(
        &self,
        number: u64,
        wallet: &Address,
    ) -> StakeMetrics {
        self.wallet_phase(number, wallet)
    }

    pub fn metrics_by_wallet(&self, wallet: &Address) -> StakeMetrics {
        self.wallet_metrics.get(wallet).copied().unwrap_or_default()
    }

    pub fn metrics_by_block_number(&self, block: BlockNumber) -> StakeMetrics {
        self.block_metrics.get(&block).copied().unwrap_or_default()
    }

    pub fn staged_amount_by_wallet(&self, wallet: &Address) -> Amount {
        self.staged.get(wallet).copied().unwrap_or_default()
    }

    /// Payout owed to `wallet` over phases `first..=last`, ignoring what was
    /// already staged. `last` is clamped to the current phase.
    pub fn calculate_payout(&self, wallet: &Address, first: u64, last: u64) -> Amount {
        let last = last.min(self.phase_number);
        if first > last {
            return Amount::ZERO;
        }
        self.phases
            .range(first..=last)
            .map(|(n, phase)| phase_payout(phase, &self.wallet_phase(*n, wallet)))
            .fold(Amount::ZERO, Amount::saturating_add)
    }

    // ── owner configuration ──

    pub fn freeze(&mut self, tx: &TxContext) -> Result<(), EngineError> {
        self.require_configurable(tx)?;
        self.frozen = true;
        info!(engine = %self.address, "engine frozen");
        self.pending_events.push(EngineEvent::Frozen);
        Ok(())
    }

    pub fn set_bounty_allocator(&mut self, tx: &TxContext, allocator: Address) -> Result<(), EngineError> {
        self.require_configurable(tx)?;
        info!(engine = %self.address, allocator = %allocator, "bounty allocator set");
        self.bounty_allocator = Some(allocator.clone());
        self.pending_events
            .push(EngineEvent::BountyAllocatorSet { allocator });
        Ok(())
    }

    pub fn set_next_amount(&mut self, tx: &TxContext, amount: Amount) -> Result<(), EngineError> {
        self.require_configurable(tx)?;
        self.next_criterion.set_amount(amount)?;
        self.pending_events.push(EngineEvent::NextAmountSet { amount });
        Ok(())
    }

    pub fn set_next_alpha(&mut self, tx: &TxContext, alpha: u64) -> Result<(), EngineError> {
        self.require_configurable(tx)?;
        self.next_criterion.set_alpha(alpha)?;
        self.pending_events.push(EngineEvent::NextAlphaSet { alpha });
        Ok(())
    }

    /// `beta` is given in parts per `PARTS_PER`.
    pub fn set_next_beta(&mut self, tx: &TxContext, beta: u64) -> Result<(), EngineError> {
        self.require_configurable(tx)?;
        let beta = Fraction::new(beta)?;
        self.next_criterion.set_beta(beta)?;
        self.pending_events.push(EngineEvent::NextBetaSet { beta });
        Ok(())
    }

    pub fn set_next_gamma(&mut self, tx: &TxContext, gamma: u64) -> Result<(), EngineError> {
        self.require_configurable(tx)?;
        self.next_criterion.set_gamma(gamma)?;
        self.pending_events.push(EngineEvent::NextGammaSet { gamma });
        Ok(())
    }

    /// Open phase 1. Owner only, once, and only after the allocator is set.
    pub fn initialize(&mut self, tx: &TxContext, source: BountySource<'_>) -> Result<(), EngineError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.phase_number != 0 {
            return Err(EngineError::AlreadyInitialized);
        }
        let bounty = self.allocate_bounty(tx, source)?;
        self.observe(tx);
        self.open_phase(tx, bounty);
        Ok(())
    }

    // ── operator controls ──

    pub fn disable(&mut self, tx: &TxContext, action: EngineAction) -> Result<(), EngineError> {
        self.roles.require(&Role::OPERATOR, &tx.caller)?;
        if !self.disabled.insert(action) {
            return Err(EngineError::AlreadyDisabled(action));
        }
        info!(engine = %self.address, %action, "action disabled");
        self.pending_events.push(EngineEvent::Disabled { action });
        Ok(())
    }

    pub fn enable(&mut self, tx: &TxContext, action: EngineAction) -> Result<(), EngineError> {
        self.roles.require(&Role::OPERATOR, &tx.caller)?;
        if !self.disabled.remove(&action) {
            return Err(EngineError::AlreadyEnabled(action));
        }
        info!(engine = %self.address, %action, "action enabled");
        self.pending_events.push(EngineEvent::Enabled { action });
        Ok(())
    }

    /// Stage the bounty still held for the open phase, plus any retained
    /// bounties, to `wallet`. Requires RESOLVE disabled. Repeats stage zero.
    pub fn stage_bounty(&mut self, tx: &TxContext, wallet: &Address) -> Result<Amount, EngineError> {
        self.roles.require(&Role::OPERATOR, &tx.caller)?;
        self.require_disabled(EngineAction::Resolve)?;
        let amount = self.unswept_bounty();
        let staged = self
            .staged_amount_by_wallet(wallet)
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;
        self.mark_bounty_swept();
        self.staged.insert(wallet.clone(), staged);
        info!(engine = %self.address, wallet = %wallet, amount = %amount, "bounty staged");
        self.pending_events.push(EngineEvent::BountyStaged {
            wallet: wallet.clone(),
            amount,
        });
        Ok(amount)
    }

    /// Like [`stage_bounty`](Self::stage_bounty) but transfers the tokens straight out.
    pub fn withdraw_bounty(
        &mut self,
        tx: &TxContext,
        wallet: &Address,
        ledger: &mut dyn TokenLedger,
    ) -> Result<Amount, EngineError> {
        self.roles.require(&Role::OPERATOR, &tx.caller)?;
        self.require_disabled(EngineAction::Resolve)?;
        let amount = self.unswept_bounty();
        if !amount.is_zero() {
            ledger.transfer(&self.address, wallet, amount)?;
        }
        self.mark_bounty_swept();
        info!(engine = %self.address, wallet = %wallet, amount = %amount, "bounty withdrawn");
        self.pending_events.push(EngineEvent::BountyWithdrawn {
            wallet: wallet.clone(),
            amount,
        });
        Ok(amount)
    }

    // ── oracle entry points ──

    /// Record `amount` staked by `wallet` on `status` in the open phase.
    ///
    /// Only updates metrics; the oracle calls
    /// [`resolve_if_criteria_met`](Self::resolve_if_criteria_met) afterwards.
    pub fn stake(
        &mut self,
        tx: &TxContext,
        wallet: &Address,
        status: Status,
        amount: Amount,
    ) -> Result<(), EngineError> {
        self.roles.require(&Role::ORACLE, &tx.caller)?;
        self.require_enabled(EngineAction::Stake)?;
        let phase = self.current_phase().ok_or(EngineError::NotInitialized)?;
        let number = phase.number;

        let mut phase_stakes = phase.stakes;
        let mut wallet_phase = self.wallet_phase(number, wallet);
        let mut wallet_total = self.metrics_by_wallet(wallet);
        let mut block = self.metrics_by_block_number(tx.block);
        let first_stake = wallet_phase.stake_amount().is_zero() && !amount.is_zero();
        phase_stakes.add(status, amount).ok_or(EngineError::Overflow)?;
        wallet_phase.add(status, amount).ok_or(EngineError::Overflow)?;
        wallet_total.add(status, amount).ok_or(EngineError::Overflow)?;
        block.add(status, amount).ok_or(EngineError::Overflow)?;

        self.observe(tx);
        if let Some(phase) = self.phases.get_mut(&number) {
            phase.stakes = phase_stakes;
            if first_stake {
                phase.number_of_wallets += 1;
            }
        }
        self.wallet_phase_metrics
            .entry(number)
            .or_default()
            .insert(wallet.clone(), wallet_phase);
        self.wallet_metrics.insert(wallet.clone(), wallet_total);
        self.block_metrics.insert(tx.block, block);

        debug!(engine = %self.address, phase = number, wallet = %wallet, %status, amount = %amount, "staked");
        self.pending_events.push(EngineEvent::Staked {
            wallet: wallet.clone(),
            phase_number: number,
            status,
            amount,
        });
        Ok(())
    }

    /// Close the open phase if its criterion holds and open the next one.
    ///
    /// Returns whether a phase was closed. An unmet criterion is not an error.
    pub fn resolve_if_criteria_met(
        &mut self,
        tx: &TxContext,
        source: BountySource<'_>,
    ) -> Result<bool, EngineError> {
        self.roles.require(&Role::ORACLE, &tx.caller)?;
        self.require_enabled(EngineAction::Resolve)?;
        let phase = self.current_phase().ok_or(EngineError::NotInitialized)?;
        if !self.criterion.criteria_met(&phase.tally()) {
            return Ok(false);
        }
        let number = phase.number;
        let status = phase.leading_status();
        let bounty_amount = phase.bounty_amount;
        // A bounty the operator already swept can no longer be awarded.
        let bounty_held = !self.bounty_swept;
        let awarded = bounty_held
            && match self.award_policy {
                BountyAwardPolicy::Always => true,
                BountyAwardPolicy::OnStatusChange => {
                    VerificationStatus::from(status) != self.verification_status()
                }
            };
        let retained = if bounty_held && !awarded {
            self.retained_bounty
                .checked_add(bounty_amount)
                .ok_or(EngineError::Overflow)?
        } else {
            self.retained_bounty
        };
        let next_bounty = self.allocate_bounty(tx, source)?;

        self.observe(tx);
        if let Some(phase) = self.phases.get_mut(&number) {
            phase.state = PhaseState::Closed;
            phase.end_block = tx.block;
            phase.verification_status = status.into();
            phase.bounty_awarded = awarded;
        }
        self.retained_bounty = retained;
        info!(
            engine = %self.address,
            phase = number,
            %status,
            bounty_awarded = awarded,
            "verification phase closed"
        );
        self.pending_events.push(EngineEvent::VerificationPhaseClosed {
            phase_number: number,
            verification_status: status.into(),
            bounty_awarded: awarded,
            end_block: tx.block,
        });
        self.pending_events.push(EngineEvent::Resolved {
            phase_number: number,
        });
        self.open_phase(tx, next_bounty);
        Ok(true)
    }

    /// Stage the payout of every closed phase in `first..=last` not yet staged
    /// for `wallet`. Open phases and repeats contribute zero.
    pub fn stage_payout(
        &mut self,
        tx: &TxContext,
        wallet: &Address,
        first: u64,
        last: u64,
    ) -> Result<Amount, EngineError> {
        self.roles.require(&Role::ORACLE, &tx.caller)?;
        let last = last.min(self.phase_number);
        let mut amount = Amount::ZERO;
        let mut newly_paid = Vec::new();
        if first <= last {
            let paid = self.payouts_staged.get(wallet);
            for (n, phase) in self.phases.range(first..=last) {
                if !phase.is_closed() || paid.is_some_and(|p| p.contains(n)) {
                    continue;
                }
                let payout = phase_payout(phase, &self.wallet_phase(*n, wallet));
                amount = amount.checked_add(payout).ok_or(EngineError::Overflow)?;
                newly_paid.push(*n);
            }
        }
        let staged = self
            .staged_amount_by_wallet(wallet)
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;

        if !newly_paid.is_empty() {
            self.payouts_staged
                .entry(wallet.clone())
                .or_default()
                .extend(newly_paid);
        }
        self.staged.insert(wallet.clone(), staged);
        debug!(engine = %self.address, wallet = %wallet, first, last, amount = %amount, "payout staged");
        self.pending_events.push(EngineEvent::PayoutStaged {
            wallet: wallet.clone(),
            first_phase: first,
            last_phase: last,
            amount,
        });
        Ok(amount)
    }

    /// Credit `amount` to `wallet`'s staged balance.
    pub fn stage(&mut self, tx: &TxContext, wallet: &Address, amount: Amount) -> Result<(), EngineError> {
        self.roles.require(&Role::ORACLE, &tx.caller)?;
        let staged = self
            .staged_amount_by_wallet(wallet)
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;
        self.staged.insert(wallet.clone(), staged);
        debug!(engine = %self.address, wallet = %wallet, amount = %amount, "staged");
        self.pending_events.push(EngineEvent::Staged {
            wallet: wallet.clone(),
            amount,
        });
        Ok(())
    }

    /// Sweep `wallet`'s stake in the open phase back to its staged balance.
    /// Requires RESOLVE disabled. Stake already swept is not swept twice.
    pub fn stage_stake(&mut self, tx: &TxContext, wallet: &Address) -> Result<Amount, EngineError> {
        self.roles.require(&Role::ORACLE, &tx.caller)?;
        self.require_disabled(EngineAction::Resolve)?;
        let number = self
            .current_phase()
            .map(|p| p.number)
            .ok_or(EngineError::NotInitialized)?;
        let key = (number, wallet.clone());
        let total = self.wallet_phase(number, wallet).stake_amount();
        let already = self.stakes_staged.get(&key).copied().unwrap_or_default();
        let amount = total.saturating_sub(already);
        let staged = self
            .staged_amount_by_wallet(wallet)
            .checked_add(amount)
            .ok_or(EngineError::Overflow)?;

        self.stakes_staged.insert(key, total);
        self.staged.insert(wallet.clone(), staged);
        debug!(engine = %self.address, phase = number, wallet = %wallet, amount = %amount, "stake staged");
        self.pending_events.push(EngineEvent::StakeStaged {
            wallet: wallet.clone(),
            phase_number: number,
            amount,
        });
        Ok(amount)
    }

    /// Pay out `amount` of `wallet`'s staged balance.
    pub fn withdraw(
        &mut self,
        tx: &TxContext,
        wallet: &Address,
        amount: Amount,
        ledger: &mut dyn TokenLedger,
    ) -> Result<(), EngineError> {
        self.roles.require(&Role::ORACLE, &tx.caller)?;
        let staged = self.staged_amount_by_wallet(wallet);
        let remaining = staged
            .checked_sub(amount)
            .ok_or_else(|| EngineError::InsufficientStagedBalance {
                wallet: wallet.clone(),
                requested: amount,
                staged,
            })?;
        ledger.transfer(&self.address, wallet, amount)?;
        self.staged.insert(wallet.clone(), remaining);
        info!(engine = %self.address, wallet = %wallet, amount = %amount, "withdrawn");
        self.pending_events.push(EngineEvent::Withdrawn {
            wallet: wallet.clone(),
            amount,
        });
        Ok(())
    }

    // ── internals ──

    fn current_phase(&self) -> Option<&VerificationPhase> {
        self.phases
            .get(&self.phase_number)
            .filter(|p| p.is_open())
    }

    fn wallet_phase(&self, number: u64, wallet: &Address) -> StakeMetrics {
        self.wallet_phase_metrics
            .get(&number)
            .and_then(|m| m.get(wallet))
            .copied()
            .unwrap_or_default()
    }

    fn require_enabled(&self, action: EngineAction) -> Result<(), EngineError> {
        if self.is_enabled(action) {
            Ok(())
        } else {
            Err(EngineError::ActionDisabled(action))
        }
    }

    fn require_disabled(&self, action: EngineAction) -> Result<(), EngineError> {
        if self.is_enabled(action) {
            Err(EngineError::ActionEnabled(action))
        } else {
            Ok(())
        }
    }

    fn require_configurable(&self, tx: &TxContext) -> Result<(), EngineError> {
        self.roles.require(&Role::OWNER, &tx.caller)?;
        if self.frozen {
            return Err(EngineError::Frozen);
        }
        Ok(())
    }

    fn observe(&mut self, tx: &TxContext) {
        self.latest_block = self.latest_block.max(tx.block);
    }

    fn unswept_bounty(&self) -> Amount {
        let current = match self.current_phase() {
            Some(phase) if !self.bounty_swept => phase.bounty_amount,
            _ => Amount::ZERO,
        };
        current.saturating_add(self.retained_bounty)
    }

    fn mark_bounty_swept(&mut self) {
        self.bounty_swept = true;
        self.retained_bounty = Amount::ZERO;
    }

    /// Pull the next bounty from the bound fund. Mutates nothing in the engine.
    fn allocate_bounty(&self, tx: &TxContext, source: BountySource<'_>) -> Result<Amount, EngineError> {
        let allocator = self
            .bounty_allocator
            .as_ref()
            .ok_or(EngineError::AllocatorNotSet)?;
        if source.fund.address() != &self.bounty_fund {
            return Err(EngineError::FundMismatch {
                expected: self.bounty_fund.clone(),
                actual: source.fund.address().clone(),
            });
        }
        if source.allocator.address() != allocator {
            return Err(EngineError::AllocatorMismatch {
                expected: allocator.clone(),
                actual: source.allocator.address().clone(),
            });
        }
        let bounty = source.fund.allocate_tokens(
            &tx.forwarded(&self.address),
            source.allocator,
            source.ledger,
        )?;
        Ok(bounty)
    }

    fn open_phase(&mut self, tx: &TxContext, bounty_amount: Amount) {
        self.phase_number += 1;
        let number = self.phase_number;
        self.criterion = self.next_criterion.clone();
        self.bounty_swept = false;
        self.phases
            .insert(number, VerificationPhase::open(number, tx.block, bounty_amount));
        info!(
            engine = %self.address,
            phase = number,
            bounty = %bounty_amount,
            criterion = self.criterion.kind(),
            "verification phase opened"
        );
        self.pending_events.push(EngineEvent::VerificationPhaseOpened {
            phase_number: number,
            bounty_amount,
            start_block: tx.block,
        });
    }
}
