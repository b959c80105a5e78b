//! Action scripts: a deterministic sequence of calls replayed against a
//! fresh deployment.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use verity_nullables::NullClock;
use verity_token::{InMemoryLedger, TokenLedger};
use verity_types::{Address, Amount, Status};

use crate::{NodeConfig, NodeError, NodeEvent, OracleNode};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActionScript {
    /// Clock reading, in seconds, when the deployment is created.
    #[serde(default)]
    pub start_time: u64,

    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Approve {
        caller: Address,
        spender: Address,
        amount: Amount,
    },
    Deposit {
        caller: Address,
        engine: String,
        amount: Amount,
    },
    /// Without `phase` the engine's open phase at replay time is used.
    Stake {
        caller: Address,
        engine: String,
        #[serde(default)]
        phase: Option<u64>,
        status: Status,
        amount: Amount,
    },
    StagePayout {
        caller: Address,
        engine: String,
        first: u64,
        last: u64,
    },
    StageStake {
        caller: Address,
        engine: String,
    },
    Withdraw {
        caller: Address,
        engine: String,
        amount: Amount,
    },
    StartDisablementTimer {
        caller: Address,
        engine: String,
        timeout_secs: u64,
    },
    StopDisablementTimer {
        caller: Address,
        engine: String,
    },
    DisableEngine {
        caller: Address,
        engine: String,
    },
    WithdrawAllocatedBounty {
        caller: Address,
        engine: String,
        wallet: Address,
    },
    WithdrawUnallocatedBounty {
        caller: Address,
        engine: String,
        wallet: Address,
    },
    SetNextAmount {
        caller: Address,
        engine: String,
        amount: Amount,
    },
    SetBountyFraction {
        caller: Address,
        engine: String,
        fraction: u64,
    },
    AdvanceTime {
        secs: u64,
    },
}

impl ActionScript {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }
}

/// An action that was rejected during replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplayFailure {
    pub index: usize,
    pub error: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ReplayReport {
    pub events: Vec<NodeEvent>,
    pub failures: Vec<ReplayFailure>,
}

impl<L: TokenLedger + Clone> OracleNode<L> {
    /// Execute one scripted action. Time is not under the node's control, so
    /// `AdvanceTime` is a no-op here and is handled by [`replay`].
    pub fn apply(&mut self, action: &Action) -> Result<(), NodeError> {
        match action {
            Action::Approve { caller, spender, amount } => self.approve(caller, spender, *amount),
            Action::Deposit { caller, engine, amount } => self.deposit(caller, engine, *amount),
            Action::Stake {
                caller,
                engine,
                phase,
                status,
                amount,
            } => {
                let phase = match phase {
                    Some(phase) => *phase,
                    None => self.verification_phase_number(engine)?,
                };
                self.stake(caller, engine, phase, *status, *amount).map(|_| ())
            }
            Action::StagePayout {
                caller,
                engine,
                first,
                last,
            } => self.stage_payout(caller, engine, *first, *last).map(|_| ()),
            Action::StageStake { caller, engine } => self.stage_stake(caller, engine).map(|_| ()),
            Action::Withdraw { caller, engine, amount } => self.withdraw(caller, engine, *amount),
            Action::StartDisablementTimer {
                caller,
                engine,
                timeout_secs,
            } => self.start_disablement_timer(caller, engine, *timeout_secs),
            Action::StopDisablementTimer { caller, engine } => self.stop_disablement_timer(caller, engine),
            Action::DisableEngine { caller, engine } => self.disable_engine(caller, engine),
            Action::WithdrawAllocatedBounty { caller, engine, wallet } => {
                self.withdraw_allocated_bounty(caller, engine, wallet).map(|_| ())
            }
            Action::WithdrawUnallocatedBounty { caller, engine, wallet } => {
                self.withdraw_unallocated_bounty(caller, engine, wallet).map(|_| ())
            }
            Action::SetNextAmount { caller, engine, amount } => self.set_next_amount(caller, engine, *amount),
            Action::SetBountyFraction {
                caller,
                engine,
                fraction,
            } => self.set_bounty_fraction(caller, engine, *fraction),
            Action::AdvanceTime { .. } => Ok(()),
        }
    }
}

/// Deploy `config` on an in-memory ledger driven by a [`NullClock`] and run
/// `script` against it. Rejected actions are recorded and replay continues.
pub fn replay(config: &NodeConfig, script: &ActionScript) -> Result<ReplayReport, NodeError> {
    let clock = Arc::new(NullClock::new(script.start_time));
    let mut node = OracleNode::with_parts(config, InMemoryLedger::new(), clock.clone())?;
    let mut failures = Vec::new();
    for (index, action) in script.actions.iter().enumerate() {
        let result = match action {
            Action::AdvanceTime { secs } => {
                clock.advance(*secs);
                Ok(())
            }
            other => node.apply(other),
        };
        if let Err(err) = result {
            failures.push(ReplayFailure {
                index,
                error: err.to_string(),
            });
        }
    }
    info!(
        actions = script.actions.len(),
        failures = failures.len(),
        events = node.events().len(),
        "replay finished"
    );
    Ok(ReplayReport {
        events: node.drain_events(),
        failures,
    })
}
