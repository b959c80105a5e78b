//! Shared, thread-safe access to a node.
//!
//! All engine operations are serialised through one mutex, so concurrent
//! wallets see the same sequential, all-or-nothing behaviour as a single
//! caller. Races between wallets surface as stale-phase rejections.

use std::sync::{Arc, Mutex};

use verity_oracle::StakeReceipt;
use verity_token::{InMemoryLedger, TokenLedger};
use verity_types::{Address, Amount, Status};

use crate::{NodeError, OracleNode};

pub struct NodeHandle<L = InMemoryLedger> {
    inner: Arc<Mutex<OracleNode<L>>>,
}

impl<L> Clone for NodeHandle<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: TokenLedger + Clone> NodeHandle<L> {
    pub fn new(node: OracleNode<L>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(node)),
        }
    }

    /// Run `f` with exclusive access to the node.
    pub fn with<T>(&self, f: impl FnOnce(&mut OracleNode<L>) -> Result<T, NodeError>) -> Result<T, NodeError> {
        let mut node = self.inner.lock().map_err(|_| NodeError::Poisoned)?;
        f(&mut node)
    }

    pub fn stake(
        &self,
        caller: &Address,
        engine: &str,
        phase: u64,
        status: Status,
        amount: Amount,
    ) -> Result<StakeReceipt, NodeError> {
        self.with(|node| node.stake(caller, engine, phase, status, amount))
    }

    pub fn verification_phase_number(&self, engine: &str) -> Result<u64, NodeError> {
        self.with(|node| node.verification_phase_number(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineConfig, MintConfig, NodeConfig};
    use verity_criteria::{AbsoluteThreshold, Criterion};

    fn wallet(name: &str) -> Address {
        Address::new(name)
    }

    #[test]
    fn clones_share_one_node() {
        let mut config = NodeConfig::default();
        config.token.mints.push(MintConfig {
            wallet: wallet("a1"),
            amount: Amount::from(100u64),
        });
        let mut engine = EngineConfig::new(
            "naive",
            Criterion::AbsoluteThreshold(AbsoluteThreshold::new(Amount::from(50u64))),
        );
        engine.bounty.deposit = Amount::from(100u64);
        config.engines.push(engine);

        let handle = NodeHandle::new(OracleNode::new(&config).unwrap());
        let other = handle.clone();
        handle
            .with(|node| node.approve(&wallet("a1"), &wallet("oracle"), Amount::from(100u64)))
            .unwrap();
        other
            .stake(&wallet("a1"), "naive", 1, Status::True, Amount::from(60u64))
            .unwrap();
        assert_eq!(handle.verification_phase_number("naive").unwrap(), 2);
        assert_eq!(
            handle.with(|node| node.staged_amount("naive", &wallet("a1"))).unwrap(),
            Amount::from(10u64)
        );
    }
}
