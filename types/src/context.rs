//! Call context.

use crate::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// Monotonic block height of the hosting chain.
pub type BlockNumber = u64;

/// Who is calling, and when.
///
/// Every state-mutating entry point takes a `TxContext`. When a component
/// calls into another one it forwards the context with itself as the caller,
/// so the callee's role checks see the component, not the original wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxContext {
    pub caller: Address,
    pub block: BlockNumber,
    pub timestamp: Timestamp,
}

impl TxContext {
    pub fn new(caller: impl Into<Address>, block: BlockNumber, timestamp: Timestamp) -> Self {
        Self {
            caller: caller.into(),
            block,
            timestamp,
        }
    }

    /// Same block and time, different caller.
    pub fn forwarded(&self, caller: &Address) -> Self {
        Self {
            caller: caller.clone(),
            block: self.block,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarding_keeps_block_and_time() {
        let tx = TxContext::new("alice", 7, Timestamp::new(100));
        let fwd = tx.forwarded(&Address::new("oracle"));
        assert_eq!(fwd.caller.as_str(), "oracle");
        assert_eq!(fwd.block, 7);
        assert_eq!(fwd.timestamp, Timestamp::new(100));
    }
}
