//! The node's ordered event log.

use serde::Serialize;
use verity_bounty::{AllocatorEvent, FundEvent};
use verity_engine::EngineEvent;
use verity_operator::OperatorEvent;
use verity_oracle::OracleEvent;
use verity_rbac::RbacEvent;
use verity_types::{Address, BlockNumber, Timestamp};

/// An event raised by one component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum ComponentEvent {
    Engine(EngineEvent),
    Oracle(OracleEvent),
    Operator(OperatorEvent),
    Fund(FundEvent),
    Allocator(AllocatorEvent),
    Roles(RbacEvent),
}

/// A committed event, stamped with the transaction it belongs to.
///
/// Events of one transaction share a block number and are grouped by
/// component in the order roles, oracle, operator, then each deployment's
/// engine, fund and allocator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeEvent {
    pub seq: u64,
    pub block: BlockNumber,
    pub timestamp: Timestamp,
    pub source: Address,
    pub payload: ComponentEvent,
}

impl NodeEvent {
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn engine_event(&self) -> Option<&EngineEvent> {
        match &self.payload {
            ComponentEvent::Engine(e) => Some(e),
            _ => None,
        }
    }

    pub fn oracle_event(&self) -> Option<&OracleEvent> {
        match &self.payload {
            ComponentEvent::Oracle(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::Amount;

    #[test]
    fn json_line_nests_component_and_event_tags() {
        let event = NodeEvent {
            seq: 3,
            block: 7,
            timestamp: Timestamp::new(100),
            source: Address::new("naive"),
            payload: ComponentEvent::Engine(EngineEvent::Withdrawn {
                wallet: Address::new("a1"),
                amount: Amount::from(5u64),
            }),
        };
        let value: serde_json::Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(value["seq"], 3);
        assert_eq!(value["source"], "naive");
        assert_eq!(value["payload"]["component"], "engine");
        assert_eq!(value["payload"]["event"], "Withdrawn");
        assert_eq!(value["payload"]["amount"], "5");
        assert!(event.engine_event().is_some());
        assert!(event.oracle_event().is_none());
    }

    #[test]
    fn unit_events_serialize_with_both_tags() {
        let event = NodeEvent {
            seq: 1,
            block: 1,
            timestamp: Timestamp::EPOCH,
            source: Address::new("operator"),
            payload: ComponentEvent::Operator(OperatorEvent::Frozen),
        };
        let value: serde_json::Value = serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(value["payload"]["component"], "operator");
        assert_eq!(value["payload"]["event"], "Frozen");
    }
}
