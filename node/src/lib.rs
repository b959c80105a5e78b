//! Verity node: the composition root.
//!
//! The node owns every component of a deployment and is the only place that
//! holds them all at once:
//! - the stake token ledger
//! - the oracle dispatcher
//! - the operator
//! - one resolution engine per configured market, each with its bounty fund
//!   and allocator
//!
//! Every external entry point runs as a transaction: state is snapshotted
//! first and restored if any component fails, so a call either commits all of
//! its effects and events or none of them.

pub mod config;
pub mod error;
pub mod event;
pub mod handle;
pub mod node;
pub mod script;

pub use config::{AllocatorConfig, BountyConfig, EngineConfig, MintConfig, NodeConfig, OperatorConfig, TokenConfig};
pub use error::NodeError;
pub use event::{ComponentEvent, NodeEvent};
pub use handle::NodeHandle;
pub use node::{Deployment, OracleNode};
pub use script::{replay, Action, ActionScript, ReplayFailure, ReplayReport};
