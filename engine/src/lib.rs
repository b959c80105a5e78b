//! The resolution engine.
//!
//! An engine runs a sequence of verification phases. Exactly one phase is
//! open at a time; wallets stake on `True` or `False` through the oracle, and
//! once the engine's criterion is satisfied the phase closes with the larger
//! side as its outcome and the next phase opens with a fresh bounty.
//!
//! Winners of a closed phase share the bounty and the losing side's stake in
//! proportion to their own winning stake. Payouts, refunds and swept stakes
//! are first *staged* per wallet and only leave the engine on `withdraw`.

pub mod engine;
pub mod error;
pub mod events;
pub mod payout;
pub mod phase;

pub use engine::{BountyAwardPolicy, BountySource, EngineAction, ResolutionEngine};
pub use error::EngineError;
pub use events::EngineEvent;
pub use payout::phase_payout;
pub use phase::{PhaseMetrics, PhaseState, StakeMetrics, VerificationPhase};
