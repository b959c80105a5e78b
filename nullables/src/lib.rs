//! Nullable infrastructure for deterministic testing.
//!
//! The node reads time through the [`Clock`](verity_types::Clock) trait and
//! moves tokens through [`TokenLedger`](verity_token::TokenLedger). This crate
//! provides stand-ins for both that:
//! - return deterministic values
//! - can be controlled programmatically
//! - record what happened so tests can assert on it
//!
//! Usage: swap real implementations for nullables in tests and replays.

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::{NullLedger, RecordedTransfer};
