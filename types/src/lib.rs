//! Fundamental types for the verity staking oracle.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, token amounts, fixed-point fractions, statuses, timestamps and the
//! call context every state-mutating entry point executes in.

pub mod address;
pub mod amount;
pub mod context;
pub mod error;
pub mod fraction;
pub mod status;
pub mod time;

pub use address::Address;
pub use amount::Amount;
pub use context::{BlockNumber, TxContext};
pub use error::TypesError;
pub use fraction::{Fraction, PARTS_PER};
pub use status::{Status, VerificationStatus};
pub use time::{Clock, SystemClock, Timestamp};
