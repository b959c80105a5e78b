//! The oracle dispatcher.
//!
//! Wallets never call an engine directly. They stake through the [`Oracle`],
//! naming the engine and the phase number they believe is open. A stale phase
//! number is rejected, so two racing stakes can never both close the same
//! phase. Stakes larger than the engine's remaining delta are capped and the
//! excess is staged straight back to the wallet.

pub mod error;
pub mod oracle;

pub use error::OracleError;
pub use oracle::{Oracle, OracleEvent, StakeReceipt};
