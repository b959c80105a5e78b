//! Orderly retirement of resolution engines.
//!
//! The [`Operator`] arms a disablement timer on an engine, which stops new
//! stakes straight away. Once the timer has run out the engine can be fully
//! disabled, after which the bounty it still holds and whatever is left in
//! its fund can be swept to a destination wallet.

pub mod error;
pub mod operator;

pub use error::OperatorError;
pub use operator::{DisablementTimer, Operator, OperatorEvent, DEFAULT_MINIMUM_TIMEOUT_SECS};
