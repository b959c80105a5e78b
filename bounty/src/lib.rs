//! Bounty escrow and sizing.
//!
//! A [`BountyFund`] holds the tokens that top up each phase's payout pool. It
//! releases them only to the one engine bound to it, and only in the amount
//! an injected [`BountyAllocator`] computes from the fund's balance.

pub mod allocator;
pub mod error;
pub mod fund;

pub use allocator::{
    Allocator, AllocatorEvent, BountyAllocator, FixedAmountAllocator, FractionalBalanceAllocator,
    DEFAULT_BOUNTY_FRACTION,
};
pub use error::BountyError;
pub use fund::{BountyFund, FundEvent};
