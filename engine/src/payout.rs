//! Payout calculus.
//!
//! For a closed phase with winning side `W` and losing side `L`, a wallet
//! with stake `w` on `W` receives
//!
//! ```text
//! w + floor(w * (bounty + L) / W)
//! ```
//!
//! where `bounty` is zero if the phase did not award it. A wallet's stake on
//! the losing side contributes nothing. Summed over the winners this never
//! exceeds `bounty + L + W`.

use crate::{StakeMetrics, VerificationPhase};
use verity_types::Amount;

/// One wallet's payout from one phase. Zero unless the phase has closed.
pub fn phase_payout(phase: &VerificationPhase, wallet: &StakeMetrics) -> Amount {
    if !phase.is_closed() {
        return Amount::ZERO;
    }
    let Some(winner) = phase.verification_status.winner() else {
        return Amount::ZERO;
    };
    let own = wallet.stake(winner);
    if own.is_zero() {
        return Amount::ZERO;
    }
    let winning_total = phase.stakes.stake(winner);
    let losing_total = phase.stakes.stake(winner.opposite());
    let bounty = if phase.bounty_awarded {
        phase.bounty_amount
    } else {
        Amount::ZERO
    };
    let pool = bounty.saturating_add(losing_total);
    // `own <= winning_total`, so the share is at most `pool` and always fits.
    let share = own.mul_div(pool, winning_total).unwrap_or(pool);
    own.saturating_add(share)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PhaseState;
    use verity_types::{Status, VerificationStatus};

    fn amt(v: u64) -> Amount {
        Amount::from(v)
    }

    fn closed(t: u64, f: u64, bounty: u64, awarded: bool) -> VerificationPhase {
        let mut phase = VerificationPhase::open(1, 0, amt(bounty));
        phase.stakes.add(Status::True, amt(t)).unwrap();
        phase.stakes.add(Status::False, amt(f)).unwrap();
        phase.state = PhaseState::Closed;
        phase.verification_status = phase.leading_status().into();
        phase.bounty_awarded = awarded;
        phase
    }

    fn stake(t: u64, f: u64) -> StakeMetrics {
        StakeMetrics {
            true_stake_amount: amt(t),
            false_stake_amount: amt(f),
        }
    }

    #[test]
    fn awarded_bounty_is_shared() {
        let phase = closed(100, 50, 10, true);
        assert_eq!(phase_payout(&phase, &stake(10, 0)), amt(16));
        assert_eq!(phase_payout(&phase, &stake(90, 0)), amt(144));
    }

    #[test]
    fn unawarded_bounty_is_not_shared() {
        let phase = closed(100, 50, 9, false);
        assert_eq!(phase_payout(&phase, &stake(10, 0)), amt(15));
    }

    #[test]
    fn losers_forfeit() {
        let phase = closed(100, 50, 10, true);
        assert_eq!(phase_payout(&phase, &stake(0, 50)), Amount::ZERO);
        assert_eq!(phase_payout(&phase, &stake(10, 50)), amt(16));
    }

    #[test]
    fn open_phase_pays_nothing() {
        let mut phase = closed(100, 50, 10, true);
        phase.state = PhaseState::Opened;
        phase.verification_status = VerificationStatus::Null;
        assert_eq!(phase_payout(&phase, &stake(10, 0)), Amount::ZERO);
    }
}
