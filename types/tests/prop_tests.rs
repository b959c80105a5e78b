use proptest::prelude::*;

use verity_types::{Amount, Fraction, Timestamp, PARTS_PER};

proptest! {
    /// mul_div agrees with native 128-bit arithmetic for inputs that fit.
    #[test]
    fn mul_div_matches_u128(a in 0u64.., b in 0u64.., c in 1u64..) {
        let expected = (a as u128) * (b as u128) / (c as u128);
        let got = Amount::from(a).mul_div(Amount::from(b), Amount::from(c));
        prop_assert_eq!(got, Some(Amount::from(expected)));
    }

    /// A fraction of an amount never exceeds the amount.
    #[test]
    fn fraction_of_is_bounded(parts in 0u64..=PARTS_PER, amount in 0u128..) {
        let f = Fraction::new(parts).unwrap();
        prop_assert!(f.of(Amount::from(amount)) <= Amount::from(amount));
    }

    /// Fractions above PARTS_PER are always rejected.
    #[test]
    fn fraction_rejects_out_of_range(parts in (PARTS_PER + 1)..) {
        prop_assert!(Fraction::new(parts).is_err());
    }

    /// checked_add/checked_sub are inverses when no overflow occurs.
    #[test]
    fn add_sub_inverse(a in 0u128.., b in 0u128..) {
        let sum = Amount::from(a).checked_add(Amount::from(b)).unwrap();
        prop_assert_eq!(sum.checked_sub(Amount::from(b)), Some(Amount::from(a)));
    }

    /// has_expired is monotonic in `now`.
    #[test]
    fn expiry_monotonic(start in 0u64..1_000_000, dur in 0u64..1_000_000, now in 0u64..3_000_000) {
        let ts = Timestamp::new(start);
        if ts.has_expired(dur, Timestamp::new(now)) {
            prop_assert!(ts.has_expired(dur, Timestamp::new(now + 1)));
        }
    }
}
