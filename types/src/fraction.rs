//! Fixed-point fractions over `PARTS_PER`.

use crate::{Amount, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed-point denominator shared by every fractional parameter (10^18).
pub const PARTS_PER: u64 = 1_000_000_000_000_000_000;

/// A value in `[0, 1]` expressed as parts per `PARTS_PER`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Fraction(u64);

impl Fraction {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(PARTS_PER);

    pub fn new(parts: u64) -> Result<Self, TypesError> {
        if parts > PARTS_PER {
            return Err(TypesError::FractionOutOfRange {
                value: parts,
                max: PARTS_PER,
            });
        }
        Ok(Self(parts))
    }

    pub fn parts(&self) -> u64 {
        self.0
    }

    pub fn as_amount(&self) -> Amount {
        Amount::from(self.0)
    }

    /// `floor(amount * self / PARTS_PER)`.
    pub fn of(&self, amount: Amount) -> Amount {
        // The fraction is at most one, so the quotient always fits.
        amount
            .mul_div(self.as_amount(), Amount::from(PARTS_PER))
            .unwrap_or(amount)
    }
}

impl TryFrom<u64> for Fraction {
    type Error = TypesError;
    fn try_from(parts: u64) -> Result<Self, Self::Error> {
        Self::new(parts)
    }
}

impl From<Fraction> for u64 {
    fn from(f: Fraction) -> u64 {
        f.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, PARTS_PER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_values_above_one() {
        assert!(Fraction::new(PARTS_PER).is_ok());
        assert_eq!(
            Fraction::new(PARTS_PER + 1),
            Err(TypesError::FractionOutOfRange {
                value: PARTS_PER + 1,
                max: PARTS_PER
            })
        );
    }

    #[test]
    fn ten_percent_floors() {
        let tenth = Fraction::new(PARTS_PER / 10).unwrap();
        assert_eq!(tenth.of(Amount::from(100u64)), Amount::from(10u64));
        assert_eq!(tenth.of(Amount::from(99u64)), Amount::from(9u64));
        assert_eq!(tenth.of(Amount::ZERO), Amount::ZERO);
    }

    #[test]
    fn deserialize_checks_range() {
        assert!(serde_json::from_str::<Fraction>("100000000000000000").is_ok());
        assert!(serde_json::from_str::<Fraction>("1000000000000000001").is_err());
    }
}
