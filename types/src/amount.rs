//! Token amount type.
//!
//! Amounts are unsigned 256-bit integers counted in the token's smallest unit.
//! All division truncates toward zero. Products that feed a division are widened
//! to 512 bits so that `a * b / c` never overflows in the intermediate step.

use primitive_types::{U256, U512};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A token amount in raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(U256);

impl Amount {
    pub const ZERO: Self = Self(U256([0; 4]));
    pub const MAX: Self = Self(U256([u64::MAX; 4]));

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, other: Self) -> Option<Self> {
        self.0.checked_mul(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// `floor(self * numerator / denominator)` with a 512-bit intermediate product.
    ///
    /// Returns `None` when `denominator` is zero or the quotient does not fit
    /// back into 256 bits.
    pub fn mul_div(self, numerator: Self, denominator: Self) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }
        let product: U512 = self.0.full_mul(numerator.0);
        let quotient = product / U512::from(denominator.0);
        U256::try_from(quotient).ok().map(Self)
    }

    /// Parse a decimal string such as `"1000000000000000000"`.
    pub fn from_dec_str(s: &str) -> Option<Self> {
        U256::from_dec_str(s.trim()).ok().map(Self)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(U256::from(value))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(U256::from(value))
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl Add for Amount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Amount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Serialized as a decimal string so that values above 2^64 survive JSON and TOML.
// Plain integers are accepted on input for convenience in config files.

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or a decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
        Ok(Amount::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
        u64::try_from(v)
            .map(Amount::from)
            .map_err(|_| E::custom(format!("amount must be non-negative, got {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
        Amount::from_dec_str(v).ok_or_else(|| E::custom(format!("invalid amount: {v:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_truncates() {
        let a = Amount::from(10u64);
        assert_eq!(
            a.mul_div(Amount::from(60u64), Amount::from(100u64)),
            Some(Amount::from(6u64))
        );
        assert_eq!(
            Amount::from(7u64).mul_div(Amount::from(1u64), Amount::from(2u64)),
            Some(Amount::from(3u64))
        );
    }

    #[test]
    fn mul_div_widens_intermediate_product() {
        let half_max = Amount::MAX.mul_div(Amount::from(1u64), Amount::from(2u64)).unwrap();
        assert_eq!(
            half_max.mul_div(Amount::from(4u64), Amount::from(4u64)),
            Some(half_max)
        );
    }

    #[test]
    fn mul_div_by_zero_is_none() {
        assert_eq!(Amount::from(1u64).mul_div(Amount::from(1u64), Amount::ZERO), None);
    }

    #[test]
    fn checked_sub_underflow() {
        assert_eq!(Amount::from(1u64).checked_sub(Amount::from(2u64)), None);
        assert_eq!(Amount::from(1u64).saturating_sub(Amount::from(2u64)), Amount::ZERO);
    }

    #[test]
    fn serde_uses_decimal_strings() {
        let amount = Amount::from(u128::MAX);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, format!("\"{}\"", u128::MAX));
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
        let from_int: Amount = serde_json::from_str("42").unwrap();
        assert_eq!(from_int, Amount::from(42u64));
        assert!(serde_json::from_str::<Amount>("-1").is_err());
    }
}
