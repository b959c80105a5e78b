//! Closing criteria for verification phases.
//!
//! A criterion looks at the running tally of the open phase and answers two
//! questions: may the phase close now, and how many more tokens does a given
//! status still need before it could.

pub mod absolute;
pub mod error;
pub mod tri;

pub use absolute::AbsoluteThreshold;
pub use error::CriterionError;
pub use tri::TriCriterion;

use serde::{Deserialize, Serialize};
use verity_types::{Amount, Fraction, Status};

/// Stake totals of the open phase, as seen by a criterion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseTally {
    pub true_stake: Amount,
    pub false_stake: Amount,
    pub number_of_wallets: u64,
    pub bounty_amount: Amount,
}

impl PhaseTally {
    pub fn stake(&self, status: Status) -> Amount {
        match status {
            Status::True => self.true_stake,
            Status::False => self.false_stake,
        }
    }

    pub fn total(&self) -> Amount {
        self.true_stake.saturating_add(self.false_stake)
    }
}

pub trait CriterionStrategy {
    /// Whether the phase may close.
    fn criteria_met(&self, tally: &PhaseTally) -> bool;

    /// Additional tokens `status` still needs. Zero once the token gates are met.
    fn delta_amount(&self, tally: &PhaseTally, status: Status) -> Amount;
}

/// The criterion an engine runs, selected at deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    AbsoluteThreshold(AbsoluteThreshold),
    TriCriterion(TriCriterion),
    /// Deployed with the alpha/beta/gamma parameter set and evaluated with the same gates.
    Bergen(TriCriterion),
}

impl Criterion {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AbsoluteThreshold(_) => "absolute_threshold",
            Self::TriCriterion(_) => "tri_criterion",
            Self::Bergen(_) => "bergen",
        }
    }

    pub fn as_tri(&self) -> Option<&TriCriterion> {
        match self {
            Self::TriCriterion(t) | Self::Bergen(t) => Some(t),
            Self::AbsoluteThreshold(_) => None,
        }
    }

    fn tri_mut(&mut self, parameter: &'static str) -> Result<&mut TriCriterion, CriterionError> {
        let kind = self.kind();
        match self {
            Self::TriCriterion(t) | Self::Bergen(t) => Ok(t),
            Self::AbsoluteThreshold(_) => Err(CriterionError::ParameterMismatch { parameter, kind }),
        }
    }

    pub fn set_amount(&mut self, amount: Amount) -> Result<(), CriterionError> {
        match self {
            Self::AbsoluteThreshold(a) => {
                a.amount = amount;
                Ok(())
            }
            _ => Err(CriterionError::ParameterMismatch {
                parameter: "amount",
                kind: self.kind(),
            }),
        }
    }

    pub fn set_alpha(&mut self, alpha: u64) -> Result<(), CriterionError> {
        self.tri_mut("alpha")?.alpha = alpha;
        Ok(())
    }

    pub fn set_beta(&mut self, beta: Fraction) -> Result<(), CriterionError> {
        self.tri_mut("beta")?.beta = beta;
        Ok(())
    }

    pub fn set_gamma(&mut self, gamma: u64) -> Result<(), CriterionError> {
        self.tri_mut("gamma")?.gamma = gamma;
        Ok(())
    }
}

impl CriterionStrategy for Criterion {
    fn criteria_met(&self, tally: &PhaseTally) -> bool {
        match self {
            Self::AbsoluteThreshold(a) => a.criteria_met(tally),
            Self::TriCriterion(t) | Self::Bergen(t) => t.criteria_met(tally),
        }
    }

    fn delta_amount(&self, tally: &PhaseTally, status: Status) -> Amount {
        match self {
            Self::AbsoluteThreshold(a) => a.delta_amount(tally, status),
            Self::TriCriterion(t) | Self::Bergen(t) => t.delta_amount(tally, status),
        }
    }
}

impl Default for Criterion {
    fn default() -> Self {
        Self::AbsoluteThreshold(AbsoluteThreshold::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::PARTS_PER;

    #[test]
    fn setters_reject_the_wrong_variant() {
        let mut naive = Criterion::AbsoluteThreshold(AbsoluteThreshold::new(Amount::from(100u64)));
        assert!(matches!(
            naive.set_alpha(2),
            Err(CriterionError::ParameterMismatch { parameter: "alpha", kind: "absolute_threshold" })
        ));
        naive.set_amount(Amount::from(5u64)).unwrap();
        assert_eq!(
            naive,
            Criterion::AbsoluteThreshold(AbsoluteThreshold::new(Amount::from(5u64)))
        );

        let mut bergen = Criterion::Bergen(TriCriterion::new(2, Fraction::new(PARTS_PER / 2).unwrap(), 3));
        assert!(bergen.set_amount(Amount::from(1u64)).is_err());
        bergen.set_gamma(7).unwrap();
        assert_eq!(bergen.as_tri().map(|t| t.gamma), Some(7));
    }

    #[test]
    fn deserializes_tagged_from_toml() {
        let c: Criterion = toml::from_str(
            r#"
            kind = "tri_criterion"
            alpha = 2
            beta = 600000000000000000
            gamma = 3
            "#,
        )
        .unwrap();
        assert_eq!(
            c,
            Criterion::TriCriterion(TriCriterion::new(2, Fraction::new(6 * PARTS_PER / 10).unwrap(), 3))
        );

        let c: Criterion = toml::from_str("kind = \"absolute_threshold\"\namount = \"1000\"").unwrap();
        assert_eq!(c, Criterion::default());
    }
}
