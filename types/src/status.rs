//! Binary outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The side a wallet stakes on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    True,
    False,
}

impl Status {
    pub fn opposite(self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
        }
    }
}

/// The recorded outcome of a verification phase. `Null` until it closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Null,
    True,
    False,
}

impl VerificationStatus {
    pub fn winner(self) -> Option<Status> {
        match self {
            Self::Null => None,
            Self::True => Some(Status::True),
            Self::False => Some(Status::False),
        }
    }
}

impl From<Status> for VerificationStatus {
    fn from(s: Status) -> Self {
        match s {
            Status::True => Self::True,
            Status::False => Self::False,
        }
    }
}
