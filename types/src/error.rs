//! Errors raised while constructing core values.

use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("fraction {value} exceeds PARTS_PER ({max})")]
    FractionOutOfRange { value: u64, max: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_can_be_cloned_into_wrapping_errors() {
        let err = TypesError::FractionOutOfRange { value: 2, max: 1 };
        let copy = err.clone();
        assert_eq!(copy, err);
        assert_eq!(copy.to_string(), "fraction 2 exceeds PARTS_PER (1)");
    }
}
