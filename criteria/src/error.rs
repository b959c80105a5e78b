use thiserror::Error;
use verity_types::TypesError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CriterionError {
    #[error("parameter {parameter} does not apply to a {kind} criterion")]
    ParameterMismatch {
        parameter: &'static str,
        kind: &'static str,
    },

    #[error(transparent)]
    Types(#[from] TypesError),
}
