use crate::Role;
use thiserror::Error;
use verity_types::Address;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RbacError {
    #[error("{caller} does not hold role {role}")]
    Unauthorized { role: Role, caller: Address },

    #[error("role {0} is not defined")]
    UnknownRole(Role),
}
