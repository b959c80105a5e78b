//! Role-based access control.
//!
//! Every component owns a [`RoleRegistry`] seeded with an owner. Entry points
//! gate callers through the [`AccessControl`] capability trait, so the check
//! is a predicate over `(role, address)` and not an inheritance chain.

pub mod error;
pub mod registry;

pub use error::RbacError;
pub use registry::{RbacEvent, Role, RoleRegistry};

use verity_types::Address;

/// Capability predicate consumed by state-mutating entry points.
pub trait AccessControl {
    fn is_role_accessor(&self, role: &Role, address: &Address) -> bool;

    /// Fail with [`RbacError::Unauthorized`] unless `address` holds `role`.
    fn require(&self, role: &Role, address: &Address) -> Result<(), RbacError> {
        if self.is_role_accessor(role, address) {
            Ok(())
        } else {
            Err(RbacError::Unauthorized {
                role: role.clone(),
                caller: address.clone(),
            })
        }
    }
}
