//! Role registry: named roles, each with a set of accessor addresses.

use crate::{AccessControl, RbacError};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;
use verity_types::{Address, TxContext};

/// A named role.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const OWNER: Role = Role(Cow::Borrowed("OWNER"));
    pub const ORACLE: Role = Role(Cow::Borrowed("ORACLE"));
    pub const OPERATOR: Role = Role(Cow::Borrowed("OPERATOR"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RbacEvent {
    RoleAdded { role: Role },
    RoleAccessorAdded { role: Role, accessor: Address },
    RoleAccessorRemoved { role: Role, accessor: Address },
}

/// Roles and their accessors. The `OWNER` role always exists.
#[derive(Clone, Debug)]
pub struct RoleRegistry {
    roles: BTreeMap<Role, BTreeSet<Address>>,
    pending_events: Vec<RbacEvent>,
}

impl RoleRegistry {
    pub fn new(owner: Address) -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(Role::OWNER, BTreeSet::from([owner]));
        Self {
            roles,
            pending_events: Vec::new(),
        }
    }

    pub fn roles_count(&self) -> usize {
        self.roles.len()
    }

    pub fn is_role(&self, role: &Role) -> bool {
        self.roles.contains_key(role)
    }

    /// Define a new role (owner only). Re-adding an existing role is a no-op.
    pub fn add_role(&mut self, tx: &TxContext, role: Role) -> Result<(), RbacError> {
        self.require(&Role::OWNER, &tx.caller)?;
        if !self.roles.contains_key(&role) {
            debug!(role = %role, "role added");
            self.roles.insert(role.clone(), BTreeSet::new());
            self.pending_events.push(RbacEvent::RoleAdded { role });
        }
        Ok(())
    }

    pub fn add_role_accessor(
        &mut self,
        tx: &TxContext,
        role: Role,
        accessor: Address,
    ) -> Result<(), RbacError> {
        self.require(&Role::OWNER, &tx.caller)?;
        let members = self
            .roles
            .get_mut(&role)
            .ok_or_else(|| RbacError::UnknownRole(role.clone()))?;
        members.insert(accessor.clone());
        debug!(role = %role, accessor = %accessor, "role accessor added");
        self.pending_events
            .push(RbacEvent::RoleAccessorAdded { role, accessor });
        Ok(())
    }

    pub fn remove_role_accessor(
        &mut self,
        tx: &TxContext,
        role: Role,
        accessor: Address,
    ) -> Result<(), RbacError> {
        self.require(&Role::OWNER, &tx.caller)?;
        let members = self
            .roles
            .get_mut(&role)
            .ok_or_else(|| RbacError::UnknownRole(role.clone()))?;
        members.remove(&accessor);
        debug!(role = %role, accessor = %accessor, "role accessor removed");
        self.pending_events
            .push(RbacEvent::RoleAccessorRemoved { role, accessor });
        Ok(())
    }

    /// Grant a role at construction time, before any owner transaction exists.
    pub fn grant(&mut self, role: Role, accessor: Address) {
        self.roles.entry(role).or_default().insert(accessor);
    }

    pub fn accessors(&self, role: &Role) -> impl Iterator<Item = &Address> {
        self.roles.get(role).into_iter().flatten()
    }

    pub fn drain_events(&mut self) -> Vec<RbacEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

impl AccessControl for RoleRegistry {
    fn is_role_accessor(&self, role: &Role, address: &Address) -> bool {
        self.roles
            .get(role)
            .is_some_and(|members| members.contains(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verity_types::Timestamp;

    fn wallet(name: &str) -> Address {
        Address::new(name)
    }

    fn tx(caller: &str) -> TxContext {
        TxContext::new(caller, 1, Timestamp::new(0))
    }

    fn registry() -> RoleRegistry {
        RoleRegistry::new(wallet("owner"))
    }

    // ── queries ──

    #[test]
    fn owner_role_exists_on_construction() {
        let r = registry();
        assert_eq!(r.roles_count(), 1);
        assert!(r.is_role(&Role::OWNER));
        assert!(!r.is_role(&Role::new("SOME_NON_EXISTENT_ROLE")));
        assert!(r.is_role_accessor(&Role::OWNER, &wallet("owner")));
        assert!(!r.is_role_accessor(&Role::OWNER, &wallet("mallory")));
    }

    // ── add_role ──

    #[test]
    fn add_role_requires_owner() {
        let mut r = registry();
        let err = r.add_role(&tx("mallory"), Role::new("SOME_ROLE")).unwrap_err();
        assert!(matches!(err, RbacError::Unauthorized { .. }));
        assert!(!r.is_role(&Role::new("SOME_ROLE")));
    }

    #[test]
    fn add_role_by_owner_emits_event() {
        let mut r = registry();
        r.add_role(&tx("owner"), Role::new("SOME_ROLE")).unwrap();
        assert!(r.is_role(&Role::new("SOME_ROLE")));
        assert_eq!(
            r.drain_events(),
            vec![RbacEvent::RoleAdded {
                role: Role::new("SOME_ROLE")
            }]
        );
    }

    // ── accessors ──

    #[test]
    fn add_and_remove_accessor() {
        let mut r = registry();
        r.add_role_accessor(&tx("owner"), Role::OWNER, wallet("bob"))
            .unwrap();
        assert!(r.is_role_accessor(&Role::OWNER, &wallet("bob")));
        r.remove_role_accessor(&tx("owner"), Role::OWNER, wallet("bob"))
            .unwrap();
        assert!(!r.is_role_accessor(&Role::OWNER, &wallet("bob")));
        assert_eq!(r.drain_events().len(), 2);
    }

    #[test]
    fn accessor_changes_require_owner() {
        let mut r = registry();
        assert!(r
            .add_role_accessor(&tx("mallory"), Role::OWNER, wallet("mallory"))
            .is_err());
        assert!(r
            .remove_role_accessor(&tx("mallory"), Role::OWNER, wallet("owner"))
            .is_err());
        assert!(r.is_role_accessor(&Role::OWNER, &wallet("owner")));
    }

    #[test]
    fn accessor_for_unknown_role_fails() {
        let mut r = registry();
        let err = r
            .add_role_accessor(&tx("owner"), Role::new("NOPE"), wallet("bob"))
            .unwrap_err();
        assert_eq!(err, RbacError::UnknownRole(Role::new("NOPE")));
    }

    #[test]
    fn const_and_owned_roles_compare_equal() {
        assert_eq!(Role::ORACLE, Role::new("ORACLE"));
    }
}
