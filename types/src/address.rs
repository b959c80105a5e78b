//! Participant and component addresses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque address identifying a wallet or a deployed component.
///
/// Components never hold references to each other; they are bound by address
/// and the caller of every entry point is identified by its address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// The null address. Bindings that require a real counterpart reject it.
    pub const NULL_STR: &'static str = "0x0";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn null() -> Self {
        Self(Self::NULL_STR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_empty() || self.0 == Self::NULL_STR
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_detection() {
        assert!(Address::null().is_null());
        assert!(Address::new("").is_null());
        assert!(!Address::new("alice").is_null());
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Address::new("engine-1")).unwrap();
        assert_eq!(json, "\"engine-1\"");
    }
}
