//! Record identifiers.
//!
//! Identifiers are opaque strings on disk so that records written by older
//! clients (seed fixtures use short numeric ids) still load. Fresh ids are
//! random v4 UUIDs and are not checked against existing records; at the
//! volumes a single session handles the collision probability is negligible.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpinionId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl BusinessId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl OpinionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for BusinessId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for OpinionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for BusinessId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for OpinionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OpinionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ids_are_fresh_uuids() {
        let first = BusinessId::default();
        let second = BusinessId::default();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first.0).is_ok());
        assert!(Uuid::parse_str(&OpinionId::default().0).is_ok());
    }
}
