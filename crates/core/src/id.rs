//! Strongly-typed identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a tracked product.
///
/// Stable for the product's whole lifetime; edits never change it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Create a new time-ordered (UUIDv7) identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<Uuid> for ProductId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<ProductId> for Uuid {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    /// Accepts any hyphenated or simple UUID; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s.trim())
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("ProductId: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_its_own_display_output() {
        let id = ProductId::new();
        let parsed: ProductId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn rejects_garbage() {
        let err = "not-a-uuid".parse::<ProductId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("ProductId")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let id = ProductId::new();
        let parsed: ProductId = format!("  {id}\n").parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(Uuid::from(parsed), *id.as_uuid());
    }

    #[test]
    fn serializes_as_bare_uuid() {
        let uuid = Uuid::nil();
        let json = serde_json::to_string(&ProductId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }
}
