//! Store model and owner identity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ridgeline_core::StoreId;

/// The verified subject of the merchant, as asserted by the identity proxy.
///
/// Opaque text, not a UUID: the value is whatever the external auth provider
/// uses as its stable user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A merchant's store.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub owner_id: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_id_serializes_as_plain_string() {
        let owner = OwnerId::new("auth0|64f1c2");
        let json = serde_json::to_string(&owner).expect("serializes");
        assert_eq!(json, "\"auth0|64f1c2\"");
    }
}
