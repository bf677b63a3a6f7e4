// ── Core identity type ──
//
// The server keys every document by an opaque string (a MongoDB ObjectId
// in practice). Wrapping it keeps query ids and free-form strings apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier for a query or recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.trim()))
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_str_trims() {
        let id: EntityId = " 665f1c2ab9 ".parse().unwrap();
        assert_eq!(id.as_str(), "665f1c2ab9");
    }

    #[test]
    fn entity_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&EntityId::from("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
