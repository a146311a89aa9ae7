//! Identity types for entities and positions

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of an entity as it appears in the event log
///
/// Ids are assigned by the log, not by the registry, so the same id can be
/// referenced before the entity's spawn record and again after it was reaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Create a new entity ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id, used for absent references in the log (e.g. no killer)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A 2D position in arena units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_entity_id() {
        let id = EntityId::new("A1");
        assert_eq!(id.as_str(), "A1");
        assert_eq!(format!("{}", id), "A1");
        assert!(!id.is_empty());
        assert!(EntityId::default().is_empty());
    }

    #[test]
    fn test_entity_id_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(EntityId::from("e1"), 1);
        assert_eq!(map.get("e1"), Some(&1));
    }

    #[test]
    fn test_position_display() {
        let pos = Position::from((1.0, 2.5));
        assert_eq!(pos, Position::new(1.0, 2.5));
        assert_eq!(pos.to_string(), "(1.00, 2.50)");
    }
}
