//! Record schema of the event log
//!
//! One JSON object per line:
//!
//! ```json
//! {"ts":0,"type":"entity_spawned","id":"e1","data":{"name":"Bob","team":"red","x":0,"y":0,"max_hp":100}}
//! ```
//!
//! `ts`, `type` and `id` are required. Every `data` field is optional and
//! zero-valued when absent.

use serde::{Deserialize, Serialize};
use skirmish_core::EntityId;
use std::fmt;

pub const ENTITY_SPAWNED: &str = "entity_spawned";
pub const ENTITY_MOVED: &str = "entity_moved";
pub const ENTITY_ATTACKED: &str = "entity_attacked";
pub const ENTITY_DAMAGED: &str = "entity_damaged";
pub const ENTITY_DIED: &str = "entity_died";

/// The `type` tag of a record
///
/// Unknown tags decode successfully into `Unknown` so that a semantically
/// unsupported record never fails the parser; the factory rejects it later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Spawned,
    Moved,
    Attacked,
    Damaged,
    Died,
    Unknown(String),
}

impl EventKind {
    /// The tag as written in the log
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Spawned => ENTITY_SPAWNED,
            EventKind::Moved => ENTITY_MOVED,
            EventKind::Attacked => ENTITY_ATTACKED,
            EventKind::Damaged => ENTITY_DAMAGED,
            EventKind::Died => ENTITY_DIED,
            EventKind::Unknown(tag) => tag.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventKind::Unknown(_))
    }
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            ENTITY_SPAWNED => EventKind::Spawned,
            ENTITY_MOVED => EventKind::Moved,
            ENTITY_ATTACKED => EventKind::Attacked,
            ENTITY_DAMAGED => EventKind::Damaged,
            ENTITY_DIED => EventKind::Died,
            _ => EventKind::Unknown(tag),
        }
    }
}

impl From<&str> for EventKind {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Unknown(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind-specific payload; fields unused by a kind stay zero/empty
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventData {
    pub name: String,
    pub team: String,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub target_id: String,
    pub killer_id: String,
    pub amount: i32,
}

/// One decoded line of the event log, before conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventRecord {
    /// Log time (milliseconds for the standard skirmish log)
    pub ts: f64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub id: EntityId,
    #[serde(default)]
    pub data: EventData,
}

impl RawEventRecord {
    /// Create a new record
    pub fn new(ts: f64, kind: impl Into<EventKind>, id: impl Into<EntityId>, data: EventData) -> Self {
        Self {
            ts,
            kind: kind.into(),
            id: id.into(),
            data,
        }
    }

    /// Encode as a single NDJSON line, without the trailing newline
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_tags() {
        assert_eq!(EventKind::from("entity_spawned"), EventKind::Spawned);
        assert_eq!(EventKind::from("entity_died"), EventKind::Died);
        assert_eq!(
            EventKind::from("entity_healed"),
            EventKind::Unknown("entity_healed".to_string())
        );
        assert!(!EventKind::from("entity_healed").is_known());
        assert_eq!(String::from(EventKind::Damaged), "entity_damaged");
    }

    #[test]
    fn test_decode_spawn_record() {
        let line = r#"{"ts":0,"type":"entity_spawned","id":"e1","data":{"name":"Bob","team":"red","x":0,"y":0,"max_hp":100}}"#;
        let record: RawEventRecord = serde_json::from_str(line).unwrap();

        assert_eq!(record.ts, 0.0);
        assert_eq!(record.kind, EventKind::Spawned);
        assert_eq!(record.id, EntityId::new("e1"));
        assert_eq!(record.data.name, "Bob");
        assert_eq!(record.data.max_hp, 100);
        assert_eq!(record.data.hp, 0);
        assert!(record.data.killer_id.is_empty());
    }

    #[test]
    fn test_missing_data_is_zero_valued() {
        let record: RawEventRecord =
            serde_json::from_str(r#"{"ts":12.5,"type":"entity_died","id":"B2"}"#).unwrap();
        assert_eq!(record.ts, 12.5);
        assert_eq!(record.data, EventData::default());
    }

    #[test]
    fn test_missing_required_field_fails() {
        let result = serde_json::from_str::<RawEventRecord>(r#"{"type":"entity_died","id":"B2"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_writes_full_schema() {
        let record = RawEventRecord::new(
            200.0,
            EventKind::Moved,
            "A1",
            EventData {
                x: 3.5,
                y: 4.0,
                ..EventData::default()
            },
        );
        let line = record.to_json_line().unwrap();
        assert!(line.contains(r#""type":"entity_moved""#));
        assert!(line.contains(r#""killer_id":"""#));

        let decoded: RawEventRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(decoded, record);
    }
}
