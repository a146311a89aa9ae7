//! Conversion of raw records into replay commands

use crate::error::{Error, Result};
use crate::record::{EventKind, RawEventRecord};
use skirmish_core::{Command, CommandKind, EntityId, Position, Registry};

/// Convert one record into a command
///
/// The acting entity is resolved with `get_or_create` for every supported
/// kind, spawn included, so records that reference an entity before its
/// spawn record are tolerated. Referenced ids (attack target, killer) are
/// carried as plain ids and not resolved.
pub fn convert(record: &RawEventRecord, registry: &mut Registry) -> Result<Command> {
    let command = build(record)?;
    registry.get_or_create(&command.entity);
    Ok(command)
}

/// Build the command for a record without touching any registry
pub(crate) fn build(record: &RawEventRecord) -> Result<Command> {
    let data = &record.data;
    let position = Position::new(data.x, data.y);

    let kind = match &record.kind {
        EventKind::Spawned => CommandKind::Spawn {
            name: data.name.clone(),
            team: data.team.clone(),
            position,
            max_health: data.max_hp,
        },
        EventKind::Moved => CommandKind::Move { position },
        EventKind::Attacked => CommandKind::Attack {
            target: EntityId::new(data.target_id.as_str()),
        },
        EventKind::Damaged => CommandKind::Damage {
            amount: data.amount,
            new_health: data.hp,
        },
        EventKind::Died => CommandKind::Die {
            killer: EntityId::new(data.killer_id.as_str()),
        },
        EventKind::Unknown(tag) => {
            return Err(Error::UnsupportedEventKind {
                line: None,
                kind: tag.clone(),
                id: record.id.to_string(),
                ts: record.ts,
            })
        }
    };

    Ok(Command::new(record.ts, record.id.clone(), kind))
}
