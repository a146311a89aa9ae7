//! Executable replay commands

use crate::{Entity, EntityId, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a command does to its entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CommandKind {
    Spawn {
        name: String,
        team: String,
        position: Position,
        max_health: i32,
    },
    Move {
        position: Position,
    },
    Attack {
        target: EntityId,
    },
    Damage {
        amount: i32,
        new_health: i32,
    },
    Die {
        killer: EntityId,
    },
}

impl CommandKind {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            CommandKind::Spawn { .. } => "spawn",
            CommandKind::Move { .. } => "move",
            CommandKind::Attack { .. } => "attack",
            CommandKind::Damage { .. } => "damage",
            CommandKind::Die { .. } => "die",
        }
    }
}

/// An immutable unit of work bound to one entity and one timestamp
///
/// The entity is referenced by id. It is resolved against the registry when
/// the command is built and again when it executes, so a command whose
/// entity was reaped in between runs against a fresh placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Virtual time at which the command becomes due
    pub timestamp: f64,
    /// The entity this command acts on
    pub entity: EntityId,
    pub kind: CommandKind,
}

impl Command {
    /// Create a new command
    pub fn new(timestamp: f64, entity: impl Into<EntityId>, kind: CommandKind) -> Self {
        Self {
            timestamp,
            entity: entity.into(),
            kind,
        }
    }

    /// Create a spawn command
    pub fn spawn(
        timestamp: f64,
        entity: impl Into<EntityId>,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
        max_health: i32,
    ) -> Self {
        Self::new(
            timestamp,
            entity,
            CommandKind::Spawn {
                name: name.into(),
                team: team.into(),
                position,
                max_health,
            },
        )
    }

    /// Create a move command
    pub fn moved(timestamp: f64, entity: impl Into<EntityId>, position: Position) -> Self {
        Self::new(timestamp, entity, CommandKind::Move { position })
    }

    /// Create an attack command
    pub fn attack(timestamp: f64, entity: impl Into<EntityId>, target: impl Into<EntityId>) -> Self {
        Self::new(
            timestamp,
            entity,
            CommandKind::Attack {
                target: target.into(),
            },
        )
    }

    /// Create a damage command
    pub fn damage(timestamp: f64, entity: impl Into<EntityId>, amount: i32, new_health: i32) -> Self {
        Self::new(timestamp, entity, CommandKind::Damage { amount, new_health })
    }

    /// Create a die command
    pub fn die(timestamp: f64, entity: impl Into<EntityId>, killer: impl Into<EntityId>) -> Self {
        Self::new(
            timestamp,
            entity,
            CommandKind::Die {
                killer: killer.into(),
            },
        )
    }

    /// Whether the command is due at virtual time `now`
    pub fn is_due(&self, now: f64) -> bool {
        self.timestamp <= now
    }

    /// Apply this command to its entity
    pub fn apply(&self, entity: &mut Entity) {
        match &self.kind {
            CommandKind::Spawn {
                name,
                team,
                position,
                max_health,
            } => entity.on_spawned(name.as_str(), team.as_str(), *position, *max_health),
            CommandKind::Move { position } => entity.on_moved(*position),
            CommandKind::Attack { target } => entity.on_attacked(target),
            CommandKind::Damage { amount, new_health } => entity.on_damaged(*amount, *new_health),
            CommandKind::Die { killer } => entity.on_died(killer),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} {}", self.kind.label(), self.timestamp, self.entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_then_damage() {
        let mut entity = Entity::new("e1");
        Command::spawn(0.0, "e1", "A", "red", Position::new(1.0, 2.0), 100).apply(&mut entity);
        Command::damage(1.0, "e1", 30, 70).apply(&mut entity);

        assert_eq!(entity.name.get(), "A");
        assert_eq!(entity.team.get(), "red");
        assert_eq!(*entity.position.get(), Position::new(1.0, 2.0));
        assert_eq!(*entity.current_health.get(), 70);
        assert_eq!(*entity.max_health.get(), 100);
        assert!(entity.alive());
    }

    #[test]
    fn test_damage_uses_logged_health() {
        let mut entity = Entity::new("e1");
        Command::spawn(0.0, "e1", "A", "red", Position::default(), 100).apply(&mut entity);
        // amount and new_health disagree; the logged health wins
        Command::damage(1.0, "e1", 10, 42).apply(&mut entity);
        assert_eq!(*entity.current_health.get(), 42);
    }

    #[test]
    fn test_die() {
        let mut entity = Entity::new("e1");
        Command::spawn(0.0, "e1", "A", "red", Position::default(), 100).apply(&mut entity);
        Command::die(5.0, "e1", "e2").apply(&mut entity);
        assert!(!entity.alive());
    }

    #[test]
    fn test_is_due() {
        let cmd = Command::moved(5.0, "e1", Position::default());
        assert!(!cmd.is_due(4.9));
        assert!(cmd.is_due(5.0));
        assert!(cmd.is_due(6.0));
    }

    #[test]
    fn test_display() {
        let cmd = Command::attack(200.0, "A1", "B1");
        assert_eq!(cmd.to_string(), "attack@200 A1");
    }
}
