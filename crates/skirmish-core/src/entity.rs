//! Per-entity replay state

use crate::{EntityId, Observable, Position, Signal};

/// A replayed entity
///
/// Created as a placeholder (only `id` set, everything else zero-valued and
/// `is_alive == false`) the first time any record references it, then filled
/// in by its spawn record. Every field except `id` is observable.
#[derive(Debug)]
pub struct Entity {
    /// Identifier from the event log
    pub id: EntityId,
    pub name: Observable<String>,
    pub team: Observable<String>,
    pub position: Observable<Position>,
    pub max_health: Observable<i32>,
    pub current_health: Observable<i32>,
    pub is_alive: Observable<bool>,
    /// Fired with the target id when this entity attacks; carries no state
    pub attacked: Signal<EntityId>,
    spawned: bool,
}

impl Entity {
    /// Create an unspawned placeholder
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            name: Observable::default(),
            team: Observable::default(),
            position: Observable::default(),
            max_health: Observable::default(),
            current_health: Observable::default(),
            is_alive: Observable::default(),
            attacked: Signal::new(),
            spawned: false,
        }
    }

    /// Populate the entity from its spawn record; health starts full
    pub fn on_spawned(
        &mut self,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
        max_health: i32,
    ) {
        self.name.set(name.into());
        self.team.set(team.into());
        self.position.set(position);
        self.max_health.set(max_health);
        self.current_health.set(max_health);
        self.spawned = true;
        self.is_alive.set(true);
    }

    pub fn on_moved(&mut self, position: Position) {
        self.position.set(position);
    }

    /// Attacks have no modeled state; only `attacked` subscribers observe them
    pub fn on_attacked(&mut self, target: &EntityId) {
        self.attacked.emit(target);
    }

    /// The log carries the post-damage health, which is applied as-is
    pub fn on_damaged(&mut self, _amount: i32, new_health: i32) {
        self.current_health.set(new_health);
    }

    pub fn on_died(&mut self, _killer: &EntityId) {
        self.is_alive.set(false);
    }

    /// Current value of `is_alive`
    pub fn alive(&self) -> bool {
        *self.is_alive.get()
    }

    /// Whether no spawn has been applied to this entity yet
    pub fn is_placeholder(&self) -> bool {
        !self.spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_placeholder_defaults() {
        let entity = Entity::new("e1");
        assert_eq!(entity.id, EntityId::new("e1"));
        assert!(entity.name.get().is_empty());
        assert!(entity.team.get().is_empty());
        assert_eq!(*entity.position.get(), Position::default());
        assert_eq!(*entity.max_health.get(), 0);
        assert_eq!(*entity.current_health.get(), 0);
        assert!(!entity.alive());
        assert!(entity.is_placeholder());
    }

    #[test]
    fn test_spawn_then_damage() {
        let mut entity = Entity::new("e1");
        entity.on_spawned("A", "red", Position::new(1.0, 2.0), 100);
        entity.on_damaged(30, 70);

        assert_eq!(*entity.current_health.get(), 70);
        assert_eq!(*entity.max_health.get(), 100);
        assert!(entity.alive());
        assert!(!entity.is_placeholder());
    }

    #[test]
    fn test_spawn_with_empty_fields_is_not_placeholder() {
        let mut entity = Entity::new("anon");
        entity.on_spawned("", "", Position::default(), 0);
        assert!(!entity.is_placeholder());
        assert!(entity.alive());

        // Pre-spawn mutations keep the placeholder shape
        let mut ghost = Entity::new("ghost");
        ghost.on_damaged(12, 88);
        assert!(ghost.is_placeholder());
    }

    #[test]
    fn test_move_only_touches_position() {
        let mut entity = Entity::new("e1");
        entity.on_spawned("A", "red", Position::new(1.0, 2.0), 100);

        let hp_changes = Rc::new(RefCell::new(0));
        let counter = hp_changes.clone();
        entity.current_health.subscribe(move |_| *counter.borrow_mut() += 1);

        entity.on_moved(Position::new(3.0, 4.0));
        assert_eq!(*entity.position.get(), Position::new(3.0, 4.0));
        assert_eq!(*hp_changes.borrow(), 0);
    }

    #[test]
    fn test_attack_emits_without_state_change() {
        let mut entity = Entity::new("A1");
        entity.on_spawned("Unit A1", "A", Position::default(), 100);

        let targets = Rc::new(RefCell::new(Vec::new()));
        let sink = targets.clone();
        entity.attacked.subscribe(move |t: &EntityId| sink.borrow_mut().push(t.clone()));

        entity.on_attacked(&EntityId::new("B2"));
        assert_eq!(*targets.borrow(), vec![EntityId::new("B2")]);
        assert_eq!(*entity.current_health.get(), 100);
        assert!(entity.alive());
    }

    #[test]
    fn test_died() {
        let mut entity = Entity::new("e1");
        entity.on_spawned("Bob", "red", Position::default(), 100);
        entity.on_died(&EntityId::new("e2"));
        assert!(!entity.alive());
        assert_eq!(entity.name.get(), "Bob");
    }
}
