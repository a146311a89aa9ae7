//! Storage for all replayed entities

use crate::{Entity, EntityId, NullPresenter, Presenter};
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;
use tracing::trace;

/// Owns every entity by id and reports lifecycle changes to a `Presenter`
pub struct Registry {
    /// All entities by ID
    entities: IndexMap<EntityId, Entity>,
    /// Host collaborator notified on create/remove
    presenter: Box<dyn Presenter>,
}

impl Registry {
    /// Create an empty registry without a presenter
    pub fn new() -> Self {
        Self::with_presenter(NullPresenter)
    }

    /// Create an empty registry reporting to `presenter`
    pub fn with_presenter(presenter: impl Presenter + 'static) -> Self {
        Self {
            entities: IndexMap::new(),
            presenter: Box::new(presenter),
        }
    }

    /// Get the entity for `id`, creating an unspawned placeholder if absent
    pub fn get_or_create(&mut self, id: &EntityId) -> &mut Entity {
        match self.entities.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(entity = %id, "entity created");
                let entity = entry.insert(Entity::new(id.clone()));
                self.presenter.entity_created(entity);
                entity
            }
        }
    }

    /// Get an entity by ID
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Get a mutable reference to an entity
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Check whether an entity is indexed
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Remove an entity, notifying the presenter. Returns false if absent.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.entities.shift_remove(id) {
            Some(mut entity) => {
                trace!(entity = %entity.id, "entity removed");
                self.presenter.entity_removed(&mut entity);
                true
            }
            None => false,
        }
    }

    /// Remove every entity whose `is_alive` is false
    ///
    /// Never-spawned placeholders are dead by default and are removed too.
    /// Returns the number of removed entities.
    pub fn reap_dead(&mut self) -> usize {
        let before = self.entities.len();
        let presenter = &mut self.presenter;
        self.entities.retain(|id, entity| {
            if entity.alive() {
                return true;
            }
            trace!(entity = %id, "entity reaped");
            presenter.entity_removed(entity);
            false
        });
        before - self.entities.len()
    }

    /// Remove every entity, notifying the presenter for each
    pub fn clear(&mut self) {
        for entity in self.entities.values_mut() {
            self.presenter.entity_removed(entity);
        }
        self.entities.clear();
    }

    /// Get all entity IDs
    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.entities.keys()
    }

    /// Get all entities
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Get the number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entities", &self.entities)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records lifecycle notifications for assertions
    #[derive(Clone, Default)]
    struct RecordingPresenter {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Presenter for RecordingPresenter {
        fn entity_created(&mut self, entity: &mut Entity) {
            self.log.borrow_mut().push(format!("+{}", entity.id));
        }

        fn entity_removed(&mut self, entity: &mut Entity) {
            self.log.borrow_mut().push(format!("-{}", entity.id));
        }
    }

    fn spawned(registry: &mut Registry, id: &str) {
        registry
            .get_or_create(&EntityId::new(id))
            .on_spawned(id, "red", Position::default(), 100);
    }

    #[test]
    fn test_get_or_create_reuses_entity() {
        let mut registry = Registry::new();
        let id = EntityId::new("e1");

        registry.get_or_create(&id).on_moved(Position::new(1.0, 1.0));
        let entity = registry.get_or_create(&id);
        assert_eq!(*entity.position.get(), Position::new(1.0, 1.0));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_presenter_notified() {
        let presenter = RecordingPresenter::default();
        let log = presenter.log.clone();
        let mut registry = Registry::with_presenter(presenter);

        registry.get_or_create(&EntityId::new("a"));
        registry.get_or_create(&EntityId::new("a"));
        registry.get_or_create(&EntityId::new("b"));
        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));

        assert_eq!(*log.borrow(), vec!["+a", "+b", "-a"]);
    }

    #[test]
    fn test_reap_dead() {
        let mut registry = Registry::new();
        spawned(&mut registry, "alive");
        spawned(&mut registry, "dead");
        registry.get_or_create(&EntityId::new("placeholder"));

        registry
            .get_mut("dead")
            .unwrap()
            .on_died(&EntityId::new("alive"));

        assert_eq!(registry.reap_dead(), 2);
        assert!(registry.contains("alive"));
        assert!(!registry.contains("dead"));
        assert!(!registry.contains("placeholder"));
    }

    #[test]
    fn test_reaped_id_creates_fresh_entity() {
        let mut registry = Registry::new();
        spawned(&mut registry, "x");
        registry.get_mut("x").unwrap().on_died(&EntityId::default());
        registry.reap_dead();

        let fresh = registry.get_or_create(&EntityId::new("x"));
        assert!(fresh.is_placeholder());
        assert!(!fresh.alive());
        assert_eq!(*fresh.max_health.get(), 0);
    }

    #[test]
    fn test_clear_notifies_every_entity() {
        let presenter = RecordingPresenter::default();
        let log = presenter.log.clone();
        let mut registry = Registry::with_presenter(presenter);
        spawned(&mut registry, "a");
        spawned(&mut registry, "b");

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(*log.borrow(), vec!["+a", "+b", "-a", "-b"]);
    }
}
