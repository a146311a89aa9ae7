//! Seam between the replay engine and the host's presentation layer
//!
//! The engine never renders anything. It tells the presenter when an entity
//! enters or leaves the registry; the presenter decides how to visualise it,
//! typically by subscribing to the entity's observables and drawing a view
//! from a pool.

use crate::Entity;

/// Receives entity lifecycle notifications from the registry
pub trait Presenter {
    /// Called right after a new entity is indexed
    ///
    /// This is the place to subscribe to the entity's observable fields.
    fn entity_created(&mut self, entity: &mut Entity);

    /// Called right before an entity is dropped from the registry
    ///
    /// Any subscription registered in `entity_created` must be released here.
    fn entity_removed(&mut self, entity: &mut Entity);
}

/// A presenter that ignores all notifications (headless replay)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn entity_created(&mut self, _entity: &mut Entity) {}

    fn entity_removed(&mut self, _entity: &mut Entity) {}
}
