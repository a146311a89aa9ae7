//! Console views for replayed entities
//!
//! Each live entity is bound to a pooled `EntityView` that mirrors its team,
//! position and liveness through observable subscriptions. Views are handed
//! back to the pool when the registry drops the entity.

use skirmish_core::{Entity, EntityId, Position, Presenter, SubscriptionId};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// What a view currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub id: EntityId,
    pub team: String,
    pub position: Position,
    pub alive: bool,
    pub moves: u32,
}

#[derive(Debug, Default)]
struct Bindings {
    team: Option<SubscriptionId>,
    position: Option<SubscriptionId>,
    alive: Option<SubscriptionId>,
}

/// A reusable view bound to at most one entity at a time
#[derive(Debug, Default)]
pub struct EntityView {
    state: Rc<RefCell<ViewState>>,
    bindings: Bindings,
}

impl EntityView {
    fn bind(&mut self, entity: &mut Entity) {
        *self.state.borrow_mut() = ViewState {
            id: entity.id.clone(),
            team: entity.team.get().clone(),
            position: *entity.position.get(),
            alive: entity.alive(),
            moves: 0,
        };

        let state = Rc::clone(&self.state);
        self.bindings.team = Some(entity.team.subscribe(move |team: &String| {
            state.borrow_mut().team = team.clone();
        }));

        let state = Rc::clone(&self.state);
        self.bindings.position = Some(entity.position.subscribe(move |position: &Position| {
            let mut view = state.borrow_mut();
            view.position = *position;
            view.moves += 1;
            debug!(entity = %view.id, position = %position, "view moved");
        }));

        let state = Rc::clone(&self.state);
        self.bindings.alive = Some(entity.is_alive.subscribe(move |alive: &bool| {
            let mut view = state.borrow_mut();
            if view.alive != *alive {
                if *alive {
                    info!(entity = %view.id, team = %view.team, at = %view.position, "entity spawned");
                } else {
                    info!(entity = %view.id, team = %view.team, at = %view.position, "entity down");
                }
            }
            view.alive = *alive;
        }));
    }

    fn unbind(&mut self, entity: &mut Entity) {
        let bindings = std::mem::take(&mut self.bindings);
        if let Some(id) = bindings.team {
            entity.team.unsubscribe(id);
        }
        if let Some(id) = bindings.position {
            entity.position.unsubscribe(id);
        }
        if let Some(id) = bindings.alive {
            entity.is_alive.unsubscribe(id);
        }
        *self.state.borrow_mut() = ViewState::default();
    }

    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }
}

/// Views on screen plus the free list they are recycled into
#[derive(Debug, Default)]
pub struct ViewPool {
    active: Vec<EntityView>,
    free: Vec<EntityView>,
    allocated: usize,
}

impl ViewPool {
    /// Create a pool with `count` views already allocated
    pub fn preloaded(count: usize) -> Self {
        let mut pool = Self::default();
        pool.free.extend((0..count).map(|_| EntityView::default()));
        pool.allocated = count;
        pool
    }

    fn acquire(&mut self) -> EntityView {
        self.free.pop().unwrap_or_else(|| {
            self.allocated += 1;
            EntityView::default()
        })
    }

    pub fn active(&self) -> impl Iterator<Item = &EntityView> {
        self.active.iter()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total views ever created, preloaded ones included
    pub fn allocated(&self) -> usize {
        self.allocated
    }
}

/// Presenter that draws entities as pooled console views
#[derive(Debug, Clone)]
pub struct ConsolePresenter {
    pool: Rc<RefCell<ViewPool>>,
}

impl ConsolePresenter {
    pub fn new(preload_views: usize) -> Self {
        Self {
            pool: Rc::new(RefCell::new(ViewPool::preloaded(preload_views))),
        }
    }

    /// Shared handle to the pool, readable after the presenter is boxed
    pub fn pool(&self) -> Rc<RefCell<ViewPool>> {
        Rc::clone(&self.pool)
    }
}

impl Presenter for ConsolePresenter {
    fn entity_created(&mut self, entity: &mut Entity) {
        let mut pool = self.pool.borrow_mut();
        let mut view = pool.acquire();
        view.bind(entity);
        pool.active.push(view);
    }

    fn entity_removed(&mut self, entity: &mut Entity) {
        let mut pool = self.pool.borrow_mut();
        let index = pool
            .active
            .iter()
            .position(|view| view.state.borrow().id == entity.id);
        if let Some(index) = index {
            let mut view = pool.active.swap_remove(index);
            view.unbind(entity);
            pool.free.push(view);
        }
    }
}
