//! Skirmish Core - Deterministic replay engine
//!
//! This crate provides the in-memory side of replaying a recorded timeline of
//! entity events:
//! - Observable values and signals for change notification (`Observable`, `Signal`)
//! - Per-entity state with observable fields (`Entity`)
//! - The owning entity collection with lazy creation and reaping (`Registry`)
//! - Typed, timestamped commands (`Command`)
//! - A virtual clock and the timestamp-gated scheduler (`VirtualClock`, `Scheduler`)
//!
//! Presentation is a host concern. The engine only reports entity creation and
//! removal through the `Presenter` trait; everything else flows through the
//! entity observables.
//!
//! ## Single-threaded model
//!
//! The scheduler is driven by the host calling `Scheduler::tick` once per
//! frame. Nothing inside a tick blocks, and subscribers run synchronously on
//! the calling thread, so none of these types are `Send`.

mod command;
pub mod config;
mod entity;
mod error;
mod identity;
mod observable;
mod presenter;
mod registry;
pub mod scheduler;
pub mod time;

pub use command::{Command, CommandKind};
pub use config::{ErrorPolicy, IngestConfig, PresentationConfig, ReplayConfig, SchedulerConfig};
pub use entity::Entity;
pub use error::{Error, Result};
pub use identity::{EntityId, Position};
pub use observable::{Observable, Signal, SubscriptionId};
pub use presenter::{NullPresenter, Presenter};
pub use registry::Registry;
pub use scheduler::{ReplayState, Scheduler, TickReport};
pub use time::VirtualClock;
