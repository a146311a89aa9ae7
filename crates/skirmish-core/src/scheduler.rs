//! Timestamp-gated replay scheduler
//!
//! The scheduler owns the registry, a FIFO queue of commands and the virtual
//! clock. The host drives it by calling `tick` once per frame with the real
//! time elapsed since the previous frame. A tick:
//!
//! 1. executes every queued command whose timestamp is `<=` the virtual time,
//!    in queue order,
//! 2. reaps dead entities from the registry,
//! 3. advances the virtual clock by the scaled elapsed time.
//!
//! The queue is sorted once by `load`. Commands added later through
//! `enqueue` are never reordered, so incremental feeding must already be in
//! timestamp order.

use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::{Command, Registry, VirtualClock};
use std::collections::VecDeque;
use tracing::{debug, info, trace, warn};

/// Lifecycle state of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayState {
    /// Not ticking
    #[default]
    Idle,
    /// Ticking once per host frame
    Running,
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Commands executed this tick
    pub executed: usize,
    /// Entities removed by the end-of-tick reap
    pub reaped: usize,
    /// Virtual time after the tick
    pub time: f64,
}

/// Replays queued commands against the registry
#[derive(Debug)]
pub struct Scheduler {
    registry: Registry,
    queue: VecDeque<Command>,
    clock: VirtualClock,
    state: ReplayState,
    executed_total: u64,
}

impl Scheduler {
    /// Create a scheduler with an empty registry and default settings
    pub fn new() -> Self {
        Self::with_registry(Registry::new(), &SchedulerConfig::default())
    }

    /// Create a scheduler around an existing registry
    pub fn with_registry(registry: Registry, config: &SchedulerConfig) -> Self {
        Self {
            registry,
            queue: VecDeque::new(),
            clock: VirtualClock::with_scale(config.time_scale),
            state: ReplayState::Idle,
            executed_total: 0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ReplayState::Running
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable registry access, used when converting records into commands
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Number of commands still queued
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// True when every queued command has executed
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }

    /// Commands executed since the last `stop`
    pub fn executed_total(&self) -> u64 {
        self.executed_total
    }

    /// Timestamp of the next queued command
    pub fn next_due(&self) -> Option<f64> {
        self.queue.front().map(|cmd| cmd.timestamp)
    }

    /// Sort a batch by timestamp and append it to the queue
    ///
    /// The sort is stable: commands with equal timestamps keep their input
    /// order. Returns the number of queued commands.
    pub fn load(&mut self, commands: impl IntoIterator<Item = Command>) -> usize {
        let mut batch: Vec<Command> = commands.into_iter().collect();
        batch.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        let count = batch.len();
        self.queue.extend(batch);
        info!(commands = count, pending = self.queue.len(), "commands loaded");
        count
    }

    /// Append a single command without reordering the queue
    pub fn enqueue(&mut self, command: Command) {
        if let Some(last) = self.queue.back() {
            if command.timestamp < last.timestamp {
                warn!(
                    command = %command,
                    last = last.timestamp,
                    "command enqueued out of timestamp order; queue is not re-sorted"
                );
            }
        }
        self.queue.push_back(command);
    }

    /// Begin ticking
    ///
    /// Starting twice is harmless: the second call logs a warning and
    /// returns `Error::AlreadyRunning` without touching any state.
    pub fn start(&mut self) -> Result<()> {
        if self.state == ReplayState::Running {
            warn!("replay is already running");
            return Err(Error::AlreadyRunning);
        }
        self.state = ReplayState::Running;
        info!(pending = self.queue.len(), "replay started");
        Ok(())
    }

    /// Halt and discard everything
    ///
    /// Releases every entity (the presenter sees a removal for each), drops
    /// all queued commands without executing them and resets the clock.
    /// Stopping while idle does nothing.
    pub fn stop(&mut self) {
        if self.state == ReplayState::Idle {
            return;
        }
        let discarded = self.queue.len();
        self.registry.clear();
        self.queue.clear();
        self.clock.reset();
        self.executed_total = 0;
        self.state = ReplayState::Idle;
        info!(discarded, "replay stopped");
    }

    /// Run one host frame. Does nothing while idle.
    pub fn tick(&mut self, elapsed_seconds: f64) -> TickReport {
        if self.state != ReplayState::Running {
            return TickReport {
                time: self.clock.now(),
                ..TickReport::default()
            };
        }

        let executed = self.execute_due();
        let reaped = self.registry.reap_dead();
        self.clock.advance(elapsed_seconds);

        if executed > 0 || reaped > 0 {
            debug!(executed, reaped, time = self.clock.now(), "tick");
        }

        TickReport {
            executed,
            reaped,
            time: self.clock.now(),
        }
    }

    /// Execute every command due at the current virtual time, without reaping
    ///
    /// Each command re-resolves its entity, so an id reaped earlier gets a
    /// fresh placeholder rather than failing.
    pub fn execute_due(&mut self) -> usize {
        let now = self.clock.now();
        let mut executed = 0;

        while self.queue.front().is_some_and(|cmd| cmd.is_due(now)) {
            let Some(command) = self.queue.pop_front() else {
                break;
            };
            trace!(command = %command, "execute");
            let entity = self.registry.get_or_create(&command.entity);
            command.apply(entity);
            executed += 1;
        }

        self.executed_total += executed as u64;
        executed
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}
