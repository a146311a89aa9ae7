//! Event log loader
//!
//! Turns an NDJSON event log into a queue-ready batch of commands:
//! parse, stable-sort by timestamp, convert. Bad records are skipped or
//! abort the load depending on the `ErrorPolicy`.

use crate::error::{Error, Result};
use crate::factory::build;
use crate::parser::parse;
use crate::record::RawEventRecord;
use skirmish_core::{Command, ErrorPolicy, IngestConfig, Registry, Scheduler};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Commands converted from a log, plus the records that were skipped
#[derive(Debug)]
pub struct LoadedLog {
    /// Commands in ascending timestamp order
    pub commands: Vec<Command>,
    /// Malformed lines and unsupported records
    pub skipped: Vec<Error>,
}

impl LoadedLog {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Summary of a log queued into a scheduler
#[derive(Debug)]
pub struct LoadReport {
    /// Commands added to the scheduler queue
    pub queued: usize,
    /// Malformed lines and unsupported records
    pub skipped: Vec<Error>,
}

/// Loader for NDJSON event logs
#[derive(Debug, Clone, Default)]
pub struct LogLoader {
    policy: ErrorPolicy,
}

impl LogLoader {
    /// Create a loader with an explicit error policy
    pub fn new(policy: ErrorPolicy) -> Self {
        Self { policy }
    }

    /// Create a loader from the ingest section of the replay config
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.on_error)
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Load a log from a string, resolving entities against `registry`
    ///
    /// Returns `Error::EmptyLog` when nothing usable was decoded.
    pub fn load_str(&self, text: &str, registry: &mut Registry) -> Result<LoadedLog> {
        self.load_bytes(text.as_bytes(), registry)
    }

    /// Load a log from raw bytes, resolving entities against `registry`
    ///
    /// Lines that are not valid UTF-8 are treated like any other malformed
    /// line. The registry is only touched once the whole batch is accepted,
    /// so a failed load leaves it unchanged.
    pub fn load_bytes(&self, input: &[u8], registry: &mut Registry) -> Result<LoadedLog> {
        let parsed = parse::<RawEventRecord, _>(input, self.policy)?;
        let mut skipped = parsed.errors;
        let mut records = parsed.records;

        // Stable: records sharing a timestamp keep their file order
        records.sort_by(|(_, a), (_, b)| a.ts.total_cmp(&b.ts));

        let mut commands = Vec::with_capacity(records.len());
        for (line, record) in &records {
            match build(record) {
                Ok(command) => commands.push(command),
                Err(e) => {
                    let e = e.at_line(*line);
                    if self.policy == ErrorPolicy::Abort {
                        return Err(e);
                    }
                    warn!(line = *line, kind = %record.kind, entity = %record.id, ts = record.ts, "skipping unsupported record");
                    skipped.push(e);
                }
            }
        }

        if commands.is_empty() {
            return Err(Error::EmptyLog);
        }

        for command in &commands {
            registry.get_or_create(&command.entity);
        }

        info!(
            commands = commands.len(),
            skipped = skipped.len(),
            "event log loaded"
        );
        Ok(LoadedLog { commands, skipped })
    }

    /// Load a log file, resolving entities against `registry`
    pub fn load_file(&self, path: impl AsRef<Path>, registry: &mut Registry) -> Result<LoadedLog> {
        let content = fs::read(path.as_ref())?;
        self.load_bytes(&content, registry)
    }

    /// Load a log from a string straight into a scheduler's queue
    pub fn load_into(&self, text: &str, scheduler: &mut Scheduler) -> Result<LoadReport> {
        self.load_bytes_into(text.as_bytes(), scheduler)
    }

    /// Load raw log bytes straight into a scheduler's queue
    pub fn load_bytes_into(&self, input: &[u8], scheduler: &mut Scheduler) -> Result<LoadReport> {
        let log = self.load_bytes(input, scheduler.registry_mut())?;
        let queued = scheduler.load(log.commands);
        Ok(LoadReport {
            queued,
            skipped: log.skipped,
        })
    }

    /// Load a log file straight into a scheduler's queue
    pub fn load_file_into(
        &self,
        path: impl AsRef<Path>,
        scheduler: &mut Scheduler,
    ) -> Result<LoadReport> {
        let content = fs::read(path.as_ref())?;
        self.load_bytes_into(&content, scheduler)
    }
}
