//! Replay configuration
//!
//! Loaded from a RON file. Every section and field is optional:
//!
//! ```ron
//! (
//!     scheduler: (time_scale: 1000.0),
//!     ingest: (on_error: Skip),
//!     presentation: (preload_views: 10, frame_interval_ms: 16),
//! )
//! ```

use crate::error::{Error, Result};
use crate::time::DEFAULT_TIME_SCALE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

/// Scheduler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Virtual time units per elapsed real second
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
}

fn default_time_scale() -> f64 {
    DEFAULT_TIME_SCALE
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
        }
    }
}

/// What to do with a record that cannot be turned into a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorPolicy {
    /// Log the record and keep going
    #[default]
    Skip,
    /// Stop loading at the first bad record
    Abort,
}

/// Log ingestion settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

/// Host presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    /// Views created up front in the host's view pool
    #[serde(default = "default_preload_views")]
    pub preload_views: usize,
    /// Host frame pacing in milliseconds
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_preload_views() -> usize {
    10
}

fn default_frame_interval_ms() -> u64 {
    16
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            preload_views: default_preload_views(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

impl ReplayConfig {
    /// Parse and validate a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: ReplayConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> Result<()> {
        let scale = self.scheduler.time_scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::Config(format!(
                "time_scale must be a positive number, got {}",
                scale
            )));
        }
        Ok(())
    }
}
