//! Skirmish Log - Event-log ingestion for replay
//!
//! Reads newline-delimited JSON event logs and turns them into replay
//! commands:
//! - Record schema (`RawEventRecord`, `EventKind`, `EventData`)
//! - Line parser that survives malformed lines (`parse`, `parse_lines`)
//! - Record-to-command factory (`convert`)
//! - Loader that sorts, converts and queues a whole log (`LogLoader`)

mod error;
mod factory;
mod loader;
mod parser;
pub mod record;

pub use error::{Error, Result};
pub use factory::convert;
pub use loader::{LoadReport, LoadedLog, LogLoader};
pub use parser::{parse, parse_lines, Parsed};
pub use record::{EventData, EventKind, RawEventRecord};
