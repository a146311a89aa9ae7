//! Error types for skirmish-log

use thiserror::Error;

/// Log ingestion error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Event type '{kind}' is not supported (entity {id}, ts {ts}{})", on_line(.line))]
    UnsupportedEventKind {
        /// Source line, when the record came from a log
        line: Option<usize>,
        kind: String,
        id: String,
        ts: f64,
    },

    #[error("Event log contains no valid records")]
    EmptyLog,
}

impl Error {
    /// Attach a source line to a record-level error
    pub(crate) fn at_line(self, number: usize) -> Self {
        match self {
            Error::UnsupportedEventKind { kind, id, ts, .. } => Error::UnsupportedEventKind {
                line: Some(number),
                kind,
                id,
                ts,
            },
            other => other,
        }
    }

    /// Source line the error refers to, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => Some(*line),
            Error::UnsupportedEventKind { line, .. } => *line,
            _ => None,
        }
    }
}

fn on_line(line: &Option<usize>) -> String {
    line.map(|n| format!(", line {}", n)).unwrap_or_default()
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
