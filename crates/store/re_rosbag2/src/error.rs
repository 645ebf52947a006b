use std::path::PathBuf;

use re_cdr::CdrError;
use thiserror::Error;

use crate::ChannelKind;

/// Failure to decode a single row.
///
/// These are isolated per row: see [`crate::FailurePolicy`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("{kind} payload in row {row_index} is truncated")]
    TruncatedPayload {
        kind: ChannelKind,
        row_index: usize,
        #[source]
        source: CdrError,
    },

    #[error("{kind} payload in row {row_index} is malformed")]
    Malformed {
        kind: ChannelKind,
        row_index: usize,
        #[source]
        source: CdrError,
    },
}

impl DecodeError {
    pub fn new(kind: ChannelKind, row_index: usize, source: CdrError) -> Self {
        if source.is_truncation() {
            Self::TruncatedPayload {
                kind,
                row_index,
                source,
            }
        } else {
            Self::Malformed {
                kind,
                row_index,
                source,
            }
        }
    }

    pub fn kind(&self) -> ChannelKind {
        match self {
            Self::TruncatedPayload { kind, .. } | Self::Malformed { kind, .. } => *kind,
        }
    }

    /// Position of the offending row in the container scan.
    pub fn row_index(&self) -> usize {
        match self {
            Self::TruncatedPayload { row_index, .. } | Self::Malformed { row_index, .. } => {
                *row_index
            }
        }
    }
}

/// Container-level failures. There is no meaningful partial output after one of these.
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("Failed to open bag {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to read the `{table}` table of the bag")]
    Query {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}
