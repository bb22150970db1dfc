//! Error types surfaced by the runtime.
//!
//! Wraps session failures, drain overflows and configuration loading so the
//! sim binary can bubble everything up through one type.
use std::io;
use std::path::PathBuf;

use tactics_core::{BusError, ErrorSeverity, EventKind, GameError, SessionError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to read config file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Drain(#[from] BusError),

    #[error("critical handler {handler} failed on {kind}")]
    Handler {
        handler: &'static str,
        kind: EventKind,
        #[source]
        source: SessionError,
    },
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigRead { .. } => ErrorSeverity::Recoverable,
            Self::ConfigParse { .. } => ErrorSeverity::Validation,
            Self::Session(err) => err.severity(),
            Self::Drain(_) => ErrorSeverity::Internal,
            Self::Handler { source, .. } => source.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigRead { .. } => "CONFIG_READ",
            Self::ConfigParse { .. } => "CONFIG_PARSE",
            Self::Session(err) => err.error_code(),
            Self::Drain(_) => "BUS_DRAIN_LIMIT",
            Self::Handler { source, .. } => source.error_code(),
        }
    }
}
