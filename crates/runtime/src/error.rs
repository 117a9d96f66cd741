//! Errors surfaced by the encounter host.
//!
//! Engine rejections never show up here: they come back as unsuccessful
//! [`combat_core::CommandOutcome`]s. These are host failures around
//! configuration, snapshots and storage.
use combat_core::{CombatError, ConfigError, ErrorSeverity};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("session snapshot encoding failed")]
    Snapshot(#[source] bincode::Error),

    #[error("snapshot digest mismatch: expected {expected}, computed {actual}")]
    DigestMismatch { expected: String, actual: String },

    #[error("snapshot store I/O error")]
    Io(#[from] std::io::Error),

    #[error("invalid log filter `{filter}`")]
    LogFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("a global tracing subscriber is already installed")]
    LoggingInstalled,
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Config(err) => err.severity(),
            Self::DigestMismatch { .. } => ErrorSeverity::Validation,
            Self::LogFilter { .. } => ErrorSeverity::Validation,
            Self::LoggingInstalled => ErrorSeverity::Recoverable,
            Self::Snapshot(_) | Self::Io(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(err) => err.error_code(),
            Self::Snapshot(_) => "runtime.snapshot",
            Self::DigestMismatch { .. } => "runtime.digest_mismatch",
            Self::Io(_) => "runtime.io",
            Self::LogFilter { .. } => "runtime.log_filter",
            Self::LoggingInstalled => "runtime.logging_installed",
        }
    }
}
