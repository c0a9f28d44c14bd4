//! Error types for prun.
//!
//! Errors fall into three classes, each mapped to its own exit code:
//! - [`UsageError`]: malformed invocation, detected before any side effect
//! - [`GateError`]: the marker file could not be created, opened, examined or touched
//! - [`ExecError`]: the child could not be started or waited on
//!
//! A child that runs and fails is not an error; see [`Outcome`](crate::Outcome).

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or missing arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// Duration string could not be parsed
    #[error("invalid {what} {input:?}: {reason}")]
    InvalidDuration {
        what: &'static str,
        input: String,
        reason: String,
    },

    /// Duration was negative
    #[error("{what} must be non-negative")]
    NegativeDuration { what: &'static str },

    /// No command was given
    #[error("missing command")]
    MissingCommand,
}

/// Filesystem operation performed on a marker file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateOp {
    Create,
    Open,
    Stat,
    Touch,
}

impl std::fmt::Display for GateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateOp::Create => write!(f, "create"),
            GateOp::Open => write!(f, "open"),
            GateOp::Stat => write!(f, "stat"),
            GateOp::Touch => write!(f, "touch"),
        }
    }
}

/// Operational failure of the throttle gate.
///
/// Distinct from a policy denial: the gate could not reach a decision.
#[derive(Debug, Error)]
#[error("{op} {}: {source}", .path.display())]
pub struct GateError {
    pub op: GateOp,
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl GateError {
    pub fn new(op: GateOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Failure to start or wait on the child process.
#[derive(Debug, Error)]
pub enum ExecError {
    /// Executable could not be located
    #[error("{program}: command not found")]
    NotFound { program: String },

    /// Any other spawn failure (permissions, exec format, ...)
    #[error("failed to spawn {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    /// Waiting on, or killing, the child failed
    #[error("failed to wait on child: {reason}")]
    WaitFailed { reason: String },
}

/// Invalid identifier encoder configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncoderError {
    #[error("identifier limit {limit} too small: need at least {min}")]
    LimitTooSmall { limit: usize, min: usize },
}

/// Combined error type for a full prun invocation.
#[derive(Debug, Error)]
pub enum PrunError {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_error_names_operation_and_path() {
        let err = GateError::new(
            GateOp::Touch,
            "/tmp/prunevery_ls",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("touch /tmp/prunevery_ls: "));
    }

    #[test]
    fn test_combined_error_is_transparent() {
        let err: PrunError = ExecError::NotFound {
            program: "nope".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "nope: command not found");
    }
}
