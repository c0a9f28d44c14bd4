//! Exit codes for the two tools.
//!
//! `prunevery` reserves codes to tell its own failures apart from the child's;
//! `prunfor` only distinguishes success, usage errors and "anything else".

use crate::error::{ExecError, PrunError};
use crate::outcome::Outcome;

/// Unidentified error running or waiting on the command.
pub const GENERIC_FAILURE: i32 = 1;

/// Invalid arguments.
pub const USAGE: i32 = 2;

/// Minimum period not yet elapsed.
pub const TOO_EARLY: i32 = 40;

/// Error creating, opening, examining or updating the marker file.
pub const MARKER_ERROR: i32 = 41;

/// The command could not be found.
pub const NOT_FOUND: i32 = 127;

/// The command failed but the platform reports no status.
pub const UNKNOWN_STATUS: i32 = 255;

/// Offset added to a signal number, as shells report it.
pub const SIGNAL_BASE: i32 = 128;

/// `prunevery` exit code for a finished child.
pub fn every_outcome(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Succeeded => 0,
        Outcome::Failed(code) => *code,
        Outcome::Signaled(sig) => SIGNAL_BASE + sig,
        Outcome::Unknown => UNKNOWN_STATUS,
        Outcome::DeadlineExceeded { .. } => GENERIC_FAILURE,
    }
}

/// `prunevery` exit code for an error.
pub fn every_error(err: &PrunError) -> i32 {
    match err {
        PrunError::Usage(_) => USAGE,
        PrunError::Gate(_) => MARKER_ERROR,
        PrunError::Exec(ExecError::NotFound { .. }) => NOT_FOUND,
        PrunError::Exec(_) => GENERIC_FAILURE,
    }
}

/// `prunfor` exit code for a finished child.
pub fn for_outcome(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Succeeded => 0,
        Outcome::Failed(code) => *code,
        Outcome::Signaled(_) | Outcome::Unknown | Outcome::DeadlineExceeded { .. } => {
            GENERIC_FAILURE
        }
    }
}

/// `prunfor` exit code for an error.
pub fn for_error(err: &PrunError) -> i32 {
    match err {
        PrunError::Usage(_) => USAGE,
        PrunError::Gate(_) | PrunError::Exec(_) => GENERIC_FAILURE,
    }
}
