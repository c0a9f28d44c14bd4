//! Classified result of a child run.

use std::process::ExitStatus;
use std::time::Duration;

/// How a child process that was started came to an end.
///
/// Failure to start at all is reported as an [`ExecError`](crate::ExecError)
/// instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Exited with status zero.
    Succeeded,

    /// Exited with a non-zero status.
    Failed(i32),

    /// Killed by a signal it did not handle.
    Signaled(i32),

    /// Exited unsuccessfully, but the platform reports neither a code nor a signal.
    Unknown,

    /// Still running at the deadline and killed.
    DeadlineExceeded { limit: Duration, elapsed: Duration },
}

impl Outcome {
    /// Classify a finished child's exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        if status.success() {
            return Outcome::Succeeded;
        }
        if let Some(code) = status.code() {
            return Outcome::Failed(code);
        }
        signal_of(status).map_or(Outcome::Unknown, Outcome::Signaled)
    }

    pub fn success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Succeeded => write!(f, "exited successfully"),
            Outcome::Failed(code) => write!(f, "exit status {code}"),
            Outcome::Signaled(sig) => write!(f, "terminated by signal {sig}"),
            Outcome::Unknown => write!(f, "exited unsuccessfully, status unknown"),
            Outcome::DeadlineExceeded { limit, elapsed } => {
                write!(f, "killed after {elapsed:?} (limit: {limit:?})")
            }
        }
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}
