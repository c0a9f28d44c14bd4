//! Child process execution.
//!
//! [`Runner`] spawns a [`CommandSpec`] with the parent's standard streams,
//! waits for it and classifies the result. With a [`Deadline`], the wait races
//! a timer: whichever finishes first decides the outcome. A child still running
//! at the deadline is killed with SIGKILL and reaped.

use crate::command::CommandSpec;
use crate::deadline::Deadline;
use crate::error::ExecError;
use crate::outcome::Outcome;
use std::io;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, trace};

/// Runs one command, optionally under a deadline.
#[derive(Debug, Clone)]
pub struct Runner {
    spec: CommandSpec,
    deadline: Deadline,
}

impl Runner {
    pub fn new(spec: CommandSpec, deadline: Deadline) -> Self {
        Self { spec, deadline }
    }

    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn deadline(&self) -> Deadline {
        self.deadline
    }

    /// Spawn the command and wait for it to finish or hit the deadline.
    ///
    /// The child's stdout and stderr are the parent's own, so output is
    /// forwarded live. Stdin is inherited.
    ///
    /// # Errors
    ///
    /// - `ExecError::NotFound` if the executable could not be located
    /// - `ExecError::SpawnFailed` for any other spawn failure
    /// - `ExecError::WaitFailed` if waiting on or killing the child failed
    pub async fn run(&self) -> Result<Outcome, ExecError> {
        let start = Instant::now();

        let mut cmd = Command::new(&self.spec.program);
        cmd.args(&self.spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| spawn_error(&self.spec.program_lossy(), e))?;

        trace!(
            target: "prun::runner",
            program = %self.spec.program_lossy(),
            args = ?self.spec.args,
            pid = ?child.id(),
            deadline = ?self.deadline.limit(),
            "spawned"
        );

        let status = match self.deadline.limit() {
            None => child.wait().await.map_err(wait_error)?,
            Some(limit) => match timeout(limit, child.wait()).await {
                Ok(status) => status.map_err(wait_error)?,
                Err(_) => {
                    let elapsed = start.elapsed();
                    debug!(
                        target: "prun::runner",
                        ?limit,
                        ?elapsed,
                        "deadline reached; killing child"
                    );
                    child.kill().await.map_err(wait_error)?;
                    return Ok(Outcome::DeadlineExceeded { limit, elapsed });
                }
            },
        };

        let outcome = Outcome::from_status(status);
        debug!(target: "prun::runner", %outcome, elapsed = ?start.elapsed(), "child finished");
        Ok(outcome)
    }

    /// Blocking wrapper around [`run`](Self::run) on a current-thread runtime.
    ///
    /// Must not be called from within an async context.
    pub fn run_blocking(&self) -> Result<Outcome, ExecError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExecError::SpawnFailed {
                program: self.spec.program_lossy(),
                reason: format!("failed to create runtime: {}", e),
            })?;
        rt.block_on(self.run())
    }
}

fn spawn_error(program: &str, e: io::Error) -> ExecError {
    match e.kind() {
        io::ErrorKind::NotFound => ExecError::NotFound {
            program: program.to_string(),
        },
        _ => ExecError::SpawnFailed {
            program: program.to_string(),
            reason: e.to_string(),
        },
    }
}

fn wait_error(e: io::Error) -> ExecError {
    ExecError::WaitFailed {
        reason: e.to_string(),
    }
}
