//! Throttle gate.
//!
//! The gate decides whether a command may run now, given the minimum period
//! between runs. State lives in a marker: only its modification time matters,
//! recording the last permitted run.
//!
//! Protocol:
//! 1. Create the marker exclusively. Success means first run: permitted.
//! 2. Otherwise read its mtime. If more than `period` has passed, set the
//!    mtime to now and permit; else deny without touching it.
//!
//! Step 1 is a single atomic create. Step 2 is a plain read then write, so two
//! racing invocations can both pass the check. The gate is best effort, not a
//! lock.
//!
//! A zero period disables the gate without touching the marker at all.

use crate::error::{GateError, GateOp};
use crate::ident::CommandId;
use std::fs::{File, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Source of "now".
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Persistent marker consulted and updated by the gate.
pub trait MarkerStore {
    /// Create the marker if and only if it does not exist yet.
    ///
    /// Returns `Ok(true)` if this call created it.
    fn create_new(&mut self) -> Result<bool, GateError>;

    /// Modification time of the existing marker.
    fn last_run(&mut self) -> Result<SystemTime, GateError>;

    /// Set the marker's modification time.
    fn touch(&mut self, at: SystemTime) -> Result<(), GateError>;
}

/// Marker backed by a zero-length file.
///
/// After the exclusive create fails, the marker is opened once and that handle
/// serves both the stat and the touch. A marker removed in between is created
/// again with the current time, which reads as a run that just happened.
#[derive(Debug)]
pub struct FsMarker {
    path: PathBuf,
    file: Option<File>,
}

impl FsMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Marker for a command: `<dir>/<program>_<id>`.
    pub fn for_command(dir: &Path, program: &str, id: &CommandId) -> Self {
        Self::new(dir.join(format!("{program}_{id}")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn err(&self, op: GateOp, e: io::Error) -> GateError {
        GateError::new(op, &self.path, e)
    }

    /// Handle to the existing marker, creating it if it has gone missing.
    fn handle(&mut self) -> Result<&File, GateError> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let opened = match File::open(&self.path) {
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        debug!(
                            target: "prun::gate",
                            path = %self.path.display(),
                            "marker vanished; recreating"
                        );
                        // `create` needs write or append access.
                        OpenOptions::new().append(true).create(true).open(&self.path)
                    }
                    other => other,
                };
                opened.map_err(|e| self.err(GateOp::Open, e))?
            }
        };
        Ok(self.file.insert(file))
    }
}

impl MarkerStore for FsMarker {
    fn create_new(&mut self) -> Result<bool, GateError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(self.err(GateOp::Create, e)),
        }
    }

    fn last_run(&mut self) -> Result<SystemTime, GateError> {
        let modified = self.handle()?.metadata().and_then(|m| m.modified());
        modified.map_err(|e| self.err(GateOp::Stat, e))
    }

    fn touch(&mut self, at: SystemTime) -> Result<(), GateError> {
        let times = FileTimes::new().set_accessed(at).set_modified(at);
        let result = self.handle()?.set_times(times);
        result.map_err(|e| self.err(GateOp::Touch, e))
    }
}

/// Why a run was permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Period is zero; throttling is off.
    Disabled,
    /// No marker existed.
    FirstRun,
    /// The period has passed since the last permitted run.
    Elapsed,
}

/// Gate verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permitted(Reason),
    /// Too early. `remaining` is how long until the next run would be permitted.
    Denied { remaining: Duration },
}

impl Decision {
    pub fn is_permitted(&self) -> bool {
        matches!(self, Decision::Permitted(_))
    }
}

/// Minimum-period gate over a marker store.
#[derive(Debug)]
pub struct Gate<S, C = SystemClock> {
    store: S,
    clock: C,
    period: Duration,
}

impl<S: MarkerStore> Gate<S, SystemClock> {
    pub fn new(store: S, period: Duration) -> Self {
        Self::with_clock(store, period, SystemClock)
    }
}

impl<S: MarkerStore, C: Clock> Gate<S, C> {
    pub fn with_clock(store: S, period: Duration, clock: C) -> Self {
        Self {
            store,
            clock,
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decide whether to run now, recording a permitted run before returning.
    ///
    /// # Errors
    ///
    /// Any marker failure. A denial is not an error.
    pub fn check(&mut self) -> Result<Decision, GateError> {
        if self.period.is_zero() {
            return Ok(Decision::Permitted(Reason::Disabled));
        }

        if self.store.create_new()? {
            debug!(target: "prun::gate", "marker created; first run");
            return Ok(Decision::Permitted(Reason::FirstRun));
        }

        let last = self.store.last_run()?;
        let now = self.clock.now();
        // A marker from the future counts as zero elapsed.
        let elapsed = now.duration_since(last).unwrap_or(Duration::ZERO);

        if elapsed > self.period {
            self.store.touch(now)?;
            debug!(target: "prun::gate", ?elapsed, period = ?self.period, "period elapsed");
            Ok(Decision::Permitted(Reason::Elapsed))
        } else {
            let remaining = self.period - elapsed;
            debug!(target: "prun::gate", ?elapsed, ?remaining, "too early");
            Ok(Decision::Denied { remaining })
        }
    }
}
