//! # prun
//!
//! Wrappers that decide whether, and for how long, a command may run.
//!
//! - `prunevery PERIOD COMMAND [ARG...]` runs `COMMAND` only if at least
//!   `PERIOD` has passed since its last permitted run, across process runs.
//! - `prunfor LIMIT COMMAND [ARG...]` runs `COMMAND` and kills it if it is
//!   still running after `LIMIT`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prun::{CommandSpec, Deadline, FsMarker, Gate, IdEncoder, Runner};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let spec = CommandSpec::new("date", ["-u"]);
//!
//! // One marker file per distinct command
//! let id = IdEncoder::default().encode(&spec);
//! let marker = FsMarker::for_command(&std::env::temp_dir(), "myapp", &id);
//!
//! if Gate::new(marker, Duration::from_secs(300)).check()?.is_permitted() {
//!     let outcome = Runner::new(spec, Deadline::new(Duration::from_secs(10)))
//!         .run()
//!         .await?;
//!     println!("{outcome}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Marker files
//!
//! The last permitted run of a command is the modification time of an empty
//! file named `<program>_<identifier>` in the temporary directory. Identifiers
//! are the command line with every run of non-word characters collapsed to
//! `_`, capped at [`ident::DEFAULT_LIMIT`] bytes by replacing the tail with a
//! digest of the whole. Marker files are never removed.

pub mod cli;
mod command;
mod deadline;
mod error;
pub mod exit;
mod gate;
pub mod ident;
pub mod logging;
mod outcome;
mod runner;

// Public API
pub use command::CommandSpec;
pub use deadline::Deadline;
pub use error::{EncoderError, ExecError, GateError, GateOp, PrunError, UsageError};
pub use gate::{Clock, Decision, FsMarker, Gate, MarkerStore, Reason, SystemClock};
pub use ident::{CommandId, IdEncoder};
pub use outcome::Outcome;
pub use runner::Runner;
