//! Command-line surface shared by the `prunevery` and `prunfor` binaries.
//!
//! Both take a duration followed by the command to wrap. Everything after the
//! command name is handed to the child verbatim, hyphenated words and bytes
//! that are not valid UTF-8 included.

use crate::command::CommandSpec;
use crate::deadline::Deadline;
use crate::error::{PrunError, UsageError};
use crate::gate::{FsMarker, Gate};
use crate::ident::IdEncoder;
use crate::outcome::Outcome;
use crate::runner::Runner;
use clap::Parser;
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Run a command at most once per period.
///
/// The time of the last permitted run is kept as the modification time of a
/// marker file in the temporary directory. Exit status is the command's own,
/// or 40 if the period has not elapsed yet, 41 if the marker file could not
/// be used, 127 if the command was not found.
#[derive(Debug, Parser)]
#[command(name = "prunevery", version)]
pub struct EveryCli {
    /// Minimum period between runs, e.g. 30s, 5m, 1h30m. 0 disables throttling.
    #[arg(value_name = "PERIOD", value_parser = parse_period)]
    pub period: Duration,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        value_parser = clap::value_parser!(OsString),
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

/// Run a command for at most a limited time.
///
/// Exit status is the command's own, or 1 if it could not be run, was killed
/// at the time limit, or otherwise failed without an exit code.
#[derive(Debug, Parser)]
#[command(name = "prunfor", version)]
pub struct ForCli {
    /// Time limit, e.g. 100ms, 10s, 2m. 0 means no limit.
    #[arg(value_name = "LIMIT", value_parser = parse_limit)]
    pub limit: Duration,

    /// Command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        value_parser = clap::value_parser!(OsString),
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<OsString>,
}

/// Result of a `prunevery` invocation that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The minimum period had not elapsed; nothing was run.
    TooEarly,
    /// The command ran to this outcome.
    Ran(Outcome),
}

impl EveryCli {
    /// Consult the gate for this command and run it if permitted.
    ///
    /// `me` is this program's basename and `marker_dir` the directory holding
    /// marker files.
    pub async fn execute(self, me: &str, marker_dir: &Path) -> Result<Verdict, PrunError> {
        let spec = CommandSpec::from_tokens(self.command)?;

        if !self.period.is_zero() {
            let id = IdEncoder::default().encode(&spec);
            let marker = FsMarker::for_command(marker_dir, me, &id);
            debug!(target: "prun::gate", path = %marker.path().display(), "checking marker");

            let decision = Gate::new(marker, self.period).check()?;
            if !decision.is_permitted() {
                return Ok(Verdict::TooEarly);
            }
        }

        let outcome = Runner::new(spec, Deadline::NONE).run().await?;
        Ok(Verdict::Ran(outcome))
    }
}

impl ForCli {
    /// Run the command under the configured limit.
    pub async fn execute(self) -> Result<Outcome, PrunError> {
        let spec = CommandSpec::from_tokens(self.command)?;
        let outcome = Runner::new(spec, Deadline::new(self.limit)).run().await?;
        Ok(outcome)
    }
}

/// Parse a non-negative duration such as `0`, `250ms`, `5m` or `1h30m`.
///
/// # Errors
///
/// - `UsageError::NegativeDuration` for a leading `-`
/// - `UsageError::InvalidDuration` for anything else that is not a duration
pub fn parse_duration(what: &'static str, input: &str) -> Result<Duration, UsageError> {
    let s = input.trim();
    if s.starts_with('-') {
        return Err(UsageError::NegativeDuration { what });
    }
    if s.chars().all(|c| c == '0') && !s.is_empty() {
        return Ok(Duration::ZERO);
    }
    humantime::parse_duration(s).map_err(|e| UsageError::InvalidDuration {
        what,
        input: input.to_string(),
        reason: e.to_string(),
    })
}

fn parse_period(input: &str) -> Result<Duration, UsageError> {
    parse_duration("period", input)
}

fn parse_limit(input: &str) -> Result<Duration, UsageError> {
    parse_duration("limit", input)
}

/// Basename of the running program, or `fallback` if argv[0] is unusable.
pub fn program_name(fallback: &str) -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("period", "0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("period", "5m"), Ok(Duration::from_secs(300)));
        assert_eq!(
            parse_duration("period", "1h30m"),
            Ok(Duration::from_secs(5400))
        );
        assert_eq!(
            parse_duration("limit", "100ms"),
            Ok(Duration::from_millis(100))
        );
    }

    #[test]
    fn test_parse_duration_accepts_fractions() {
        assert_eq!(
            parse_duration("limit", "1.5s"),
            Ok(Duration::from_millis(1500))
        );
        assert_eq!(
            parse_duration("period", "0.5h"),
            Ok(Duration::from_secs(1800))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_every_cli_accepts_non_utf8_arguments() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"caf\xe9");
        let cli = EveryCli::try_parse_from([
            OsStr::new("prunevery"),
            OsStr::new("1h"),
            OsStr::new("echo"),
            raw,
        ])
        .unwrap();
        assert_eq!(cli.command[1].as_bytes(), b"caf\xe9");
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(matches!(
            parse_duration("period", "banana"),
            Err(UsageError::InvalidDuration { what: "period", .. })
        ));
        assert!(matches!(
            parse_duration("period", ""),
            Err(UsageError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_parse_duration_rejects_negative() {
        assert_eq!(
            parse_duration("limit", "-5m"),
            Err(UsageError::NegativeDuration { what: "limit" })
        );
    }

    #[test]
    fn test_every_cli_keeps_child_flags() {
        let cli = EveryCli::try_parse_from(["prunevery", "1h", "ls", "-la", "--color=never"]).unwrap();
        assert_eq!(cli.period, Duration::from_secs(3600));
        assert_eq!(
            cli.command,
            vec![
                OsString::from("ls"),
                OsString::from("-la"),
                OsString::from("--color=never")
            ]
        );
    }

    #[test]
    fn test_every_cli_requires_command() {
        let err = EveryCli::try_parse_from(["prunevery", "1h"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_for_cli_rejects_bad_limit() {
        let err = ForCli::try_parse_from(["prunfor", "banana", "true"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_every_execute_throttles() {
        let tmp = TempDir::new().unwrap();
        let run = || EveryCli {
            period: Duration::from_secs(3600),
            command: vec!["true".into()],
        };

        let first = run().execute("prunevery", tmp.path()).await.unwrap();
        assert_eq!(first, Verdict::Ran(Outcome::Succeeded));
        assert!(tmp.path().join("prunevery_true").exists());

        let second = run().execute("prunevery", tmp.path()).await.unwrap();
        assert_eq!(second, Verdict::TooEarly);
    }

    #[tokio::test]
    async fn test_every_execute_zero_period_leaves_no_marker() {
        let tmp = TempDir::new().unwrap();
        for _ in 0..2 {
            let cli = EveryCli {
                period: Duration::ZERO,
                command: vec!["true".into()],
            };
            let verdict = cli.execute("prunevery", tmp.path()).await.unwrap();
            assert_eq!(verdict, Verdict::Ran(Outcome::Succeeded));
        }
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_every_execute_denied_does_not_spawn() {
        let tmp = TempDir::new().unwrap();
        let cli = || EveryCli {
            period: Duration::from_secs(3600),
            command: vec!["prun-definitely-not-a-command".into()],
        };

        // First run is permitted, then fails to spawn.
        let err = cli().execute("prunevery", tmp.path()).await.unwrap_err();
        assert!(matches!(err, PrunError::Exec(crate::ExecError::NotFound { .. })));

        // Second run is denied before any spawn attempt.
        let verdict = cli().execute("prunevery", tmp.path()).await.unwrap();
        assert_eq!(verdict, Verdict::TooEarly);
    }

    #[tokio::test]
    async fn test_for_execute_times_out() {
        let cli = ForCli {
            limit: Duration::from_millis(100),
            command: vec!["sleep".into(), "10".into()],
        };
        let outcome = cli.execute().await.unwrap();
        assert!(matches!(outcome, Outcome::DeadlineExceeded { .. }));
    }
}
