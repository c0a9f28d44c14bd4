//! Command specification.

use crate::error::UsageError;
use std::ffi::OsString;

/// The command a tool wraps: an executable name followed by its arguments.
///
/// Tokens are kept as raw OS strings so arguments that are not valid UTF-8
/// reach the child untouched. Two specifications are equal only when their
/// full token sequences match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandSpec {
    /// Executable name, resolved through `PATH` at spawn time.
    pub program: OsString,

    /// Arguments passed verbatim as argv[1..].
    pub args: Vec<OsString>,
}

impl CommandSpec {
    /// Create a specification from a program and its arguments.
    pub fn new<I, A>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Split an argv-style token list into program and arguments.
    ///
    /// # Errors
    ///
    /// `UsageError::MissingCommand` if `tokens` is empty.
    pub fn from_tokens(tokens: Vec<OsString>) -> Result<Self, UsageError> {
        let mut tokens = tokens.into_iter();
        let program = tokens.next().ok_or(UsageError::MissingCommand)?;
        Ok(Self {
            program,
            args: tokens.collect(),
        })
    }

    /// Program name for messages; invalid UTF-8 shows as U+FFFD.
    pub fn program_lossy(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Canonical representation: program and arguments joined by single spaces.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD.
    pub fn canonical(&self) -> String {
        let mut out = self.program_lossy();
        for arg in &self.args {
            out.push(' ');
            out.push_str(&arg.to_string_lossy());
        }
        out
    }
}

impl std::fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}
