//! Command identifiers.
//!
//! A [`CommandId`] names the marker file for a command. It is derived from the
//! command's canonical form by collapsing every run of non-word characters into
//! a single `_`. Word characters are ASCII letters, digits and `_`; anything
//! else, including all non-ASCII text, is a separator. The result is therefore
//! pure ASCII and its byte length equals its character length.
//!
//! Identifiers longer than the encoder's limit keep a readable prefix and end
//! with `_` plus a hex digest of the full, untruncated identifier.

use crate::command::CommandSpec;
use crate::error::EncoderError;
use sha2::{Digest, Sha256};

/// Default maximum identifier length.
pub const DEFAULT_LIMIT: usize = 100;

/// Digest bytes kept in a truncated identifier (128 bits).
const DIGEST_BYTES: usize = 16;

/// Length of the hex digest suffix.
pub const DIGEST_LEN: usize = DIGEST_BYTES * 2;

/// Deterministic, filesystem-safe, length-bounded name for a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(String);

impl CommandId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommandId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encodes command specifications into [`CommandId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdEncoder {
    limit: usize,
}

impl Default for IdEncoder {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl IdEncoder {
    /// Encoder with a custom length limit.
    ///
    /// # Errors
    ///
    /// `EncoderError::LimitTooSmall` if the limit cannot hold at least one
    /// prefix character, the separator and the digest.
    pub fn with_limit(limit: usize) -> Result<Self, EncoderError> {
        let min = DIGEST_LEN + 2;
        if limit < min {
            return Err(EncoderError::LimitTooSmall { limit, min });
        }
        Ok(Self { limit })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Encode a command specification.
    pub fn encode(&self, spec: &CommandSpec) -> CommandId {
        self.encode_str(&spec.canonical())
    }

    /// Encode an already-joined canonical command string.
    pub fn encode_str(&self, canonical: &str) -> CommandId {
        let normalized = collapse_non_word(canonical);
        if normalized.len() <= self.limit {
            return CommandId(normalized);
        }

        // ASCII only, so any byte index is a char boundary.
        let keep = self.limit - DIGEST_LEN - 1;
        let mut id = String::with_capacity(self.limit);
        id.push_str(&normalized[..keep]);
        id.push('_');
        id.push_str(&digest_hex(&normalized));
        CommandId(id)
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Replace each maximal run of non-word characters with one `_`.
fn collapse_non_word(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for c in input.chars() {
        if is_word(c) {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

fn digest_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    hex::encode(&digest[..DIGEST_BYTES])
}
