//! Execution deadline.

use std::time::Duration;

/// Wall-clock bound on a single child run.
///
/// A zero duration means "no deadline".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deadline(Option<Duration>);

impl Deadline {
    /// No time limit.
    pub const NONE: Deadline = Deadline(None);

    /// Deadline from a duration; zero disables it.
    pub fn new(limit: Duration) -> Self {
        if limit.is_zero() {
            Self::NONE
        } else {
            Self(Some(limit))
        }
    }

    /// The limit, if one is set.
    pub fn limit(&self) -> Option<Duration> {
        self.0
    }

    pub fn is_unbounded(&self) -> bool {
        self.0.is_none()
    }
}

impl From<Duration> for Deadline {
    fn from(limit: Duration) -> Self {
        Self::new(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_unbounded() {
        assert!(Deadline::new(Duration::ZERO).is_unbounded());
        assert_eq!(Deadline::default(), Deadline::NONE);
    }

    #[test]
    fn test_positive_is_bounded() {
        let deadline = Deadline::from(Duration::from_millis(100));
        assert_eq!(deadline.limit(), Some(Duration::from_millis(100)));
    }
}
