//! Tagged outcome of a single chapter call.

use serde::{Deserialize, Serialize};

/// Outcome of a `process` or `rollback` call.
///
/// Both variants carry a value so the pipeline keeps something to hand to
/// compensating calls whatever the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChapterResult<T> {
    /// The call succeeded.
    Success(T),

    /// The call failed.
    Failure(T),
}

impl<T> ChapterResult<T> {
    /// Creates a successful result.
    pub fn success(value: T) -> Self {
        ChapterResult::Success(value)
    }

    /// Creates a failed result.
    pub fn failure(value: T) -> Self {
        ChapterResult::Failure(value)
    }

    /// Returns true if the call succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ChapterResult::Success(_))
    }

    /// Returns true if the call failed.
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Returns a reference to the carried value.
    pub fn value(&self) -> &T {
        match self {
            ChapterResult::Success(value) | ChapterResult::Failure(value) => value,
        }
    }

    /// Consumes the result and returns the carried value.
    pub fn into_value(self) -> T {
        match self {
            ChapterResult::Success(value) | ChapterResult::Failure(value) => value,
        }
    }

    /// Maps the carried value, keeping the tag.
    pub fn map<U, F>(self, f: F) -> ChapterResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ChapterResult::Success(value) => ChapterResult::Success(f(value)),
            ChapterResult::Failure(value) => ChapterResult::Failure(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags() {
        assert!(ChapterResult::success(1).is_success());
        assert!(!ChapterResult::success(1).is_failure());
        assert!(ChapterResult::failure(1).is_failure());
    }

    #[test]
    fn test_failure_keeps_value() {
        let result = ChapterResult::failure("bad_order".to_string());
        assert_eq!(result.value(), "bad_order");
        assert_eq!(result.into_value(), "bad_order");
    }

    #[test]
    fn test_map_keeps_tag() {
        let mapped = ChapterResult::failure(2).map(|v| v * 10);
        assert_eq!(mapped, ChapterResult::Failure(20));

        let mapped = ChapterResult::success("a").map(str::len);
        assert_eq!(mapped, ChapterResult::Success(1));
    }
}
