//! Result wrapper for tests that need a minimum record length

use serde::Serialize;

/// A test result, or the reason the test was skipped
///
/// Short or degenerate records never make a test fail; they produce
/// `NotPerformed` so a report can always be assembled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome<T> {
    Performed(T),
    NotPerformed { reason: String },
}

impl<T> TestOutcome<T> {
    pub fn not_performed(reason: impl Into<String>) -> Self {
        Self::NotPerformed {
            reason: reason.into(),
        }
    }

    pub fn insufficient(what: &str, min: usize, n: usize) -> Self {
        Self::not_performed(format!(
            "Insufficient data for {what}: need at least {min} values, got {n}"
        ))
    }

    /// `NotPerformed` when `n < min`, otherwise the result of `f`
    pub fn require(n: usize, min: usize, what: &str, f: impl FnOnce() -> Self) -> Self {
        if n < min {
            Self::insufficient(what, min, n)
        } else {
            f()
        }
    }

    pub fn is_performed(&self) -> bool {
        matches!(self, Self::Performed(_))
    }

    pub fn performed(&self) -> Option<&T> {
        match self {
            Self::Performed(v) => Some(v),
            Self::NotPerformed { .. } => None,
        }
    }

    pub fn into_performed(self) -> Option<T> {
        match self {
            Self::Performed(v) => Some(v),
            Self::NotPerformed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Performed(_) => None,
            Self::NotPerformed { reason } => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> TestOutcome<U> {
        match self {
            Self::Performed(v) => TestOutcome::Performed(f(v)),
            Self::NotPerformed { reason } => TestOutcome::NotPerformed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Stat {
        value: f64,
    }

    #[test]
    fn test_require() {
        let skipped = TestOutcome::require(2, 3, "trend analysis", || {
            TestOutcome::Performed(Stat { value: 1.0 })
        });
        assert_eq!(
            skipped.reason(),
            Some("Insufficient data for trend analysis: need at least 3 values, got 2")
        );
        let run = TestOutcome::require(3, 3, "trend analysis", || {
            TestOutcome::Performed(Stat { value: 1.0 })
        });
        assert_eq!(run.performed(), Some(&Stat { value: 1.0 }));
        assert_eq!(run.map(|s| s.value * 2.0).into_performed(), Some(2.0));
    }

    #[test]
    fn test_serialize_tagged() {
        let done = TestOutcome::Performed(Stat { value: 0.5 });
        assert_eq!(
            serde_json::to_string(&done).unwrap(),
            r#"{"status":"performed","value":0.5}"#
        );
        let skipped: TestOutcome<Stat> = TestOutcome::not_performed("constant series");
        assert_eq!(
            serde_json::to_string(&skipped).unwrap(),
            r#"{"status":"not_performed","reason":"constant series"}"#
        );
    }
}
