//! Record flags and their combination

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason attached to a record that passes every check
pub const PASSES_ALL: &str = "Passes all QC tests";

/// Record status, ordered by priority so the worst status is the maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QcStatus {
    Good,
    Missing,
    Suspect,
    Bad,
}

impl QcStatus {
    pub const ALL: [QcStatus; 4] = [Self::Good, Self::Missing, Self::Suspect, Self::Bad];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Missing => "missing",
            Self::Suspect => "suspect",
            Self::Bad => "bad",
        }
    }
}

impl fmt::Display for QcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of one check (or of all checks) for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcFlag {
    pub status: QcStatus,
    /// 1 (informational) to 5 (certainly wrong)
    pub severity: u8,
    pub reason: String,
}

impl QcFlag {
    pub fn new(status: QcStatus, severity: u8, reason: impl Into<String>) -> Self {
        Self {
            status,
            severity: severity.clamp(1, 5),
            reason: reason.into(),
        }
    }

    pub fn good(reason: impl Into<String>) -> Self {
        Self::new(QcStatus::Good, 1, reason)
    }

    pub fn suspect(severity: u8, reason: impl Into<String>) -> Self {
        Self::new(QcStatus::Suspect, severity, reason)
    }

    pub fn bad(severity: u8, reason: impl Into<String>) -> Self {
        Self::new(QcStatus::Bad, severity, reason)
    }

    pub fn missing(severity: u8, reason: impl Into<String>) -> Self {
        Self::new(QcStatus::Missing, severity, reason)
    }

    pub fn is_good(&self) -> bool {
        self.status == QcStatus::Good
    }

    /// Worst-case combination of the flags raised for one record
    ///
    /// Status and severity are the maxima; the reason lists every non-good
    /// reason in check order. An empty slice combines to a passing flag.
    pub fn combine<'a, I>(flags: I) -> QcFlag
    where
        I: IntoIterator<Item = &'a QcFlag>,
    {
        let (status, severity, reasons) = flags.into_iter().fold(
            (QcStatus::Good, 1u8, Vec::new()),
            |(status, severity, mut reasons), flag| {
                if !flag.is_good() {
                    reasons.push(flag.reason.as_str());
                }
                (status.max(flag.status), severity.max(flag.severity), reasons)
            },
        );
        let reason = if reasons.is_empty() {
            PASSES_ALL.to_string()
        } else {
            reasons.join("; ")
        };
        QcFlag::new(status, severity, reason)
    }
}

impl fmt::Display for QcFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (severity {}): {}", self.status, self.severity, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_priority() {
        assert!(QcStatus::Bad > QcStatus::Suspect);
        assert!(QcStatus::Suspect > QcStatus::Missing);
        assert!(QcStatus::Missing > QcStatus::Good);
        assert_eq!(QcStatus::ALL.iter().max(), Some(&QcStatus::Bad));
    }

    #[test]
    fn test_combine_worst_case() {
        let flags = vec![
            QcFlag::good("Within physical limits"),
            QcFlag::suspect(3, "Extreme value (Modified Z=5.10)"),
            QcFlag::suspect(4, "Statistical outlier (multiple methods)"),
            QcFlag::good("Normal rate of change"),
        ];
        let combined = QcFlag::combine(&flags);
        assert_eq!(combined.status, QcStatus::Suspect);
        assert_eq!(combined.severity, 4);
        assert_eq!(
            combined.reason,
            "Extreme value (Modified Z=5.10); Statistical outlier (multiple methods)"
        );
    }

    #[test]
    fn test_combine_missing_and_all_good() {
        let missing = QcFlag::combine(&[QcFlag::missing(3, "Missing value"), QcFlag::good("ok")]);
        assert_eq!(missing.status, QcStatus::Missing);
        assert_eq!(missing.reason, "Missing value");

        let good = QcFlag::combine(&[QcFlag::good("a"), QcFlag::good("b")]);
        assert_eq!(good.status, QcStatus::Good);
        assert_eq!(good.severity, 1);
        assert_eq!(good.reason, PASSES_ALL);

        let bad_wins = QcFlag::combine(&[QcFlag::suspect(2, "s"), QcFlag::bad(5, "b")]);
        assert_eq!(bad_wins.status, QcStatus::Bad);
        assert_eq!(bad_wins.to_string(), "bad (severity 5): s; b");
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&QcFlag::suspect(2, "Repeated identical values")).unwrap();
        assert_eq!(
            json,
            r#"{"status":"suspect","severity":2,"reason":"Repeated identical values"}"#
        );
    }
}
