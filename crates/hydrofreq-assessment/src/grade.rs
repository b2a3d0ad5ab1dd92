use serde::Serialize;
use std::fmt;

/// Certification grade of a complete analysis, worst first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentGrade {
    NotSuitable,
    AcceptableLimited,
    Qualified,
    CertifiedForCriticalDesign,
}

impl AssessmentGrade {
    /// `>= 95` certified, `>= 85` qualified, `>= 75` acceptable
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 95.0 => Self::CertifiedForCriticalDesign,
            s if s >= 85.0 => Self::Qualified,
            s if s >= 75.0 => Self::AcceptableLimited,
            _ => Self::NotSuitable,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CertifiedForCriticalDesign => "certified for critical design",
            Self::Qualified => "qualified",
            Self::AcceptableLimited => "acceptable/limited",
            Self::NotSuitable => "not suitable",
        }
    }

    /// Usable for engineering design at all
    pub fn permits_design(&self) -> bool {
        *self >= Self::AcceptableLimited
    }
}

impl fmt::Display for AssessmentGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(AssessmentGrade::from_score(99.0), AssessmentGrade::CertifiedForCriticalDesign);
        assert_eq!(AssessmentGrade::from_score(95.0), AssessmentGrade::CertifiedForCriticalDesign);
        assert_eq!(AssessmentGrade::from_score(94.9), AssessmentGrade::Qualified);
        assert_eq!(AssessmentGrade::from_score(75.0), AssessmentGrade::AcceptableLimited);
        assert_eq!(AssessmentGrade::from_score(74.9), AssessmentGrade::NotSuitable);
        assert_eq!(AssessmentGrade::from_score(f64::NAN), AssessmentGrade::NotSuitable);
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(AssessmentGrade::Qualified.permits_design());
        assert!(!AssessmentGrade::NotSuitable.permits_design());
        assert_eq!(AssessmentGrade::AcceptableLimited.to_string(), "acceptable/limited");
    }
}
