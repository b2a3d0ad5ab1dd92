//! Aggregate quality indicators over a screened record

use crate::flags::{QcFlag, QcStatus};
use serde::Serialize;
use std::fmt;

/// Record count per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub good: usize,
    pub missing: usize,
    pub suspect: usize,
    pub bad: usize,
}

impl StatusCounts {
    pub fn from_flags(flags: &[QcFlag]) -> Self {
        let mut counts = Self::default();
        for flag in flags {
            match flag.status {
                QcStatus::Good => counts.good += 1,
                QcStatus::Missing => counts.missing += 1,
                QcStatus::Suspect => counts.suspect += 1,
                QcStatus::Bad => counts.bad += 1,
            }
        }
        counts
    }

    pub fn get(&self, status: QcStatus) -> usize {
        match status {
            QcStatus::Good => self.good,
            QcStatus::Missing => self.missing,
            QcStatus::Suspect => self.suspect,
            QcStatus::Bad => self.bad,
        }
    }

    pub fn total(&self) -> usize {
        self.good + self.missing + self.suspect + self.bad
    }
}

/// Percentage of records per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusPercentages {
    pub good: f64,
    pub missing: f64,
    pub suspect: f64,
    pub bad: f64,
}

impl StatusPercentages {
    fn from_counts(counts: &StatusCounts) -> Self {
        let total = counts.total();
        let pct = |c: usize| {
            if total == 0 {
                0.0
            } else {
                c as f64 / total as f64 * 100.0
            }
        };
        Self {
            good: pct(counts.good),
            missing: pct(counts.missing),
            suspect: pct(counts.suspect),
            bad: pct(counts.bad),
        }
    }
}

/// Letter grade on the quality score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum QcGrade {
    F,
    C,
    B,
    A,
}

impl QcGrade {
    /// A at 90, B at 80, C at 70
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else {
            Self::F
        }
    }
}

impl fmt::Display for QcGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::F => "F",
        };
        f.write_str(s)
    }
}

/// Fitness of the record for professional use
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificationLevel {
    Inadequate,
    Acceptable,
    Good,
    Excellent,
}

impl CertificationLevel {
    fn assess(score: f64, bad_pct: f64) -> Self {
        if score >= 95.0 && bad_pct < 0.5 {
            Self::Excellent
        } else if score >= 85.0 && bad_pct < 1.0 {
            Self::Good
        } else if score >= 75.0 {
            Self::Acceptable
        } else {
            Self::Inadequate
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "EXCELLENT - Suitable for critical infrastructure design",
            Self::Good => "GOOD - Suitable for frequency analysis and water management",
            Self::Acceptable => "ACCEPTABLE - Requires enhanced QC procedures",
            Self::Inadequate => "INADEQUATE - Not suitable for professional use",
        }
    }
}

impl fmt::Display for CertificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Summary of a QC run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QcSummary {
    pub total_records: usize,
    pub counts: StatusCounts,
    pub percentages: StatusPercentages,
    /// Records per severity, index 0 holding severity 1
    pub severity_distribution: [usize; 5],
    /// Share of non-missing records, in percent
    pub data_completeness: f64,
    /// 0-100, penalising bad records most and missing records least
    pub quality_score: f64,
    pub suspect_and_bad_percentage: f64,
    pub professional_grade: QcGrade,
    pub frequency_analysis_suitable: bool,
    pub wmo_168_compliant: bool,
    pub certification: CertificationLevel,
    pub recommendations: Vec<String>,
}

impl QcSummary {
    /// Summarise the combined per-record flags
    ///
    /// An empty record yields zero counts, zero completeness and a score of
    /// zero; nothing is divided by zero.
    pub fn from_flags(flags: &[QcFlag]) -> Self {
        let counts = StatusCounts::from_flags(flags);
        let percentages = StatusPercentages::from_counts(&counts);
        let total = flags.len();

        let mut severity_distribution = [0usize; 5];
        for flag in flags {
            let idx = usize::from(flag.severity.clamp(1, 5)) - 1;
            severity_distribution[idx] += 1;
        }

        let (data_completeness, quality_score) = if total == 0 {
            (0.0, 0.0)
        } else {
            let n = total as f64;
            let completeness = (total - counts.missing) as f64 / n * 100.0;
            let score = 100.0
                - counts.bad as f64 / n * 50.0
                - counts.suspect as f64 / n * 25.0
                - counts.missing as f64 / n * 10.0;
            (completeness, score.max(0.0))
        };

        let bad_pct = percentages.bad;
        let mut summary = Self {
            total_records: total,
            counts,
            percentages,
            severity_distribution,
            data_completeness,
            quality_score,
            suspect_and_bad_percentage: percentages.suspect + percentages.bad,
            professional_grade: QcGrade::from_score(quality_score),
            frequency_analysis_suitable: bad_pct < 1.0
                && data_completeness > 95.0
                && quality_score > 85.0,
            wmo_168_compliant: bad_pct < 2.0 && data_completeness > 90.0 && quality_score > 80.0,
            certification: CertificationLevel::assess(quality_score, bad_pct),
            recommendations: Vec::new(),
        };
        summary.recommendations = recommendations(&summary);
        summary
    }

    /// Score of at least 85 with under 1 % bad records
    pub fn meets_professional_standard(&self) -> bool {
        self.quality_score >= 85.0 && self.percentages.bad < 1.0
    }
}

fn recommendations(summary: &QcSummary) -> Vec<String> {
    if summary.total_records == 0 {
        return vec!["No records supplied - quality control could not be performed".to_string()];
    }
    let p = &summary.percentages;
    let mut out = Vec::new();
    if p.bad > 5.0 {
        out.push(
            "HIGH PRIORITY: >5% bad data detected - investigate sensor calibration and maintenance",
        );
    } else if p.bad > 1.0 {
        out.push("MEDIUM PRIORITY: >1% bad data - review measurement procedures");
    }
    if p.suspect > 10.0 {
        out.push("Review suspect data flags - may indicate systematic measurement issues");
    }
    if p.missing > 10.0 {
        out.push("High data loss rate - check data transmission and logging systems");
    }
    if summary.data_completeness < 90.0 {
        out.push("Data completeness below 90% - not suitable for critical frequency analysis");
    }
    if summary.quality_score < 85.0 {
        out.push("Quality score below professional standards - implement enhanced QC procedures");
    }
    if out.is_empty() {
        out.push("Data quality meets professional hydrological standards");
    }
    out.into_iter().map(String::from).collect()
}
