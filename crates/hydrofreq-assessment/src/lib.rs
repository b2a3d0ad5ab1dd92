//! Professional assessment of a flood frequency analysis
//!
//! [`assess`] folds three independent views of an analysis into a single
//! score and [`AssessmentGrade`]:
//!
//! - data quality from the QC pipeline ([`hydrofreq_qc::QcSummary`])
//! - statistical validation of the annual series
//!   ([`hydrofreq_validation::ValidationReport`])
//! - goodness of fit of the selected distribution
//!   ([`hydrofreq_frequency::DistributionAnalysis`])
//!
//! It also checks design values for extrapolation and physical
//! plausibility, and lists warnings, usage limitations and recommendations
//! for whichever component fell short.

mod assessment;
mod checks;
mod grade;
mod scores;
mod weights;

pub use assessment::{assess, CriticalWarning, ProfessionalAssessment, FIT_SCORE_TARGET, QC_SCORE_TARGET};
pub use checks::{
    ExtrapolationCheck, PhysicalReasonablenessCheck, UnreasonableEstimate, EXTRAPOLATION_FACTOR,
    PHYSICAL_LIMIT_FACTOR,
};
pub use grade::AssessmentGrade;
pub use scores::{
    adequacy_score, outlier_score, p_value_score, record_length_score, FitAdequacy, SubScores,
    ValidationSubScores, NOT_PERFORMED_SCORE,
};
pub use weights::AssessmentWeights;
