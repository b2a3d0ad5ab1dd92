//! Quality control for hydrological observation series
//!
//! Every record is screened by nine independent checks in the spirit of
//! WMO-No. 168: physical range, gross error, temporal and internal
//! consistency, spikes, persistence, rate of change, statistical outliers
//! and climatological plausibility. The per-check flags are folded into one
//! worst-case [`QcFlag`] per record and summarised in a [`QcSummary`].
//!
//! # Example
//!
//! ```rust
//! use hydrofreq_core::AnnualSeries;
//! use hydrofreq_qc::{run_quality_control, ParameterType, QcConfig, QcRecord, QcStatus};
//!
//! let series = AnnualSeries::from_values(1990, &[410.0, 530.0, 475.0, 620.0, 455.0, 580.0]).unwrap();
//! let records = QcRecord::from_series(&series).unwrap();
//! let report = run_quality_control(&records, ParameterType::Flow, &QcConfig::default()).unwrap();
//! assert!(report.records.iter().all(|r| r.flag.status == QcStatus::Good));
//! assert_eq!(report.summary.quality_score, 100.0);
//! ```

mod bounds;
pub mod checks;
mod config;
mod flags;
mod pipeline;
mod record;
mod summary;
mod traits;

pub use bounds::{ParameterType, PhysicalBounds, OPEN_BOUNDS};
pub use config::QcConfig;
pub use flags::{QcFlag, QcStatus, PASSES_ALL};
pub use pipeline::{run_quality_control, FlaggedRecord, QcReport, QualityControlPipeline};
pub use record::QcRecord;
pub use summary::{CertificationLevel, QcGrade, QcSummary, StatusCounts, StatusPercentages};
pub use traits::{CheckContext, QcCheck};
