//! Equal-width histograms for goodness-of-fit testing and display
//!
//! The chi-square test bins a sample with [`SturgesRule`] and compares the
//! observed counts with [`Histogram::expected_counts`] under a fitted CDF.
//! Display histograms use [`AutoRule`], the smaller of the Freedman-Diaconis
//! and Sturges bin widths.
//!
//! # Example
//!
//! ```rust
//! use hydrofreq_histogram::{FixedWidthBuilder, HistogramBuilder};
//!
//! let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let histogram = FixedWidthBuilder::new(5).build(&data).unwrap();
//!
//! assert_eq!(histogram.len(), 5);
//! assert_eq!(histogram.counts().iter().sum::<usize>(), 10);
//! ```

mod builders;
mod traits;
mod types;

pub use builders::{AutoRule, FixedWidthBuilder, SturgesRule};
pub use traits::HistogramBuilder;
pub use types::{Histogram, HistogramBin};
