//! Series grouping for federated open-data search results.
//!
//! Helps a reader see through near-duplicate listings:
//! 1. Segmentation of dataset titles (era names, years, brackets)
//! 2. Threshold-bounded, segment-aware edit distance
//! 3. First-fit grouping into same-package and similar-title series
//!
//! With the `python` feature the crate also builds a Python extension module.

pub mod config;
pub mod consumer;
pub mod context;
pub mod distance;
pub mod error;
pub mod record;
pub mod segment;
pub mod series;

#[cfg(feature = "python")]
mod python;

pub use config::SeriesConfig;
pub use consumer::{segment, BracketPair, ConsumerRule, RuleTable, MAX_BRACKET_DEPTH};
pub use distance::{distance, titles_within_threshold, within_threshold, DistanceMatrix, Verdict};
pub use error::{ParseError, Result, SeriesError};
pub use record::{site_hostname, Dataset};
pub use segment::{Bracket, ContextKey, Segment, SegmentKind, Segments, WordCategory};
pub use series::{classify, Candidate, DatasetSeries, SameSeries, SeriesBatch, SimilarSeries};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Native series grouping for the search UI backend.
#[cfg(feature = "python")]
#[pymodule]
fn xsearch_series(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::segment_title, m)?)?;
    m.add_function(wrap_pyfunction!(python::titles_within_threshold, m)?)?;
    m.add_function(wrap_pyfunction!(python::classify_series, m)?)?;
    Ok(())
}
