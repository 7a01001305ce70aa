//! Error types for segmentation and series classification.

use thiserror::Error;

/// Segmentation failure: no consumer rule accepted the remaining input.
///
/// Unreachable with a rule table that ends in the character rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no consumer rule accepts input {remaining:?}")]
    NoRuleAccepted { remaining: String },
}

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid dataset record: {0}")]
    Record(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SeriesError>;
