use chainwatch_core::NormalizeError;
use thiserror::Error;

/// Errors surfaced to the caller of an analysis
///
/// Detectors themselves are infallible; these only arise while preparing input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("No valid events: all {total} records rejected ({dropped} dropped)")]
    NoValidEvents { total: usize, dropped: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Normalization failed: {0}")]
    Normalize(#[from] NormalizeError),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;
