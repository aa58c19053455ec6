use thiserror::Error;

/// Reasons a raw record cannot become a `SwapEvent`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Missing mandatory field: {field}")]
    MissingField { field: &'static str },

    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),
}

pub type NormalizeResult<T> = std::result::Result<T, NormalizeError>;
