use thiserror::Error;

#[derive(Error, Debug)]
pub enum PKError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Ambiguous value '{text}': found {candidates:?}")]
    Ambiguous { text: String, candidates: Vec<f64> },

    #[error("Unresolvable: {0}")]
    Unresolvable(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type PKResult<T> = Result<T, PKError>;

/// Rejects a non-positive (or NaN) value before it is used as a divisor.
pub(crate) fn require_positive(name: &str, value: f64) -> PKResult<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(PKError::InvalidInput(format!("{} must be greater than 0 (got {})", name, value)))
    }
}
