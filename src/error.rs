/// Errors raised while sanitizing or loading scorecard inputs.
///
/// Normalization itself never fails; degenerate input such as an all-zero
/// scorecard has a defined result.
#[derive(Debug, thiserror::Error)]
pub enum ScorecardError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read tier data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScorecardError>;
