use thiserror::Error;

/// Errors that can occur while estimating a lag
///
/// All variants are deterministic validation failures. Retrying the same
/// call with the same inputs fails the same way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sample rate mismatch: reference {reference} Hz, recording {recording} Hz")]
    SampleRateMismatch { reference: u32, recording: u32 },
}

pub type Result<T> = std::result::Result<T, CorrelationError>;

impl CorrelationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
