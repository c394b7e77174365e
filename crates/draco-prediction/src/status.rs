use thiserror::Error;

/// Errors reported by the prediction-transform layer.
///
/// Every failure is terminal for the attribute currently being encoded or
/// decoded; callers propagate it with `?` and abort the attribute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DracoError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Buffer decode error: {0}")]
    BufferError(String),
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Not initialized: {0}")]
    Uninitialized(&'static str),
    #[error("Unsupported prediction transform type: {0}")]
    UnsupportedTransform(u8),
}

pub type Status = Result<(), DracoError>;

pub fn ok_status() -> Status {
    Ok(())
}

pub fn invalid_parameter(msg: impl Into<String>) -> DracoError {
    DracoError::InvalidParameter(msg.into())
}

pub fn invariant_violation(msg: impl Into<String>) -> DracoError {
    DracoError::InvariantViolation(msg.into())
}
