use thiserror::Error;

use crate::crypto::interpolate::InterpolationError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreError {
    #[error("Invalid threshold policy: {0}")]
    InvalidPolicy(String),
    #[error("Arithmetic error: {0}")]
    ArithmeticError(String),
    #[error("Insufficient or inconsistent shares: {0}")]
    InsufficientOrInconsistentShares(String),
    #[error("Decoding error: {0}")]
    DecodingError(String),
    #[error("Proxy transport error: {0}")]
    Transport(String),
}

impl From<InterpolationError> for PreError {
    fn from(err: InterpolationError) -> PreError {
        match err {
            InterpolationError::DuplicateX => PreError::ArithmeticError(String::from(
                "share identifiers collide, lagrange denominator is zero",
            )),
        }
    }
}
