//! Error types for moist-air property evaluation.

use thiserror::Error;

/// Errors from property functions with restricted domains.
#[derive(Error, Debug, Clone)]
pub enum AirError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },
}

pub type AirResult<T> = Result<T, AirError>;
