//! Error types for curve definition and lookup.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CurveError {
    #[error("Unknown curve: {name}")]
    UnknownCurve { name: String },

    #[error("Unknown curve id (index={index}, len={len})")]
    UnknownId { index: usize, len: usize },

    #[error("Duplicate curve name: {name}")]
    DuplicateName { name: String },

    #[error("Invalid curve definition: {what}")]
    InvalidDefinition { what: &'static str },
}

pub type CurveResult<T> = Result<T, CurveError>;
