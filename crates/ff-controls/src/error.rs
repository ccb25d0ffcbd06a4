//! Error types for control services.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ControlError {
    #[error("Unknown schedule: {name}")]
    UnknownSchedule { name: String },

    #[error("Unknown schedule id (index={index}, len={len})")]
    UnknownId { index: usize, len: usize },

    #[error("Duplicate schedule name: {name}")]
    DuplicateName { name: String },
}

pub type ControlResult<T> = Result<T, ControlError>;
