//! Error types for node storage.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Unknown node id (index={index}, len={len})")]
    UnknownNode { index: usize, len: usize },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
