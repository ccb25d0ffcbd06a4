//! Error types for the fan model.

use thiserror::Error;

pub use crate::config::ConfigError;

/// Errors from fan construction, sizing, and orchestration.
///
/// The runtime calculation itself is a total function and has no error paths;
/// everything fallible happens at construction or at the service seams.
#[derive(Error, Debug)]
pub enum FanError {
    #[error("Invalid configuration for fan \"{name}\": {} severe error(s)", .errors.len())]
    InvalidConfiguration {
        name: String,
        errors: Vec<ConfigError>,
    },

    #[error("Sizing has not run for fan \"{name}\": {what}")]
    SizingRequired { name: String, what: &'static str },

    #[error("Sizing failed for fan \"{name}\": {what}")]
    Sizing { name: String, what: &'static str },

    #[error("Service error: {message}")]
    Service { message: String },
}

pub type FanResult<T> = Result<T, FanError>;

impl From<ff_network::NetworkError> for FanError {
    fn from(e: ff_network::NetworkError) -> Self {
        FanError::Service {
            message: format!("node store error: {e}"),
        }
    }
}

impl From<ff_curves::CurveError> for FanError {
    fn from(e: ff_curves::CurveError) -> Self {
        FanError::Service {
            message: format!("curve registry error: {e}"),
        }
    }
}

impl From<ff_controls::ControlError> for FanError {
    fn from(e: ff_controls::ControlError) -> Self {
        FanError::Service {
            message: format!("control service error: {e}"),
        }
    }
}

impl From<ff_air::AirError> for FanError {
    fn from(e: ff_air::AirError) -> Self {
        FanError::Service {
            message: format!("air property error: {e}"),
        }
    }
}
