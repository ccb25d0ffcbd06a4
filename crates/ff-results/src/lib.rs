//! ff-results: reporting sinks for fanflow.
//!
//! Components emit two kinds of records: one-time design-value entries
//! (produced during sizing) and per-timestep report taps. Emission is
//! write-only and fire-and-forget; what a sink does with the records is its
//! own business.

pub mod sink;
pub mod types;

use thiserror::Error;

pub use sink::{MemorySink, NullSink, ReportSink};
pub use types::{ReportRecord, ReportValue};

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ResultsResult<T> = Result<T, ResultsError>;
