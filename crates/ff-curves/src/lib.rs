//! ff-curves: named performance-curve evaluation for fanflow.
//!
//! Components reference curves by name in their configuration; the registry
//! resolves names to compact handles at construction time and evaluates by
//! handle at runtime.

pub mod curve;
pub mod error;
pub mod registry;

pub use curve::{Curve, CurveKind};
pub use error::{CurveError, CurveResult};
pub use registry::CurveRegistry;
