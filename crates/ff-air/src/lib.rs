//! ff-air: moist-air property functions for fanflow.
//!
//! Small closed-form psychrometric relations over the dry-bulb temperature /
//! humidity-ratio plane. All temperatures are dry-bulb in °C, humidity ratios
//! in kg water per kg dry air, enthalpies in J/kg.

pub mod error;
pub mod psychro;

pub use error::{AirError, AirResult};
pub use psychro::*;
