//! ff-controls: availability schedules and external override ports.
//!
//! Two small services the fan model consumes:
//! - schedules gate component availability per timestep;
//! - override ports let an external supervisory controller pre-empt derived
//!   quantities. The model only ever reads a port; writing is the external
//!   controller's side of the contract.

pub mod error;
pub mod overrides;
pub mod schedule;

pub use error::{ControlError, ControlResult};
pub use overrides::{FanOverrides, OverridePort, OverrideSnapshot};
pub use schedule::ScheduleRegistry;
