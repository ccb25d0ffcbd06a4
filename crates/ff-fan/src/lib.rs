//! ff-fan: the system fan performance model.
//!
//! One fan instance owns a validated configuration, a one-shot sizing result,
//! and per-timestep runtime state. Each simulation step runs exactly one
//! calculate → update → report cycle:
//!
//! - `calc` computes power draw and the outlet air state as a value,
//! - `fan` writes that value to the shared outlet node and the report taps,
//! - overrides from an external controller pre-empt derived quantities.

pub mod calc;
pub mod config;
pub mod error;
pub mod fan;
pub mod lifecycle;
pub mod registry;
pub mod schema;
pub mod sizing;

pub use calc::{FanRuntimeState, SimRequest};
pub use config::{
    FanConfiguration, HeatLossDestination, PowerSizingMethod, ResolveContext, SpeedControl,
    SpeedLevel,
};
pub use error::{ConfigError, FanError, FanResult};
pub use fan::{Environment, FanServices, FanSystem};
pub use lifecycle::Lifecycle;
pub use registry::{FanRegistry, Lookup};
pub use schema::{Autosizable, FanDef};
pub use sizing::{ConstantSizer, FanSizingResult, SizingCategory, SizingService};
