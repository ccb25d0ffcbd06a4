//! Validated fan configuration.
//!
//! `FanConfiguration::from_def` turns the raw record into an immutable,
//! reference-resolved configuration. Every check runs; severe errors
//! accumulate and fail construction together, so a rejected record reports
//! all of its problems at once and no partially valid configuration ever
//! escapes. Warnings log and apply their documented fallback.

use crate::error::{FanError, FanResult};
use crate::schema::{Autosizable, FanDef};
use ff_controls::ScheduleRegistry;
use ff_core::units::{pa, Pressure};
use ff_core::{CurveId, NodeId, ScheduleId, ZoneId};
use ff_curves::CurveRegistry;
use ff_network::NodeStore;
use thiserror::Error;

/// Speed control method for the fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedControl {
    /// Fixed speed levels; intermediate flow is met by cycling between them.
    Discrete,
    /// Variable speed drive; power follows the modifier curve continuously.
    Continuous,
}

/// How design electric power is derived when autosized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSizingMethod {
    /// power = flow × coefficient
    PowerPerFlow,
    /// power = flow × pressure rise × coefficient
    PowerPerFlowPerPressure,
    /// power = flow × pressure rise ÷ total efficiency
    TotalEfficiencyAndPressure,
}

/// Where motor heat losses not entering the airstream end up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeatLossDestination {
    Zone {
        zone: ZoneId,
        radiant_fraction: f64,
    },
    Outside,
}

/// One discrete speed level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLevel {
    /// Flow at this speed as a fraction of design flow
    pub flow_fraction: f64,
    /// Power at this speed as a fraction of design power, if entered
    pub power_fraction: Option<f64>,
}

/// One severe validation finding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown availability schedule \"{name}\"")]
    UnknownSchedule { name: String },

    #[error("Unrecognized speed control \"{token}\"")]
    BadSpeedControl { token: String },

    #[error("Unrecognized power sizing method \"{token}\"")]
    BadPowerSizingMethod { token: String },

    #[error("Unknown power modifier curve \"{name}\"")]
    UnknownCurve { name: String },

    #[error("Continuous speed control requires a power modifier curve")]
    MissingCurveForContinuous,

    #[error("{declared} speeds declared but {fields} trailing speed fields given")]
    SpeedFieldCount { declared: usize, fields: usize },

    #[error("Speed {index}: flow fraction is blank")]
    MissingFlowFraction { index: usize },

    #[error("Speed {index}: flow fraction does not increase over the previous speed")]
    NonIncreasingFlowFractions { index: usize },

    #[error("Speed {index}: no power fraction entered and no power curve configured")]
    MissingPowerFraction { index: usize },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// External services consulted while resolving references.
pub struct ResolveContext<'a> {
    pub schedules: &'a ScheduleRegistry,
    pub curves: &'a CurveRegistry,
    /// Known zone names, position = zone id
    pub zones: &'a [String],
    pub nodes: &'a mut NodeStore,
}

/// Immutable, validated fan configuration.
#[derive(Debug, Clone)]
pub struct FanConfiguration {
    pub name: String,
    pub availability: ScheduleId,
    pub inlet_node: NodeId,
    pub outlet_node: NodeId,
    pub design_flow_m3_s: Autosizable,
    pub speed_control: SpeedControl,
    pub min_power_flow_fraction: f64,
    pub pressure_rise: Pressure,
    pub motor_efficiency: f64,
    pub motor_in_air_fraction: f64,
    pub design_power_w: Autosizable,
    pub power_sizing_method: PowerSizingMethod,
    pub power_per_flow: f64,
    pub power_per_flow_per_pressure: f64,
    pub total_efficiency: f64,
    pub power_curve: Option<CurveId>,
    pub night_vent_pressure_rise: Pressure,
    pub night_vent_flow_fraction: f64,
    pub heat_loss: HeatLossDestination,
    pub end_use_subcategory: String,
    /// Speed levels in increasing flow order; a single implicit full-speed
    /// level when the record declares no multi-speed block
    pub speeds: Vec<SpeedLevel>,
}

impl FanConfiguration {
    /// Validate a raw record and resolve its references.
    ///
    /// # Errors
    /// `FanError::InvalidConfiguration` carrying every severe finding.
    pub fn from_def(def: &FanDef, ctx: &mut ResolveContext<'_>) -> FanResult<Self> {
        let mut errors: Vec<ConfigError> = Vec::new();

        let availability = match def.availability_schedule.as_deref() {
            None | Some("") => ScheduleRegistry::ALWAYS_ON,
            Some(name) => match ctx.schedules.find(name) {
                Ok(id) => id,
                Err(_) => {
                    errors.push(ConfigError::UnknownSchedule {
                        name: name.to_string(),
                    });
                    ScheduleRegistry::ALWAYS_ON
                }
            },
        };

        let inlet_node = ctx.nodes.intern(&def.inlet_node);
        let outlet_node = ctx.nodes.intern(&def.outlet_node);

        let speed_control = match def.speed_control.as_deref() {
            None | Some("") => SpeedControl::Discrete,
            Some(token) if token.eq_ignore_ascii_case("discrete") => SpeedControl::Discrete,
            Some(token) if token.eq_ignore_ascii_case("continuous") => SpeedControl::Continuous,
            Some(token) => {
                errors.push(ConfigError::BadSpeedControl {
                    token: token.to_string(),
                });
                SpeedControl::Discrete
            }
        };

        // Sizing method is only consulted when design power is autosized.
        let power_sizing_method = if def.design_power_w.is_autosized() {
            match def.power_sizing_method.as_deref() {
                None | Some("") => PowerSizingMethod::PowerPerFlowPerPressure,
                Some(token) if token.eq_ignore_ascii_case("powerperflow") => {
                    PowerSizingMethod::PowerPerFlow
                }
                Some(token) if token.eq_ignore_ascii_case("powerperflowperpressure") => {
                    PowerSizingMethod::PowerPerFlowPerPressure
                }
                Some(token) if token.eq_ignore_ascii_case("totalefficiencyandpressure") => {
                    PowerSizingMethod::TotalEfficiencyAndPressure
                }
                Some(token) => {
                    errors.push(ConfigError::BadPowerSizingMethod {
                        token: token.to_string(),
                    });
                    PowerSizingMethod::PowerPerFlowPerPressure
                }
            }
        } else {
            PowerSizingMethod::PowerPerFlowPerPressure
        };

        let power_curve = match def.power_curve.as_deref() {
            None | Some("") => None,
            Some(name) => match ctx.curves.find(name) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(ConfigError::UnknownCurve {
                        name: name.to_string(),
                    });
                    None
                }
            },
        };

        if speed_control == SpeedControl::Continuous && def.power_curve.is_none() {
            errors.push(ConfigError::MissingCurveForContinuous);
        }

        // Zone resolution: unresolved non-blank reference degrades to outside
        // with a warning; the fan keeps running.
        let heat_loss = match def.motor_loss_zone.as_deref() {
            None | Some("") => HeatLossDestination::Outside,
            Some(name) => match ctx
                .zones
                .iter()
                .position(|z| z.eq_ignore_ascii_case(name))
            {
                Some(index) => HeatLossDestination::Zone {
                    zone: ZoneId::from_index(index as u32),
                    radiant_fraction: def.motor_loss_radiant_fraction,
                },
                None => {
                    tracing::warn!(
                        fan = %def.name,
                        zone = %name,
                        "zone name not found; fan motor heat losses will not be added to a zone"
                    );
                    HeatLossDestination::Outside
                }
            },
        };

        let end_use_subcategory = match def.end_use_subcategory.as_deref() {
            None | Some("") => "General".to_string(),
            Some(label) => label.to_string(),
        };

        check_fraction(
            &mut errors,
            "motor efficiency",
            def.motor_efficiency,
            Exclusivity::ExcludeZero,
        );
        check_fraction(
            &mut errors,
            "motor in-air fraction",
            def.motor_in_air_fraction,
            Exclusivity::ExcludeZero,
        );
        check_fraction(
            &mut errors,
            "total efficiency",
            def.total_efficiency,
            Exclusivity::ExcludeZero,
        );
        check_fraction(
            &mut errors,
            "minimum power flow fraction",
            def.min_power_flow_fraction,
            Exclusivity::IncludeZero,
        );
        check_fraction(
            &mut errors,
            "motor loss radiant fraction",
            def.motor_loss_radiant_fraction,
            Exclusivity::IncludeZero,
        );
        check_non_negative(&mut errors, "pressure rise", def.pressure_rise_pa);
        check_non_negative(
            &mut errors,
            "night vent pressure rise",
            def.night_vent_pressure_rise_pa,
        );
        check_non_negative(
            &mut errors,
            "night vent flow fraction",
            def.night_vent_flow_fraction,
        );
        if let Some(v) = def.design_flow_m3_s.value() {
            if !v.is_finite() || v <= 0.0 {
                errors.push(ConfigError::InvalidValue {
                    field: "design flow",
                    value: v,
                    reason: "must be positive and finite",
                });
            }
        }
        if let Some(v) = def.design_power_w.value() {
            if !v.is_finite() || v <= 0.0 {
                errors.push(ConfigError::InvalidValue {
                    field: "design power",
                    value: v,
                    reason: "must be positive and finite",
                });
            }
        }

        let num_speeds = def.number_of_speeds.unwrap_or(1) as usize;
        if num_speeds == 0 {
            errors.push(ConfigError::InvalidValue {
                field: "number of speeds",
                value: 0.0,
                reason: "at least one speed level is required",
            });
        }

        let speeds = if speed_control == SpeedControl::Discrete && num_speeds > 1 {
            parse_speed_levels(def, num_speeds, power_curve.is_some(), &mut errors)
        } else {
            vec![SpeedLevel {
                flow_fraction: 1.0,
                power_fraction: None,
            }]
        };

        if !errors.is_empty() {
            return Err(FanError::InvalidConfiguration {
                name: def.name.clone(),
                errors,
            });
        }

        Ok(Self {
            name: def.name.clone(),
            availability,
            inlet_node,
            outlet_node,
            design_flow_m3_s: def.design_flow_m3_s,
            speed_control,
            min_power_flow_fraction: def.min_power_flow_fraction,
            pressure_rise: pa(def.pressure_rise_pa),
            motor_efficiency: def.motor_efficiency,
            motor_in_air_fraction: def.motor_in_air_fraction,
            design_power_w: def.design_power_w,
            power_sizing_method,
            power_per_flow: def.power_per_flow,
            power_per_flow_per_pressure: def.power_per_flow_per_pressure,
            total_efficiency: def.total_efficiency,
            power_curve,
            night_vent_pressure_rise: pa(def.night_vent_pressure_rise_pa),
            night_vent_flow_fraction: def.night_vent_flow_fraction,
            heat_loss,
            end_use_subcategory,
            speeds,
        })
    }

    pub fn num_speeds(&self) -> usize {
        self.speeds.len()
    }
}

/// Parse the trailing (flow fraction, power fraction) pairs for a discrete
/// multi-speed fan. The record must carry exactly 2N fields, or 2N−1 when the
/// last power fraction is omitted.
fn parse_speed_levels(
    def: &FanDef,
    num_speeds: usize,
    has_power_curve: bool,
    errors: &mut Vec<ConfigError>,
) -> Vec<SpeedLevel> {
    let fields = def.speed_fields.len();
    if fields != 2 * num_speeds && fields != 2 * num_speeds - 1 {
        errors.push(ConfigError::SpeedFieldCount {
            declared: num_speeds,
            fields,
        });
        return Vec::new();
    }

    let mut speeds = Vec::with_capacity(num_speeds);
    for index in 0..num_speeds {
        let flow_fraction = match def.speed_fields[2 * index] {
            Some(v) => v,
            None => {
                errors.push(ConfigError::MissingFlowFraction { index });
                continue;
            }
        };
        if !flow_fraction.is_finite() || flow_fraction <= 0.0 || flow_fraction > 1.0 {
            errors.push(ConfigError::InvalidValue {
                field: "speed flow fraction",
                value: flow_fraction,
                reason: "must be in (0, 1]",
            });
        }
        let power_fraction = def.speed_fields.get(2 * index + 1).copied().flatten();
        if power_fraction.is_none() && !has_power_curve {
            errors.push(ConfigError::MissingPowerFraction { index });
        }
        speeds.push(SpeedLevel {
            flow_fraction,
            power_fraction,
        });
    }

    for index in 1..speeds.len() {
        if speeds[index].flow_fraction <= speeds[index - 1].flow_fraction {
            errors.push(ConfigError::NonIncreasingFlowFractions { index });
        }
    }

    speeds
}

enum Exclusivity {
    ExcludeZero,
    IncludeZero,
}

fn check_fraction(
    errors: &mut Vec<ConfigError>,
    field: &'static str,
    value: f64,
    exclusivity: Exclusivity,
) {
    let ok = match exclusivity {
        Exclusivity::ExcludeZero => value.is_finite() && value > 0.0 && value <= 1.0,
        Exclusivity::IncludeZero => value.is_finite() && (0.0..=1.0).contains(&value),
    };
    if !ok {
        errors.push(ConfigError::InvalidValue {
            field,
            value,
            reason: match exclusivity {
                Exclusivity::ExcludeZero => "must be in (0, 1]",
                Exclusivity::IncludeZero => "must be in [0, 1]",
            },
        });
    }
}

fn check_non_negative(errors: &mut Vec<ConfigError>, field: &'static str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError::InvalidValue {
            field,
            value,
            reason: "must be non-negative and finite",
        });
    }
}
