//! One-shot resolution of autosized design values.
//!
//! Sizing runs at most once per fan, after the environment constants are
//! known and before the first runtime calculation. The result must look
//! atomic to callers: either no sizing result exists, or a fully computed
//! one does.

use crate::config::{FanConfiguration, PowerSizingMethod};
use crate::error::{FanError, FanResult};
use crate::fan::FAN_TYPE;
use ff_curves::CurveRegistry;
use ff_results::ReportSink;

/// What kind of quantity a sizing recommendation is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingCategory {
    SystemAirflow,
}

/// External sizing-recommendation service.
///
/// The service sees the current value (if the field was not autosized) and
/// any active override, and returns the value to use. Honoring the override
/// is the service's side of the contract.
pub trait SizingService {
    fn recommend(
        &self,
        category: SizingCategory,
        fan_name: &str,
        field_label: &str,
        current: Option<f64>,
        override_value: Option<f64>,
    ) -> f64;
}

/// Trivial sizing service returning one fixed recommendation.
#[derive(Debug, Clone, Copy)]
pub struct ConstantSizer {
    pub recommended_flow_m3_s: f64,
}

impl SizingService for ConstantSizer {
    fn recommend(
        &self,
        _category: SizingCategory,
        _fan_name: &str,
        _field_label: &str,
        _current: Option<f64>,
        override_value: Option<f64>,
    ) -> f64 {
        override_value.unwrap_or(self.recommended_flow_m3_s)
    }
}

/// Resolved design values, computed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct FanSizingResult {
    /// Resolved design volume flow [m³/s]
    pub design_flow_m3_s: f64,
    /// Resolved design electric power [W]
    pub design_power_w: f64,
    /// Overall total efficiency, recomputed from flow, pressure, and power
    pub total_efficiency: f64,
    /// Standard air density captured from the environment [kg/m³]
    pub std_air_density_kg_m3: f64,
    /// Design flow as mass flow [kg/s]
    pub max_mass_flow_kg_s: f64,
    /// Power-relevant minimum mass flow [kg/s]
    pub min_mass_flow_kg_s: f64,
    /// Per-speed mass flow [kg/s], empty for single-speed fans
    pub mass_flow_at_speed_kg_s: Vec<f64>,
    /// Per-speed total efficiency, empty for single-speed fans
    pub total_efficiency_at_speed: Vec<f64>,
}

/// Resolve all design values for `cfg`.
///
/// Emits the design-value table entries as a side effect; the returned result
/// is the authoritative record.
pub fn resolve_sizing(
    cfg: &FanConfiguration,
    std_air_density_kg_m3: f64,
    sizer: &dyn SizingService,
    curves: &CurveRegistry,
    design_flow_override: Option<f64>,
    sink: &mut dyn ReportSink,
) -> FanResult<FanSizingResult> {
    let design_flow_m3_s = match cfg.design_flow_m3_s.value() {
        Some(v) => v,
        None => sizer.recommend(
            SizingCategory::SystemAirflow,
            &cfg.name,
            "Design Maximum Air Flow Rate [m3/s]",
            None,
            design_flow_override,
        ),
    };
    if !design_flow_m3_s.is_finite() || design_flow_m3_s <= 0.0 {
        return Err(FanError::Sizing {
            name: cfg.name.clone(),
            what: "resolved design flow must be positive and finite",
        });
    }

    let dp = cfg.pressure_rise.value;
    let design_power_w = match cfg.design_power_w.value() {
        Some(v) => v,
        None => {
            let power = match cfg.power_sizing_method {
                PowerSizingMethod::PowerPerFlow => design_flow_m3_s * cfg.power_per_flow,
                PowerSizingMethod::PowerPerFlowPerPressure => {
                    design_flow_m3_s * dp * cfg.power_per_flow_per_pressure
                }
                PowerSizingMethod::TotalEfficiencyAndPressure => {
                    design_flow_m3_s * dp / cfg.total_efficiency
                }
            };
            sink.record_design(
                &cfg.name,
                "Design Electric Power Consumption [W]",
                power.into(),
            );
            power
        }
    };
    if !design_power_w.is_finite() || design_power_w <= 0.0 {
        return Err(FanError::Sizing {
            name: cfg.name.clone(),
            what: "resolved design power must be positive and finite",
        });
    }

    // Overall efficiency at design conditions. This intentionally supersedes
    // a user-entered efficiency even when power was not autosized, keeping
    // flow, pressure, power, and efficiency mutually consistent.
    let total_efficiency = design_flow_m3_s * dp / design_power_w;

    let max_mass_flow_kg_s = design_flow_m3_s * std_air_density_kg_m3;
    let min_mass_flow_kg_s = max_mass_flow_kg_s * cfg.min_power_flow_fraction;

    let mut mass_flow_at_speed_kg_s = Vec::new();
    let mut total_efficiency_at_speed = Vec::new();
    if cfg.num_speeds() > 1 {
        mass_flow_at_speed_kg_s.reserve(cfg.num_speeds());
        total_efficiency_at_speed.reserve(cfg.num_speeds());
        for speed in &cfg.speeds {
            mass_flow_at_speed_kg_s.push(max_mass_flow_kg_s * speed.flow_fraction);
            let power_fraction = match speed.power_fraction {
                Some(pf) => pf,
                // Validation guarantees the curve exists when any power
                // fraction is missing.
                None => match cfg.power_curve {
                    Some(id) => curves.evaluate(id, speed.flow_fraction)?,
                    None => {
                        return Err(FanError::Sizing {
                            name: cfg.name.clone(),
                            what: "speed has no power fraction and no power curve",
                        });
                    }
                },
            };
            if !power_fraction.is_finite() || power_fraction <= 0.0 {
                return Err(FanError::Sizing {
                    name: cfg.name.clone(),
                    what: "power fraction at speed must be positive and finite",
                });
            }
            total_efficiency_at_speed.push(
                speed.flow_fraction * design_flow_m3_s * dp / (design_power_w * power_fraction),
            );
        }
    }

    tracing::debug!(
        fan = %cfg.name,
        design_flow_m3_s,
        design_power_w,
        total_efficiency,
        "fan sizing resolved"
    );

    sink.record_design(&cfg.name, "Type", FAN_TYPE.into());
    sink.record_design(
        &cfg.name,
        "Total Efficiency [W/W]",
        total_efficiency.into(),
    );
    sink.record_design(&cfg.name, "Delta Pressure [pa]", dp.into());
    sink.record_design(
        &cfg.name,
        "Max Air Flow Rate [m3/s]",
        design_flow_m3_s.into(),
    );
    sink.record_design(&cfg.name, "Rated Electric Power [W]", design_power_w.into());
    if design_flow_m3_s != 0.0 {
        sink.record_design(
            &cfg.name,
            "Rated Power Per Max Air Flow Rate [W-s/m3]",
            (design_power_w / design_flow_m3_s).into(),
        );
    }
    sink.record_design(
        &cfg.name,
        "Motor Heat In Air Fraction",
        cfg.motor_in_air_fraction.into(),
    );
    sink.record_design(&cfg.name, "End Use", cfg.end_use_subcategory.as_str().into());

    Ok(FanSizingResult {
        design_flow_m3_s,
        design_power_w,
        total_efficiency,
        std_air_density_kg_m3,
        max_mass_flow_kg_s,
        min_mass_flow_kg_s,
        mass_flow_at_speed_kg_s,
        total_efficiency_at_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolveContext;
    use crate::schema::{Autosizable, FanDef};
    use ff_controls::ScheduleRegistry;
    use ff_curves::{Curve, CurveKind, CurveRegistry};
    use ff_network::NodeStore;
    use ff_results::MemorySink;

    fn make_cfg(def: &FanDef, curves: &CurveRegistry) -> FanConfiguration {
        let schedules = ScheduleRegistry::new();
        let zones: Vec<String> = Vec::new();
        let mut nodes = NodeStore::new();
        let mut ctx = ResolveContext {
            schedules: &schedules,
            curves,
            zones: &zones,
            nodes: &mut nodes,
        };
        FanConfiguration::from_def(def, &mut ctx).unwrap()
    }

    fn base_def() -> FanDef {
        FanDef {
            name: "supply fan".to_string(),
            availability_schedule: None,
            inlet_node: "in".to_string(),
            outlet_node: "out".to_string(),
            design_flow_m3_s: Autosizable::Value(1.0),
            speed_control: None,
            min_power_flow_fraction: 0.0,
            pressure_rise_pa: 500.0,
            motor_efficiency: 0.9,
            motor_in_air_fraction: 1.0,
            design_power_w: Autosizable::Autosize,
            power_sizing_method: Some("TotalEfficiencyAndPressure".to_string()),
            power_per_flow: 0.0,
            power_per_flow_per_pressure: 0.0,
            total_efficiency: 0.6,
            power_curve: None,
            night_vent_pressure_rise_pa: 0.0,
            night_vent_flow_fraction: 0.0,
            motor_loss_zone: None,
            motor_loss_radiant_fraction: 0.0,
            end_use_subcategory: None,
            number_of_speeds: None,
            speed_fields: Vec::new(),
        }
    }

    #[test]
    fn power_from_total_efficiency_and_pressure() {
        let curves = CurveRegistry::new();
        let cfg = make_cfg(&base_def(), &curves);
        let sizer = ConstantSizer {
            recommended_flow_m3_s: 1.0,
        };
        let mut sink = MemorySink::new();
        let sizing = resolve_sizing(&cfg, 1.2, &sizer, &curves, None, &mut sink).unwrap();
        // power = 1.0 * 500 / 0.6
        assert!((sizing.design_power_w - 833.333).abs() < 0.01);
        // recomputed efficiency closes the loop back to 0.6
        assert!((sizing.total_efficiency - 0.6).abs() < 1e-12);
        assert!((sizing.max_mass_flow_kg_s - 1.2).abs() < 1e-12);
    }

    #[test]
    fn autosized_flow_comes_from_service() {
        let mut def = base_def();
        def.design_flow_m3_s = Autosizable::Autosize;
        let curves = CurveRegistry::new();
        let cfg = make_cfg(&def, &curves);
        let sizer = ConstantSizer {
            recommended_flow_m3_s: 2.5,
        };
        let mut sink = MemorySink::new();
        let sizing = resolve_sizing(&cfg, 1.2, &sizer, &curves, None, &mut sink).unwrap();
        assert!((sizing.design_flow_m3_s - 2.5).abs() < 1e-12);
    }

    #[test]
    fn flow_override_wins_over_service() {
        let mut def = base_def();
        def.design_flow_m3_s = Autosizable::Autosize;
        let curves = CurveRegistry::new();
        let cfg = make_cfg(&def, &curves);
        let sizer = ConstantSizer {
            recommended_flow_m3_s: 2.5,
        };
        let mut sink = MemorySink::new();
        let sizing = resolve_sizing(&cfg, 1.2, &sizer, &curves, Some(3.0), &mut sink).unwrap();
        assert!((sizing.design_flow_m3_s - 3.0).abs() < 1e-12);
    }

    #[test]
    fn efficiency_recomputed_even_for_literal_power() {
        let mut def = base_def();
        // 500 W literal power with flow 1.0 m3/s and 500 Pa: true efficiency 1.0,
        // not the entered 0.6
        def.design_power_w = Autosizable::Value(500.0);
        let curves = CurveRegistry::new();
        let cfg = make_cfg(&def, &curves);
        let sizer = ConstantSizer {
            recommended_flow_m3_s: 1.0,
        };
        let mut sink = MemorySink::new();
        let sizing = resolve_sizing(&cfg, 1.2, &sizer, &curves, None, &mut sink).unwrap();
        assert!((sizing.total_efficiency - 1.0).abs() < 1e-12);
    }

    #[test]
    fn speed_tables_use_entered_power_fractions_and_curve_fallback() {
        let mut def = base_def();
        def.design_power_w = Autosizable::Value(1000.0);
        def.number_of_speeds = Some(2);
        def.power_curve = Some("fan power".to_string());
        // speed 0 enters a power fraction; speed 1 falls back to the curve
        def.speed_fields = vec![Some(0.5), Some(0.25), Some(1.0)];
        let mut curves = CurveRegistry::new();
        curves
            .register(
                Curve::new(
                    "fan power",
                    CurveKind::Cubic {
                        c0: 0.0,
                        c1: 0.0,
                        c2: 0.0,
                        c3: 1.0,
                    },
                    0.0,
                    1.0,
                )
                .unwrap(),
            )
            .unwrap();
        let cfg = make_cfg(&def, &curves);
        let sizer = ConstantSizer {
            recommended_flow_m3_s: 1.0,
        };
        let mut sink = MemorySink::new();
        let sizing = resolve_sizing(&cfg, 1.2, &sizer, &curves, None, &mut sink).unwrap();
        assert_eq!(sizing.mass_flow_at_speed_kg_s.len(), 2);
        assert!((sizing.mass_flow_at_speed_kg_s[0] - 0.6).abs() < 1e-12);
        assert!((sizing.mass_flow_at_speed_kg_s[1] - 1.2).abs() < 1e-12);
        // speed 0: eff = 0.5 * 1.0 * 500 / (1000 * 0.25) = 1.0
        assert!((sizing.total_efficiency_at_speed[0] - 1.0).abs() < 1e-12);
        // speed 1: curve(1.0) = 1.0 -> eff = 1.0 * 1.0 * 500 / (1000 * 1.0) = 0.5
        assert!((sizing.total_efficiency_at_speed[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn design_entries_emitted() {
        let curves = CurveRegistry::new();
        let cfg = make_cfg(&base_def(), &curves);
        let sizer = ConstantSizer {
            recommended_flow_m3_s: 1.0,
        };
        let mut sink = MemorySink::new();
        resolve_sizing(&cfg, 1.2, &sizer, &curves, None, &mut sink).unwrap();
        for field in [
            "Type",
            "Total Efficiency [W/W]",
            "Delta Pressure [pa]",
            "Max Air Flow Rate [m3/s]",
            "Rated Electric Power [W]",
            "Rated Power Per Max Air Flow Rate [W-s/m3]",
            "Motor Heat In Air Fraction",
            "End Use",
        ] {
            assert!(
                sink.design_value("supply fan", field).is_some(),
                "missing design entry: {field}"
            );
        }
    }
}
