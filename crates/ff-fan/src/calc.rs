//! Per-timestep power and outlet-state calculation.
//!
//! ## Model
//!
//! Electrical power for a speed level running a fraction `rtf` of the step:
//!
//! ```text
//! power = rtf * mdot_speed * Δp / (eta_total * rho_std)
//! ```
//!
//! Discrete control meets an intermediate flow request by cycling between the
//! two bracketing speed levels (or between off and the lowest speed); the
//! runtime fractions are the interpolation weights. Continuous control reads
//! a power fraction off the modifier curve instead.
//!
//! Energy added to the airstream:
//!
//! ```text
//! shaft = eta_motor * power
//! q_air = shaft + (power - shaft) * f_motor_in_air
//! h_out = h_in + q_air / mdot
//! ```
//!
//! Humidity ratio passes through unchanged; the outlet dry-bulb comes from
//! inverting h(T, w).
//!
//! The whole calculation is a total function over a configuration already
//! proven valid: out-of-range requests are clamped, never rejected.

use crate::config::{FanConfiguration, SpeedControl};
use crate::sizing::FanSizingResult;
use ff_air::temperature_from_enthalpy_humidity;
use ff_controls::OverrideSnapshot;
use ff_curves::Curve;
use ff_network::AirNode;

/// Temperature rise limit [°C] past which continuous-control power is
/// rescaled; at very small flow the power-to-enthalpy division blows up.
const LOW_FLOW_DELTA_T_LIMIT_C: f64 = 20.0;

/// Flow fraction anchoring the low-flow linear power rescale.
const LOW_FLOW_REFERENCE_FRACTION: f64 = 0.10;

/// Per-call request with explicit optional arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimRequest {
    /// Commanded flow as a fraction of design flow; absent means "follow the
    /// inlet node"
    pub flow_fraction: Option<f64>,
    /// Pressure rise to use instead of the design value [Pa]
    pub pressure_rise_pa: Option<f64>,
    /// Night-ventilation mode is active globally
    pub night_vent: bool,
    /// Turn-on signal from a parent component
    pub turn_fans_on: bool,
    /// Turn-off signal from a parent component
    pub turn_fans_off: bool,
}

/// Runtime state, overwritten on every calculate call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanRuntimeState {
    pub inlet_mass_flow_kg_s: f64,
    pub outlet_mass_flow_kg_s: f64,
    pub inlet_t_c: f64,
    pub outlet_t_c: f64,
    pub inlet_hum_rat: f64,
    pub outlet_hum_rat: f64,
    pub inlet_h_j_per_kg: f64,
    pub outlet_h_j_per_kg: f64,
    /// Electrical power draw [W]
    pub power_w: f64,
    /// Fraction of the step each speed level ran; sums to the fraction of the
    /// step the fan produced flow, not necessarily 1
    pub runtime_fraction_at_speed: Vec<f64>,
    /// Downstream flow bounds for this step [kg/s]; 0 while off
    pub mass_flow_max_avail_kg_s: f64,
    pub mass_flow_min_avail_kg_s: f64,
    /// Electric energy for the step [J], filled by report()
    pub energy_j: f64,
    /// Air temperature rise [°C], filled by report()
    pub delta_t_c: f64,
}

/// Compute one timestep.
///
/// `availability` is the current value of the fan's availability schedule,
/// already resolved by the orchestrator; `power_curve` is the fan's modifier
/// curve, resolved from its validated handle.
pub fn calculate(
    cfg: &FanConfiguration,
    sizing: &FanSizingResult,
    inlet: &AirNode,
    req: &SimRequest,
    availability: f64,
    ovr: &OverrideSnapshot,
    power_curve: Option<&Curve>,
) -> FanRuntimeState {
    let rho = sizing.std_air_density_kg_m3;
    let max_flow = sizing.max_mass_flow_kg_s;

    // Inlet flow clamped into the negotiated availability band.
    let max_avail = max_flow.min(inlet.mass_flow_max_avail_kg_s);
    let min_avail = sizing
        .min_mass_flow_kg_s
        .max(inlet.mass_flow_min_avail_kg_s)
        .min(max_avail);
    let inlet_flow = inlet.mass_flow_kg_s.clamp(min_avail, max_avail);

    // Effective pressure: night vent > explicit request > design value.
    let mut pressure = if req.night_vent && cfg.night_vent_pressure_rise.value > 0.0 {
        cfg.night_vent_pressure_rise.value
    } else {
        req.pressure_rise_pa.unwrap_or(cfg.pressure_rise.value)
    };

    // Effective target flow: night vent > commanded fraction > inlet node.
    let mut target = if req.night_vent && cfg.night_vent_flow_fraction > 0.0 {
        cfg.night_vent_flow_fraction * max_flow
    } else if let Some(fraction) = req.flow_fraction {
        fraction * max_flow
    } else {
        inlet_flow
    };

    // Overrides apply last and pre-empt everything above.
    if let Some(p) = ovr.pressure_rise_pa {
        pressure = p;
    }
    let total_efficiency = ovr.total_efficiency.unwrap_or(sizing.total_efficiency);
    if let Some(mdot) = ovr.mass_flow_kg_s {
        target = mdot;
    }

    let flow = target.clamp(0.0, max_flow);
    let flow_fraction = if max_flow > 0.0 { flow / max_flow } else { 0.0 };

    let running =
        (availability > 0.0 || req.turn_fans_on) && !req.turn_fans_off && flow > 0.0;

    let num_speeds = cfg.num_speeds();
    let mut state = FanRuntimeState {
        inlet_mass_flow_kg_s: inlet_flow,
        outlet_mass_flow_kg_s: 0.0,
        inlet_t_c: inlet.t_c,
        outlet_t_c: inlet.t_c,
        inlet_hum_rat: inlet.hum_rat,
        outlet_hum_rat: inlet.hum_rat,
        inlet_h_j_per_kg: inlet.h_j_per_kg,
        outlet_h_j_per_kg: inlet.h_j_per_kg,
        power_w: 0.0,
        runtime_fraction_at_speed: vec![0.0; num_speeds],
        mass_flow_max_avail_kg_s: 0.0,
        mass_flow_min_avail_kg_s: 0.0,
        energy_j: 0.0,
        delta_t_c: 0.0,
    };

    if !running {
        // Off: no power, no flow, inlet scalars pass through, bounds collapse.
        return state;
    }

    let power_w = match cfg.speed_control {
        SpeedControl::Discrete if num_speeds == 1 => {
            // Duty cycle: the unit cycles at nameplate flow for flow_fraction
            // of the step.
            state.runtime_fraction_at_speed[0] = flow_fraction;
            flow_fraction * max_flow * pressure / (total_efficiency * rho)
        }
        SpeedControl::Discrete => {
            // Efficiency override replaces the per-speed table as well.
            let speed_eff = |index: usize| {
                ovr.total_efficiency
                    .unwrap_or(sizing.total_efficiency_at_speed[index])
            };
            let speed_power = |index: usize, rtf: f64| {
                rtf * sizing.mass_flow_at_speed_kg_s[index] * pressure
                    / (speed_eff(index) * rho)
            };
            let lowest = cfg.speeds[0].flow_fraction;
            let highest = cfg.speeds[num_speeds - 1].flow_fraction;
            if flow_fraction <= lowest {
                // Cycle between off and the lowest speed.
                let rtf = flow_fraction / lowest;
                state.runtime_fraction_at_speed[0] = rtf;
                speed_power(0, rtf)
            } else if flow_fraction >= highest {
                let rtf = (flow_fraction / highest).min(1.0);
                state.runtime_fraction_at_speed[num_speeds - 1] = rtf;
                speed_power(num_speeds - 1, rtf)
            } else {
                // Cycle between the two speeds bracketing the request.
                let hi = cfg
                    .speeds
                    .iter()
                    .position(|s| flow_fraction <= s.flow_fraction)
                    .unwrap_or(num_speeds - 1)
                    .max(1);
                let lo = hi - 1;
                let span = cfg.speeds[hi].flow_fraction - cfg.speeds[lo].flow_fraction;
                let weight_lo = (cfg.speeds[hi].flow_fraction - flow_fraction) / span;
                state.runtime_fraction_at_speed[lo] = weight_lo;
                state.runtime_fraction_at_speed[hi] = 1.0 - weight_lo;
                speed_power(lo, weight_lo) + speed_power(hi, 1.0 - weight_lo)
            }
        }
        SpeedControl::Continuous => {
            state.runtime_fraction_at_speed[0] = 1.0;
            let frac_for_power = flow_fraction.max(cfg.min_power_flow_fraction);
            let power_fraction = power_curve
                .map(|c| c.value(frac_for_power))
                .unwrap_or(frac_for_power);
            let mut power =
                (power_fraction * max_flow * pressure / (total_efficiency * rho)).max(0.0);

            // Low-flow correction: when the implied temperature rise is
            // unphysical, rescale power linearly from zero flow up to the
            // curve value at the reference fraction.
            let (_, t_out) = outlet_state(power, flow, cfg, inlet);
            if t_out - inlet.t_c > LOW_FLOW_DELTA_T_LIMIT_C {
                let scale_input = if frac_for_power < LOW_FLOW_REFERENCE_FRACTION {
                    Some(frac_for_power)
                } else if flow_fraction < LOW_FLOW_REFERENCE_FRACTION {
                    Some(flow_fraction)
                } else {
                    None
                };
                if let Some(x) = scale_input {
                    let reference_fraction = power_curve
                        .map(|c| c.value(LOW_FLOW_REFERENCE_FRACTION))
                        .unwrap_or(LOW_FLOW_REFERENCE_FRACTION);
                    let power_at_reference =
                        reference_fraction * max_flow * pressure / (total_efficiency * rho);
                    power = (x * power_at_reference / LOW_FLOW_REFERENCE_FRACTION).max(0.0);
                }
            }
            power
        }
    };

    let (h_out, t_out) = outlet_state(power_w, flow, cfg, inlet);
    state.power_w = power_w;
    state.outlet_mass_flow_kg_s = flow;
    state.outlet_h_j_per_kg = h_out;
    state.outlet_t_c = t_out;
    state.mass_flow_max_avail_kg_s = max_avail;
    state.mass_flow_min_avail_kg_s = min_avail;
    state
}

/// Outlet enthalpy and dry-bulb for a given power at nonzero flow.
fn outlet_state(
    power_w: f64,
    flow_kg_s: f64,
    cfg: &FanConfiguration,
    inlet: &AirNode,
) -> (f64, f64) {
    let shaft_power = cfg.motor_efficiency * power_w;
    let power_to_air = shaft_power + (power_w - shaft_power) * cfg.motor_in_air_fraction;
    let h_out = inlet.h_j_per_kg + power_to_air / flow_kg_s;
    let t_out = temperature_from_enthalpy_humidity(h_out, inlet.hum_rat);
    (h_out, t_out)
}
