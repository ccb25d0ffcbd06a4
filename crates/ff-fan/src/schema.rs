//! Raw fan definition record.
//!
//! This is the shape the external configuration parser hands over: named
//! fields with blanks still visible. Nothing here is validated; that is
//! [`crate::config::FanConfiguration::from_def`]'s job.

use serde::{Deserialize, Serialize};

/// A numeric design input that may be marked for automatic sizing.
///
/// Tagged explicitly so autosize checks are a match, never a magic-number
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Autosizable {
    Autosize,
    Value(f64),
}

impl Autosizable {
    pub fn is_autosized(&self) -> bool {
        matches!(self, Self::Autosize)
    }

    /// The literal value, if one was given.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Autosize => None,
            Self::Value(v) => Some(*v),
        }
    }
}

/// Raw named-field record for one fan.
///
/// Optional fields model blanks in the source record; trailing per-speed
/// numerics arrive as an ordered list with blanks preserved, exactly as the
/// record parser saw them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanDef {
    pub name: String,
    #[serde(default)]
    pub availability_schedule: Option<String>,
    pub inlet_node: String,
    pub outlet_node: String,
    /// Design (maximum) volume flow rate [m³/s]
    pub design_flow_m3_s: Autosizable,
    /// Speed control token: "Discrete" or "Continuous"; blank means discrete
    #[serde(default)]
    pub speed_control: Option<String>,
    /// Minimum flow fraction for the power calculation (continuous control)
    #[serde(default)]
    pub min_power_flow_fraction: f64,
    /// Design pressure rise [Pa]
    pub pressure_rise_pa: f64,
    #[serde(default = "default_motor_efficiency")]
    pub motor_efficiency: f64,
    /// Fraction of motor heat loss entering the airstream
    #[serde(default = "default_motor_in_air_fraction")]
    pub motor_in_air_fraction: f64,
    /// Design electric power consumption [W]
    pub design_power_w: Autosizable,
    /// Power sizing method token; only consulted when design power is autosized
    #[serde(default)]
    pub power_sizing_method: Option<String>,
    /// Scaling factor for the power-per-flow method [W/(m³/s)]
    #[serde(default)]
    pub power_per_flow: f64,
    /// Scaling factor for the power-per-flow-per-pressure method [W/(m³/s·Pa)]
    #[serde(default)]
    pub power_per_flow_per_pressure: f64,
    /// Fan total efficiency (fan, belt, motor, and drive combined)
    #[serde(default = "default_total_efficiency")]
    pub total_efficiency: f64,
    /// Power-modifier curve reference (power fraction vs flow fraction)
    #[serde(default)]
    pub power_curve: Option<String>,
    /// Alternate pressure rise during night ventilation [Pa]
    #[serde(default)]
    pub night_vent_pressure_rise_pa: f64,
    /// Alternate flow fraction during night ventilation
    #[serde(default)]
    pub night_vent_flow_fraction: f64,
    /// Zone receiving motor heat losses; blank loses them to outside
    #[serde(default)]
    pub motor_loss_zone: Option<String>,
    /// Radiative split of motor losses delivered to the zone
    #[serde(default)]
    pub motor_loss_radiant_fraction: f64,
    #[serde(default)]
    pub end_use_subcategory: Option<String>,
    /// Number of discrete speed levels
    #[serde(default)]
    pub number_of_speeds: Option<u32>,
    /// Trailing per-speed numerics: (flow fraction, power fraction) pairs in
    /// speed order, blanks preserved as `None`
    #[serde(default)]
    pub speed_fields: Vec<Option<f64>>,
}

fn default_motor_efficiency() -> f64 {
    0.9
}

fn default_motor_in_air_fraction() -> f64 {
    1.0
}

fn default_total_efficiency() -> f64 {
    0.7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autosizable_accessors() {
        assert!(Autosizable::Autosize.is_autosized());
        assert_eq!(Autosizable::Autosize.value(), None);
        assert_eq!(Autosizable::Value(1.5).value(), Some(1.5));
    }

    #[test]
    fn def_deserializes_with_defaults() {
        let json = r#"{
            "name": "supply fan",
            "inlet_node": "mixed air",
            "outlet_node": "supply duct",
            "design_flow_m3_s": { "value": 1.0 },
            "pressure_rise_pa": 500.0,
            "design_power_w": "autosize"
        }"#;
        let def: FanDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.motor_efficiency, 0.9);
        assert_eq!(def.motor_in_air_fraction, 1.0);
        assert_eq!(def.total_efficiency, 0.7);
        assert!(def.design_power_w.is_autosized());
        assert!(def.speed_fields.is_empty());
    }
}
