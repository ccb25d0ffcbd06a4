//! External override ports.
//!
//! Each port is a (active, value) pair an external controller may write
//! between timesteps. The fan snapshots all of its ports once at the start of
//! a calculate call and works from the snapshot; registration mechanics live
//! entirely on the controller side.

use serde::{Deserialize, Serialize};

/// One externally writable override port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverridePort {
    active: bool,
    value: f64,
}

impl OverridePort {
    /// Activate the port with the given value.
    pub fn set(&mut self, value: f64) {
        self.active = true;
        self.value = value;
    }

    /// Deactivate the port; the model falls back to its own value.
    pub fn clear(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Read side of the contract: `Some(value)` only while active.
    pub fn get(&self) -> Option<f64> {
        self.active.then_some(self.value)
    }
}

/// The fan's override ports, one per overridable quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FanOverrides {
    /// Pressure rise across the fan [Pa]
    pub pressure_rise_pa: OverridePort,
    /// Fan total efficiency (0..1]
    pub total_efficiency: OverridePort,
    /// Air mass flow rate [kg/s]
    pub mass_flow_kg_s: OverridePort,
    /// Autosized design volume flow rate [m³/s]
    pub design_flow_m3_s: OverridePort,
}

impl FanOverrides {
    /// Snapshot all ports for one calculate call.
    pub fn snapshot(&self) -> OverrideSnapshot {
        OverrideSnapshot {
            pressure_rise_pa: self.pressure_rise_pa.get(),
            total_efficiency: self.total_efficiency.get(),
            mass_flow_kg_s: self.mass_flow_kg_s.get(),
            design_flow_m3_s: self.design_flow_m3_s.get(),
        }
    }
}

/// Read-only view of the override ports, taken once per timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverrideSnapshot {
    pub pressure_rise_pa: Option<f64>,
    pub total_efficiency: Option<f64>,
    pub mass_flow_kg_s: Option<f64>,
    pub design_flow_m3_s: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_inactive_by_default() {
        let port = OverridePort::default();
        assert!(!port.is_active());
        assert_eq!(port.get(), None);
    }

    #[test]
    fn set_then_clear() {
        let mut port = OverridePort::default();
        port.set(425.0);
        assert_eq!(port.get(), Some(425.0));
        port.clear();
        assert_eq!(port.get(), None);
    }

    #[test]
    fn snapshot_reflects_active_ports_only() {
        let mut ovr = FanOverrides::default();
        ovr.mass_flow_kg_s.set(0.8);
        let snap = ovr.snapshot();
        assert_eq!(snap.mass_flow_kg_s, Some(0.8));
        assert_eq!(snap.pressure_rise_pa, None);
        assert_eq!(snap.total_efficiency, None);
        assert_eq!(snap.design_flow_m3_s, None);
    }
}
