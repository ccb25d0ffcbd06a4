//! Registry of fan instances, keyed by name.
//!
//! Name lookup distinguishes three outcomes: found, not found, and ambiguous
//! (the same name registered more than once). Callers must not conflate the
//! last two; duplicate configuration records are a user error that deserves
//! its own message.

use crate::fan::FanSystem;
use ff_core::FanId;

/// Result of a name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Found(FanId),
    NotFound,
    Ambiguous { count: usize },
}

/// Owner of all fan instances.
#[derive(Debug, Default)]
pub struct FanRegistry {
    fans: Vec<FanSystem>,
}

impl FanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fan and return its handle.
    ///
    /// Duplicate names are accepted here and surfaced as `Ambiguous` on
    /// lookup; registration order is the configuration record order.
    pub fn register(&mut self, fan: FanSystem) -> FanId {
        let id = FanId::from_index(self.fans.len() as u32);
        self.fans.push(fan);
        id
    }

    /// Look up a fan by name (case-insensitive).
    pub fn find(&self, name: &str) -> Lookup {
        let mut matched: Option<FanId> = None;
        let mut count = 0_usize;
        for (index, fan) in self.fans.iter().enumerate() {
            if fan.name().eq_ignore_ascii_case(name) {
                count += 1;
                if matched.is_none() {
                    matched = Some(FanId::from_index(index as u32));
                }
            }
        }
        match (matched, count) {
            (None, _) => Lookup::NotFound,
            (Some(id), 1) => Lookup::Found(id),
            (Some(_), count) => Lookup::Ambiguous { count },
        }
    }

    pub fn fan(&self, id: FanId) -> Option<&FanSystem> {
        self.fans.get(id.index() as usize)
    }

    pub fn fan_mut(&mut self, id: FanId) -> Option<&mut FanSystem> {
        self.fans.get_mut(id.index() as usize)
    }

    pub fn len(&self) -> usize {
        self.fans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FanSystem> {
        self.fans.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolveContext;
    use crate::schema::{Autosizable, FanDef};
    use ff_controls::ScheduleRegistry;
    use ff_curves::CurveRegistry;
    use ff_network::NodeStore;

    fn make_fan(name: &str) -> FanSystem {
        let def = FanDef {
            name: name.to_string(),
            availability_schedule: None,
            inlet_node: format!("{name} in"),
            outlet_node: format!("{name} out"),
            design_flow_m3_s: Autosizable::Value(1.0),
            speed_control: None,
            min_power_flow_fraction: 0.0,
            pressure_rise_pa: 500.0,
            motor_efficiency: 0.9,
            motor_in_air_fraction: 1.0,
            design_power_w: Autosizable::Value(800.0),
            power_sizing_method: None,
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
        };
        let schedules = ScheduleRegistry::new();
        let curves = CurveRegistry::new();
        let zones: Vec<String> = Vec::new();
        let mut nodes = NodeStore::new();
        let mut ctx = ResolveContext {
            schedules: &schedules,
            curves: &curves,
            zones: &zones,
            nodes: &mut nodes,
        };
        FanSystem::from_def(&def, &mut ctx).unwrap()
    }

    #[test]
    fn found_not_found_and_ambiguous_are_distinct() {
        let mut registry = FanRegistry::new();
        let id = registry.register(make_fan("supply fan"));
        registry.register(make_fan("return fan"));
        registry.register(make_fan("Supply Fan"));

        assert_eq!(registry.find("return fan"), Lookup::Found(FanId::from_index(1)));
        assert_eq!(registry.find("exhaust fan"), Lookup::NotFound);
        // duplicate name (case-insensitive) must not silently resolve
        assert_eq!(registry.find("supply fan"), Lookup::Ambiguous { count: 2 });
        assert!(registry.fan(id).is_some());
    }

    #[test]
    fn handles_round_trip() {
        let mut registry = FanRegistry::new();
        let id = registry.register(make_fan("supply fan"));
        assert_eq!(registry.fan(id).unwrap().name(), "supply fan");
        assert_eq!(registry.len(), 1);
    }
}
