//! Availability schedules.
//!
//! The fan only needs the current scalar value of its availability schedule;
//! how values vary over the calendar is the scheduling system's concern. The
//! registry resolves names to handles at construction time and serves values
//! by handle at runtime.

use crate::error::{ControlError, ControlResult};
use ff_core::ScheduleId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Schedule {
    name: String,
    value: f64,
}

/// Registry of named schedules.
///
/// Index 0 is reserved for the built-in always-on schedule, so a default
/// handle is available without any registration.
#[derive(Debug)]
pub struct ScheduleRegistry {
    schedules: Vec<Schedule>,
    by_name: HashMap<String, ScheduleId>,
}

impl ScheduleRegistry {
    /// Handle of the built-in always-on schedule.
    pub const ALWAYS_ON: ScheduleId = ScheduleId::from_index(0);

    pub fn new() -> Self {
        Self {
            schedules: vec![Schedule {
                name: "always on".to_string(),
                value: 1.0,
            }],
            by_name: HashMap::new(),
        }
    }

    /// Register a constant-valued schedule.
    pub fn register_constant(&mut self, name: &str, value: f64) -> ControlResult<ScheduleId> {
        if self.by_name.contains_key(name) {
            return Err(ControlError::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = ScheduleId::from_index(self.schedules.len() as u32);
        self.schedules.push(Schedule {
            name: name.to_string(),
            value,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    /// Resolve a schedule name to its handle.
    pub fn find(&self, name: &str) -> ControlResult<ScheduleId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ControlError::UnknownSchedule {
                name: name.to_string(),
            })
    }

    /// Current value of a schedule.
    pub fn value(&self, id: ScheduleId) -> ControlResult<f64> {
        let index = id.index() as usize;
        self.schedules
            .get(index)
            .map(|s| s.value)
            .ok_or(ControlError::UnknownId {
                index,
                len: self.schedules.len(),
            })
    }

    /// Overwrite a schedule's current value (external scheduler hook).
    pub fn set_value(&mut self, id: ScheduleId, value: f64) -> ControlResult<()> {
        let index = id.index() as usize;
        let len = self.schedules.len();
        let sched = self
            .schedules
            .get_mut(index)
            .ok_or(ControlError::UnknownId { index, len })?;
        sched.value = value;
        Ok(())
    }

    /// Schedule name for reporting.
    pub fn name(&self, id: ScheduleId) -> ControlResult<&str> {
        let index = id.index() as usize;
        self.schedules
            .get(index)
            .map(|s| s.name.as_str())
            .ok_or(ControlError::UnknownId {
                index,
                len: self.schedules.len(),
            })
    }
}

impl Default for ScheduleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_on_is_prewired() {
        let reg = ScheduleRegistry::new();
        assert_eq!(reg.value(ScheduleRegistry::ALWAYS_ON).unwrap(), 1.0);
    }

    #[test]
    fn register_and_toggle() {
        let mut reg = ScheduleRegistry::new();
        let id = reg.register_constant("fan avail", 1.0).unwrap();
        assert_eq!(reg.find("fan avail").unwrap(), id);
        reg.set_value(id, 0.0).unwrap();
        assert_eq!(reg.value(id).unwrap(), 0.0);
    }

    #[test]
    fn unknown_name_errors() {
        let reg = ScheduleRegistry::new();
        assert!(matches!(
            reg.find("nope"),
            Err(ControlError::UnknownSchedule { .. })
        ));
    }
}
