//! Report sink API and reference implementations.

use crate::types::{ReportRecord, ReportValue};
use crate::ResultsResult;

/// Write-only destination for report records.
///
/// Emitters never learn whether anything listens; a sink must accept every
/// record without failing.
pub trait ReportSink {
    /// One-time design-value entry (tabular summary output).
    fn record_design(&mut self, component: &str, field: &str, value: ReportValue);

    /// Per-timestep report tap (timeseries output).
    fn record_tap(&mut self, component: &str, field: &str, value: f64);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ReportSink for NullSink {
    fn record_design(&mut self, _component: &str, _field: &str, _value: ReportValue) {}
    fn record_tap(&mut self, _component: &str, _field: &str, _value: f64) {}
}

/// Sink that collects records in memory, mainly for tests and exports.
///
/// Taps keep only the latest value per (component, field) pair: one record
/// per tap per timestep, overwritten on the next step.
#[derive(Debug, Default)]
pub struct MemorySink {
    design: Vec<ReportRecord>,
    taps: Vec<ReportRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn design_entries(&self) -> &[ReportRecord] {
        &self.design
    }

    pub fn taps(&self) -> &[ReportRecord] {
        &self.taps
    }

    /// Latest design entry for a (component, field) pair.
    pub fn design_value(&self, component: &str, field: &str) -> Option<&ReportValue> {
        self.design
            .iter()
            .rev()
            .find(|r| r.component == component && r.field == field)
            .map(|r| &r.value)
    }

    /// Current tap value for a (component, field) pair.
    pub fn tap_value(&self, component: &str, field: &str) -> Option<f64> {
        self.taps
            .iter()
            .find(|r| r.component == component && r.field == field)
            .and_then(|r| r.value.as_number())
    }

    /// Export all collected records as pretty JSON.
    pub fn to_json(&self) -> ResultsResult<String> {
        #[derive(serde::Serialize)]
        struct Export<'a> {
            design: &'a [ReportRecord],
            taps: &'a [ReportRecord],
        }
        Ok(serde_json::to_string_pretty(&Export {
            design: &self.design,
            taps: &self.taps,
        })?)
    }
}

impl ReportSink for MemorySink {
    fn record_design(&mut self, component: &str, field: &str, value: ReportValue) {
        self.design.push(ReportRecord::new(component, field, value));
    }

    fn record_tap(&mut self, component: &str, field: &str, value: f64) {
        if let Some(existing) = self
            .taps
            .iter_mut()
            .find(|r| r.component == component && r.field == field)
        {
            existing.value = ReportValue::Number(value);
        } else {
            self.taps.push(ReportRecord::new(component, field, value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_collects_design_entries() {
        let mut sink = MemorySink::new();
        sink.record_design("supply fan", "Design Electric Power Consumption [W]", 500.0.into());
        sink.record_design("supply fan", "End Use Subcategory", "General".into());
        assert_eq!(sink.design_entries().len(), 2);
        assert_eq!(
            sink.design_value("supply fan", "Design Electric Power Consumption [W]")
                .and_then(ReportValue::as_number),
            Some(500.0)
        );
    }

    #[test]
    fn taps_keep_latest_value() {
        let mut sink = MemorySink::new();
        sink.record_tap("supply fan", "Fan Electric Power [W]", 100.0);
        sink.record_tap("supply fan", "Fan Electric Power [W]", 250.0);
        assert_eq!(sink.taps().len(), 1);
        assert_eq!(sink.tap_value("supply fan", "Fan Electric Power [W]"), Some(250.0));
    }

    #[test]
    fn json_export_round_trips() {
        let mut sink = MemorySink::new();
        sink.record_design("fan", "Fan Total Efficiency", 0.6.into());
        let json = sink.to_json().unwrap();
        assert!(json.contains("Fan Total Efficiency"));
    }

    #[test]
    fn null_sink_accepts_everything() {
        let mut sink = NullSink;
        sink.record_design("fan", "field", 1.0.into());
        sink.record_tap("fan", "field", 1.0);
    }
}
