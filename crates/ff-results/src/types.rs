//! Report record data types.

use serde::{Deserialize, Serialize};

/// Value carried by a report record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportValue {
    Number(f64),
    Text(String),
}

impl From<f64> for ReportValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ReportValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ReportValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl ReportValue {
    /// Numeric payload, if this record carries one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

/// One emitted record: which component, which field, what value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub component: String,
    pub field: String,
    pub value: ReportValue,
}

impl ReportRecord {
    pub fn new(component: &str, field: &str, value: impl Into<ReportValue>) -> Self {
        Self {
            component: component.to_string(),
            field: field.to_string(),
            value: value.into(),
        }
    }
}
