//! Name-keyed curve registry handing out compact handles.

use crate::curve::Curve;
use crate::error::{CurveError, CurveResult};
use ff_core::CurveId;
use std::collections::HashMap;

/// Registry owning curve definitions, keyed by name.
#[derive(Debug, Default)]
pub struct CurveRegistry {
    curves: Vec<Curve>,
    by_name: HashMap<String, CurveId>,
}

impl CurveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a curve under its own name.
    ///
    /// # Errors
    /// Duplicate names are rejected; references must stay unambiguous.
    pub fn register(&mut self, curve: Curve) -> CurveResult<CurveId> {
        if self.by_name.contains_key(&curve.name) {
            return Err(CurveError::DuplicateName {
                name: curve.name.clone(),
            });
        }
        let id = CurveId::from_index(self.curves.len() as u32);
        self.by_name.insert(curve.name.clone(), id);
        self.curves.push(curve);
        Ok(id)
    }

    /// Resolve a curve name to its handle.
    pub fn find(&self, name: &str) -> CurveResult<CurveId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| CurveError::UnknownCurve {
                name: name.to_string(),
            })
    }

    /// Borrow a curve by handle.
    pub fn curve(&self, id: CurveId) -> CurveResult<&Curve> {
        let index = id.index() as usize;
        self.curves.get(index).ok_or(CurveError::UnknownId {
            index,
            len: self.curves.len(),
        })
    }

    /// Evaluate a curve by handle.
    pub fn evaluate(&self, id: CurveId, x: f64) -> CurveResult<f64> {
        Ok(self.curve(id)?.value(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveKind;

    fn quad() -> Curve {
        Curve::new(
            "vav power",
            CurveKind::Quadratic {
                c0: 0.0,
                c1: 0.5,
                c2: 0.5,
            },
            0.0,
            1.0,
        )
        .unwrap()
    }

    #[test]
    fn register_and_evaluate() {
        let mut reg = CurveRegistry::new();
        let id = reg.register(quad()).unwrap();
        assert_eq!(reg.find("vav power").unwrap(), id);
        let y = reg.evaluate(id, 1.0).unwrap();
        assert!((y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut reg = CurveRegistry::new();
        reg.register(quad()).unwrap();
        assert!(matches!(
            reg.register(quad()),
            Err(CurveError::DuplicateName { .. })
        ));
    }

    #[test]
    fn unknown_name_is_distinct_error() {
        let reg = CurveRegistry::new();
        assert!(matches!(
            reg.find("missing"),
            Err(CurveError::UnknownCurve { .. })
        ));
    }
}
