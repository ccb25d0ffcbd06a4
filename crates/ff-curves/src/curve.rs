//! Single-variable performance curves.

use crate::error::{CurveError, CurveResult};
use serde::{Deserialize, Serialize};

/// Functional form of a single-variable curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveKind {
    /// c0 + c1*x
    Linear { c0: f64, c1: f64 },
    /// c0 + c1*x + c2*x²
    Quadratic { c0: f64, c1: f64, c2: f64 },
    /// c0 + c1*x + c2*x² + c3*x³
    Cubic { c0: f64, c1: f64, c2: f64, c3: f64 },
    /// c0 + c1*x^c2
    Exponent { c0: f64, c1: f64, c2: f64 },
}

/// A named curve with a declared input range.
///
/// Evaluation clamps the input to `[x_min, x_max]` rather than extrapolating;
/// fitted performance data is only trusted inside its fit range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub name: String,
    pub kind: CurveKind,
    pub x_min: f64,
    pub x_max: f64,
}

impl Curve {
    /// Create a curve, validating coefficients and range.
    pub fn new(name: impl Into<String>, kind: CurveKind, x_min: f64, x_max: f64) -> CurveResult<Self> {
        if !x_min.is_finite() || !x_max.is_finite() || x_min >= x_max {
            return Err(CurveError::InvalidDefinition {
                what: "curve input range must be finite with x_min < x_max",
            });
        }
        let coeffs_finite = match kind {
            CurveKind::Linear { c0, c1 } => c0.is_finite() && c1.is_finite(),
            CurveKind::Quadratic { c0, c1, c2 } => {
                c0.is_finite() && c1.is_finite() && c2.is_finite()
            }
            CurveKind::Cubic { c0, c1, c2, c3 } => {
                c0.is_finite() && c1.is_finite() && c2.is_finite() && c3.is_finite()
            }
            CurveKind::Exponent { c0, c1, c2 } => {
                c0.is_finite() && c1.is_finite() && c2.is_finite()
            }
        };
        if !coeffs_finite {
            return Err(CurveError::InvalidDefinition {
                what: "curve coefficients must be finite",
            });
        }
        Ok(Self {
            name: name.into(),
            kind,
            x_min,
            x_max,
        })
    }

    /// Evaluate the curve at `x`, clamping into the declared range.
    pub fn value(&self, x: f64) -> f64 {
        let x = x.clamp(self.x_min, self.x_max);
        match self.kind {
            CurveKind::Linear { c0, c1 } => c0 + c1 * x,
            CurveKind::Quadratic { c0, c1, c2 } => c0 + x * (c1 + x * c2),
            CurveKind::Cubic { c0, c1, c2, c3 } => c0 + x * (c1 + x * (c2 + x * c3)),
            CurveKind::Exponent { c0, c1, c2 } => c0 + c1 * x.powf(c2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_fan_law() {
        // Ideal fan power modifier: power fraction = flow fraction cubed
        let curve = Curve::new(
            "fan power cubic",
            CurveKind::Cubic {
                c0: 0.0,
                c1: 0.0,
                c2: 0.0,
                c3: 1.0,
            },
            0.0,
            1.0,
        )
        .unwrap();
        assert!((curve.value(0.5) - 0.125).abs() < 1e-12);
        assert!((curve.value(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn evaluation_clamps_to_range() {
        let curve = Curve::new("linear", CurveKind::Linear { c0: 0.0, c1: 1.0 }, 0.1, 1.0).unwrap();
        assert!((curve.value(0.0) - 0.1).abs() < 1e-12);
        assert!((curve.value(2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_inverted_range() {
        let res = Curve::new("bad", CurveKind::Linear { c0: 0.0, c1: 1.0 }, 1.0, 0.0);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_non_finite_coefficient() {
        let res = Curve::new(
            "bad",
            CurveKind::Quadratic {
                c0: f64::NAN,
                c1: 0.0,
                c2: 1.0,
            },
            0.0,
            1.0,
        );
        assert!(res.is_err());
    }
}
