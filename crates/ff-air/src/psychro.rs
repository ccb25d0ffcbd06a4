//! Moist-air psychrometric relations.
//!
//! Linear-cp ideal-gas formulation:
//!
//! ```text
//! h(T, w)  = cp_da * T + w * (h_fg0 + cp_wv * T)
//! T(h, w)  = (h - h_fg0 * w) / (cp_da + cp_wv * w)
//! cp(w)    = cp_da + cp_wv * w
//! rho      = p / (R_da * T_abs * (1 + 1.6078 * w))
//! ```
//!
//! `T(h, w)` is the exact inverse of `h(T, w)`, so enthalpy-based energy
//! balances round-trip without drift.

use crate::error::{AirError, AirResult};
use ff_core::ensure_finite;

/// Specific enthalpy [J/kg].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEnthalpy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Specific heat of dry air [J/(kg·K)]
pub const CP_DRY_AIR: f64 = 1.004_84e3;
/// Specific heat of water vapor [J/(kg·K)]
pub const CP_WATER_VAPOR: f64 = 1.858_95e3;
/// Latent heat of vaporization of water at 0 °C [J/kg]
pub const H_FG_ZERO_C: f64 = 2.500_94e6;
/// Gas constant of dry air [J/(kg·K)]
pub const R_DRY_AIR: f64 = 287.0;
/// Absolute zero offset [K]
pub const T_0_ABS: f64 = 273.15;
/// Standard barometric pressure at sea level [Pa]
pub const STD_BARO_PRESSURE_PA: f64 = 101_325.0;

/// Specific enthalpy of moist air from dry-bulb temperature and humidity ratio.
pub fn enthalpy_from_temperature_humidity(t_c: f64, w: f64) -> SpecEnthalpy {
    let w = w.max(0.0);
    CP_DRY_AIR * t_c + w * (H_FG_ZERO_C + CP_WATER_VAPOR * t_c)
}

/// Dry-bulb temperature from specific enthalpy and humidity ratio.
///
/// Exact inverse of [`enthalpy_from_temperature_humidity`]. Total over finite
/// inputs: the humidity ratio is clamped non-negative, so the denominator
/// stays positive.
pub fn temperature_from_enthalpy_humidity(h: SpecEnthalpy, w: f64) -> f64 {
    let w = w.max(0.0);
    (h - H_FG_ZERO_C * w) / (CP_DRY_AIR + CP_WATER_VAPOR * w)
}

/// Specific heat of moist air at the given humidity ratio.
///
/// The dry-bulb argument is accepted for interface compatibility; the linear
/// formulation has no temperature dependence.
pub fn specific_heat(w: f64, _t_c: f64) -> SpecHeatCapacity {
    CP_DRY_AIR + CP_WATER_VAPOR * w.max(0.0)
}

/// Moist-air density from barometric pressure, dry-bulb, and humidity ratio.
///
/// # Errors
/// Non-positive pressure or absolute temperature is non-physical.
pub fn density_from_pressure_temperature_humidity(
    p_pa: f64,
    t_c: f64,
    w: f64,
) -> AirResult<f64> {
    ensure_finite(p_pa, "barometric pressure").map_err(|_| AirError::NonPhysical {
        what: "barometric pressure must be finite",
    })?;
    if p_pa <= 0.0 {
        return Err(AirError::NonPhysical {
            what: "barometric pressure must be positive",
        });
    }
    let t_abs = t_c + T_0_ABS;
    ensure_finite(t_abs, "absolute temperature").map_err(|_| AirError::NonPhysical {
        what: "absolute temperature must be finite",
    })?;
    if t_abs <= 0.0 {
        return Err(AirError::NonPhysical {
            what: "absolute temperature must be positive",
        });
    }
    Ok(p_pa / (R_DRY_AIR * t_abs * (1.0 + 1.607_8 * w.max(0.0))))
}

/// Standard air density: dry air at 20 °C and sea-level pressure.
pub fn standard_density() -> f64 {
    // Infallible for the fixed standard state
    STD_BARO_PRESSURE_PA / (R_DRY_AIR * (20.0 + T_0_ABS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enthalpy_temperature_round_trip() {
        for &(t, w) in &[(0.0, 0.0), (20.0, 0.008), (35.0, 0.015), (-10.0, 0.001)] {
            let h = enthalpy_from_temperature_humidity(t, w);
            let t_back = temperature_from_enthalpy_humidity(h, w);
            assert!(
                (t - t_back).abs() < 1e-9,
                "round trip failed at T={t}, w={w}: got {t_back}"
            );
        }
    }

    #[test]
    fn dry_air_enthalpy_is_sensible_only() {
        let h = enthalpy_from_temperature_humidity(20.0, 0.0);
        assert!((h - CP_DRY_AIR * 20.0).abs() < 1e-9);
    }

    #[test]
    fn specific_heat_increases_with_humidity() {
        assert!(specific_heat(0.01, 20.0) > specific_heat(0.0, 20.0));
        assert!((specific_heat(0.0, 20.0) - CP_DRY_AIR).abs() < 1e-12);
    }

    #[test]
    fn standard_density_near_1_2() {
        let rho = standard_density();
        assert!((rho - 1.204).abs() < 0.01, "rho = {rho}");
    }

    #[test]
    fn density_rejects_bad_inputs() {
        assert!(density_from_pressure_temperature_humidity(-1.0, 20.0, 0.0).is_err());
        assert!(density_from_pressure_temperature_humidity(101_325.0, -300.0, 0.0).is_err());
    }

    #[test]
    fn humid_air_less_dense_than_dry() {
        let dry = density_from_pressure_temperature_humidity(101_325.0, 20.0, 0.0).unwrap();
        let humid = density_from_pressure_temperature_humidity(101_325.0, 20.0, 0.01).unwrap();
        assert!(humid < dry);
    }

    proptest::proptest! {
        #[test]
        fn round_trip_over_hvac_range(t in -40.0..60.0f64, w in 0.0..0.03f64) {
            let h = enthalpy_from_temperature_humidity(t, w);
            let t_back = temperature_from_enthalpy_humidity(h, w);
            proptest::prop_assert!((t - t_back).abs() < 1e-8);
        }
    }
}
