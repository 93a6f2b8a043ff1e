//! Seawater Equilibrium Constants
//!
//! Temperature and salinity dependent dissociation constants of the carbonate,
//! borate and water systems, together with the conservative ion totals that
//! scale with salinity.
//!
//! All constants are given on the total pH scale and in mol/kg-seawater.
//!
//! # References
//!
//! - **K1, K2**: Mehrbach et al. (1973), refit by Dickson & Millero (1987) and
//!   put on the total scale by Lueker et al. (2000)
//! - **Kw**: DOE (1994)
//! - **Kb**: Dickson (1990) as reported by Millero (1995); Roy et al. (1993)
//!   agrees
//! - **Sulfate**: DOE (1994) and Dickson & Millero's refit of Mehrbach
//!
//! The fits are calibrated for roughly -2 to 40 C and 0 to 42 PSU. Inputs
//! outside that range are not rejected; NaN or overflow propagates.

use serde::{Deserialize, Serialize};

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Salinity the conservative ratios are referenced to (PSU).
pub const REFERENCE_SALINITY: f64 = 35.0;

/// Total boron at the reference salinity (mol/kg).
pub const BORON_AT_REFERENCE: f64 = 0.000416;

/// Total fluoride at the reference salinity (mol/kg).
pub const FLUORIDE_AT_REFERENCE: f64 = 7e-5;

/// Total sulfate at the reference salinity (mol/kg), DOE (1994).
pub const SULFATE_AT_REFERENCE: f64 = 0.02824;

/// Total calcium at the reference salinity (mol/kg).
pub const CALCIUM_AT_REFERENCE: f64 = 0.01028;

/// Dissociation constants and conservative totals for one (T, S) pair.
///
/// Built once by [`EquilibriumConstants::new`] and never mutated afterwards.
/// Nothing here depends on DIC or alkalinity, so a single instance can be
/// shared by every sample of a sweep at fixed temperature and salinity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumConstants {
    /// First carbonic acid dissociation constant.
    pub k1: f64,
    /// Second carbonic acid dissociation constant.
    pub k2: f64,
    /// Ion product of water.
    pub kw: f64,
    /// Boric acid dissociation constant.
    pub kb: f64,
    /// Total boron (mol/kg).
    pub boron_total: f64,
    /// Total fluoride (mol/kg).
    pub fluoride_total: f64,
    /// Total sulfate (mol/kg).
    pub sulfate_total: f64,
    /// Total calcium (mol/kg).
    pub calcium_total: f64,
}

impl EquilibriumConstants {
    /// Evaluate all constants for a temperature (C) and salinity (PSU).
    pub fn new(temperature: f64, salinity: f64) -> Self {
        let tk = temperature + KELVIN_OFFSET;
        let ln_tk = tk.ln();
        let sqrt_s = salinity.sqrt();
        let s2 = salinity.powi(2);

        let salinity_ratio = salinity / REFERENCE_SALINITY;

        Self {
            k1: 10f64.powf(-pk1(tk, ln_tk, salinity, s2)),
            k2: 10f64.powf(-pk2(tk, ln_tk, salinity, s2)),
            kw: kw(tk, ln_tk, salinity, sqrt_s),
            kb: kb(tk, ln_tk, salinity, sqrt_s, s2),
            boron_total: BORON_AT_REFERENCE * salinity_ratio,
            fluoride_total: FLUORIDE_AT_REFERENCE * salinity_ratio,
            sulfate_total: SULFATE_AT_REFERENCE * salinity_ratio,
            calcium_total: CALCIUM_AT_REFERENCE * salinity_ratio,
        }
    }

    pub fn pk1(&self) -> f64 {
        -self.k1.log10()
    }

    pub fn pk2(&self) -> f64 {
        -self.k2.log10()
    }

    pub fn pkw(&self) -> f64 {
        -self.kw.log10()
    }

    pub fn pkb(&self) -> f64 {
        -self.kb.log10()
    }

    /// Fractions of DIC present as CO2*, bicarbonate and carbonate.
    ///
    /// $$\alpha_0 = \frac{x^2}{D},\quad \alpha_1 = \frac{K_1 x}{D},\quad
    ///   \alpha_2 = \frac{K_1 K_2}{D},\quad D = x^2 + K_1 x + K_1 K_2$$
    ///
    /// where $x$ is the hydrogen-ion activity.
    pub fn speciation(&self, activity: f64) -> Speciation {
        let denom = activity.powi(2) + self.k1 * activity + self.k1 * self.k2;
        Speciation {
            alpha0: activity.powi(2) / denom,
            alpha1: self.k1 * activity / denom,
            alpha2: self.k1 * self.k2 / denom,
        }
    }
}

/// DIC speciation fractions at a given hydrogen-ion activity. They sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Speciation {
    pub alpha0: f64,
    pub alpha1: f64,
    pub alpha2: f64,
}

/// Lueker et al. (2000) pK1.
fn pk1(tk: f64, ln_tk: f64, salinity: f64, s2: f64) -> f64 {
    let salinity_term = -0.011555 * salinity + 0.0001152 * s2;
    -61.2172 + salinity_term + 3633.86 / tk + 9.6777 * ln_tk
}

/// Lueker et al. (2000) pK2.
fn pk2(tk: f64, ln_tk: f64, salinity: f64, s2: f64) -> f64 {
    let salinity_term = -0.01781 * salinity + 0.0001122 * s2;
    471.78 / tk + 25.9290 + salinity_term - 3.16967 * ln_tk
}

/// DOE (1994) Kw.
fn kw(tk: f64, ln_tk: f64, salinity: f64, sqrt_s: f64) -> f64 {
    let temperature_term = 148.96502 - 13847.26 / tk - 23.6521 * ln_tk;
    let salinity_term = (118.67 / tk - 5.977 + 1.0495 * ln_tk) * sqrt_s - 0.01615 * salinity;
    (temperature_term + salinity_term).exp()
}

/// Dickson (1990) Kb, synthetic seawater without fluoride.
fn kb(tk: f64, ln_tk: f64, salinity: f64, sqrt_s: f64, s2: f64) -> f64 {
    let t1 = (-8966.90 - 2890.53 * sqrt_s - 77.942 * salinity + 1.728 * salinity.powf(1.5)
        - 0.0996 * s2)
        / tk;
    let t2 = 148.0248 + 137.1942 * sqrt_s + 1.62142 * salinity;
    let t3 = -ln_tk * (24.4344 + 25.085 * sqrt_s + 0.2474 * salinity) + 0.053105 * sqrt_s * tk;
    (t1 + t2 + t3).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_values_at_25c_35psu() {
        let c = EquilibriumConstants::new(25.0, 35.0);

        assert_relative_eq!(c.k1, 1.4218281371391825e-06, max_relative = 1e-12);
        assert_relative_eq!(c.k2, 1.081554747220938e-09, max_relative = 1e-12);
        assert_relative_eq!(c.kw, 6.062772288870573e-14, max_relative = 1e-12);
        assert_relative_eq!(c.kb, 2.526572990247911e-09, max_relative = 1e-12);
        assert_relative_eq!(c.boron_total, 0.000416, max_relative = 1e-15);
    }

    #[test]
    fn test_pk_values_in_textbook_range() {
        let c = EquilibriumConstants::new(25.0, 35.0);
        assert!((c.pk1() - 5.847).abs() < 0.01, "pK1 = {}", c.pk1());
        assert!((c.pk2() - 8.966).abs() < 0.01, "pK2 = {}", c.pk2());
        assert!((c.pkw() - 13.217).abs() < 0.01, "pKw = {}", c.pkw());
        assert!((c.pkb() - 8.597).abs() < 0.01, "pKb = {}", c.pkb());
    }

    #[test]
    fn test_conservative_totals_scale_with_salinity() {
        let half = EquilibriumConstants::new(15.0, 17.5);
        let full = EquilibriumConstants::new(15.0, 35.0);

        assert_relative_eq!(full.boron_total, 2.0 * half.boron_total);
        assert_relative_eq!(full.fluoride_total, FLUORIDE_AT_REFERENCE);
        assert_relative_eq!(full.sulfate_total, SULFATE_AT_REFERENCE);
        assert_relative_eq!(full.calcium_total, CALCIUM_AT_REFERENCE);
    }

    #[test]
    fn test_fresh_water_has_no_boron() {
        let c = EquilibriumConstants::new(10.0, 0.0);
        assert_eq!(c.boron_total, 0.0);
        assert!(c.k1.is_finite() && c.k2.is_finite());
    }

    #[test]
    fn test_warming_increases_dissociation() {
        let cold = EquilibriumConstants::new(0.0, 35.0);
        let warm = EquilibriumConstants::new(30.0, 35.0);

        assert!(warm.k1 > cold.k1);
        assert!(warm.k2 > cold.k2);
        assert!(warm.kw > cold.kw);
        assert!(warm.kb > cold.kb);
    }

    #[test]
    fn test_speciation_sums_to_one() {
        let c = EquilibriumConstants::new(25.0, 35.0);
        for ph in [6.0, 7.5, 8.1, 9.0] {
            let s = c.speciation(10f64.powf(-ph));
            assert_relative_eq!(s.alpha0 + s.alpha1 + s.alpha2, 1.0, epsilon = 1e-12);
        }

        // Bicarbonate dominates at seawater pH
        let s = c.speciation(10f64.powf(-8.0));
        assert!(s.alpha1 > s.alpha2 && s.alpha2 > s.alpha0);
    }

    #[test]
    fn test_out_of_range_propagates_nan() {
        let c = EquilibriumConstants::new(25.0, -1.0);
        assert!(c.kw.is_nan());
    }
}
