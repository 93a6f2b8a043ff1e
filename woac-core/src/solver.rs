//! pH Solver
//!
//! Converts a water parcel's (temperature, salinity, DIC, alkalinity) into pH on
//! the total scale by solving the alkalinity charge balance for the
//! hydrogen-ion activity $x$:
//!
//! $$r(x) = (\alpha_1 + 2\alpha_2)\,DIC + \frac{K_w}{x} + \frac{B_T}{1 + x/K_b} - A_T - x = 0$$
//!
//! The residual falls monotonically in $x$ over the search bracket, so the
//! root is unique and bisection finds it deterministically.
//!
//! # Units
//!
//! DIC and alkalinity are in mol/kg here. Callers holding µmol/kg values go
//! through [`WaterParcel::from_micromol`] which applies the 1e6 conversion.

use crate::equilibrium::EquilibriumConstants;
use crate::errors::{WoacError, WoacResult};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Micromoles per mole, used to move DIC and alkalinity into solver units.
pub const MICROMOL_PER_MOL: f64 = 1e6;

/// Bisection settings for the charge-balance root.
///
/// Iteration stops at the first midpoint where any of these hold:
/// - the residual is exactly zero or below `residual_tolerance`
/// - the bracket half-width is below `activity_tolerance + relative_tolerance * |x|`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolverConfig {
    /// Lower end of the hydrogen-ion activity bracket.
    /// default: 1e-16 (pH 16)
    pub lower_bound: f64,

    /// Upper end of the hydrogen-ion activity bracket.
    /// default: 1.0 (pH 0)
    pub upper_bound: f64,

    /// Absolute tolerance on the activity interval width.
    /// default: 1e-18
    pub activity_tolerance: f64,

    /// Relative tolerance on the activity interval width.
    /// default: 4 * f64::EPSILON
    pub relative_tolerance: f64,

    /// Residual magnitude (mol/kg) accepted as converged.
    /// default: 1e-12
    pub residual_tolerance: f64,

    /// Maximum number of bisection steps.
    /// default: 100
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            lower_bound: 1e-16,
            upper_bound: 1.0,
            activity_tolerance: 1e-18,
            relative_tolerance: 4.0 * f64::EPSILON,
            residual_tolerance: 1e-12,
            max_iterations: 100,
        }
    }
}

/// Carbonate state of a water parcel in solver units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterParcel {
    /// Temperature (C)
    pub temperature: f64,
    /// Salinity (PSU)
    pub salinity: f64,
    /// Dissolved inorganic carbon (mol/kg)
    pub dic: f64,
    /// Total alkalinity (mol/kg)
    pub alkalinity: f64,
}

impl WaterParcel {
    /// Build a parcel from DIC and alkalinity given in µmol/kg.
    pub fn from_micromol(temperature: f64, salinity: f64, dic: f64, alkalinity: f64) -> Self {
        Self {
            temperature,
            salinity,
            dic: dic / MICROMOL_PER_MOL,
            alkalinity: alkalinity / MICROMOL_PER_MOL,
        }
    }
}

/// Converged root of the charge balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhSolution {
    /// Hydrogen-ion activity at the root.
    pub activity: f64,
    /// Total-scale pH, `-log10(activity)`.
    pub ph: f64,
    /// Residual (mol/kg) at the returned activity.
    pub residual: f64,
    /// Number of bisection steps taken.
    pub iterations: usize,
}

/// Charge-balance residual for a parcel at hydrogen-ion activity `activity`.
///
/// `dic` and `alkalinity` are in mol/kg.
pub fn residual(
    constants: &EquilibriumConstants,
    dic: f64,
    alkalinity: f64,
    activity: f64,
) -> f64 {
    let speciation = constants.speciation(activity);
    (speciation.alpha1 * dic) + (2.0 * speciation.alpha2 * dic)
        + (constants.kw / activity)
        + (constants.boron_total / (1.0 + activity / constants.kb))
        - alkalinity
        - activity
}

/// Bisection solver for total-scale pH.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PhSolver {
    config: SolverConfig,
}

impl PhSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Total-scale pH of a parcel.
    pub fn solve(&self, parcel: &WaterParcel) -> WoacResult<f64> {
        self.solve_detailed(parcel).map(|s| s.ph)
    }

    /// Solve a parcel, evaluating its equilibrium constants first.
    pub fn solve_detailed(&self, parcel: &WaterParcel) -> WoacResult<PhSolution> {
        let constants = EquilibriumConstants::new(parcel.temperature, parcel.salinity);
        self.solve_with_constants(&constants, parcel)
    }

    /// Solve a parcel against precomputed constants.
    ///
    /// `constants` must have been built from the parcel's own temperature and
    /// salinity. Sweeps at fixed (T, S) use this to evaluate the constants once;
    /// the result is identical to [`PhSolver::solve_detailed`].
    pub fn solve_with_constants(
        &self,
        constants: &EquilibriumConstants,
        parcel: &WaterParcel,
    ) -> WoacResult<PhSolution> {
        check_positive("DIC", parcel.dic)?;
        check_positive("Alkalinity", parcel.alkalinity)?;

        let f = |x: f64| residual(constants, parcel.dic, parcel.alkalinity, x);
        let not_bracketed = || WoacError::RootNotBracketed {
            temperature: parcel.temperature,
            salinity: parcel.salinity,
            dic: parcel.dic,
            alkalinity: parcel.alkalinity,
            lower: self.config.lower_bound,
            upper: self.config.upper_bound,
        };

        let (activity, iterations) = bisect(&f, &self.config).map_err(|e| match e {
            BisectError::NotBracketed => not_bracketed(),
            BisectError::NotConverged => WoacError::SolverNotConverged {
                iterations: self.config.max_iterations,
            },
        })?;

        trace!(activity, iterations, "Charge balance converged");

        Ok(PhSolution {
            activity,
            ph: -activity.log10(),
            residual: f(activity),
            iterations,
        })
    }
}

/// Total-scale pH with the default solver configuration.
///
/// `dic` and `alkalinity` are in mol/kg.
pub fn solve_ph(temperature: f64, salinity: f64, dic: f64, alkalinity: f64) -> WoacResult<f64> {
    PhSolver::default().solve(&WaterParcel {
        temperature,
        salinity,
        dic,
        alkalinity,
    })
}

fn check_positive(name: &'static str, value: f64) -> WoacResult<()> {
    // Written so NaN fails too
    if value > 0.0 {
        Ok(())
    } else {
        Err(WoacError::NonPositiveConcentration { name, value })
    }
}

#[derive(Debug, PartialEq)]
enum BisectError {
    NotBracketed,
    NotConverged,
}

/// Bracketed bisection. The midpoint always advances from the lower bound,
/// so the sequence of evaluated points depends only on the bracket and `f`.
///
/// Returns the root estimate and the number of steps taken.
fn bisect<F: Fn(f64) -> f64>(f: F, config: &SolverConfig) -> Result<(f64, usize), BisectError> {
    let (a, b) = (config.lower_bound, config.upper_bound);
    let fa = f(a);
    let fb = f(b);

    // NaN at either end also counts as unbracketed
    if !(fa * fb <= 0.0) {
        return Err(BisectError::NotBracketed);
    }
    if fa == 0.0 {
        return Ok((a, 0));
    }
    if fb == 0.0 {
        return Ok((b, 0));
    }

    let mut xa = a;
    let mut dm = b - a;
    for i in 1..=config.max_iterations {
        dm *= 0.5;
        let xm = xa + dm;
        let fm = f(xm);
        if fm * fa >= 0.0 {
            xa = xm;
        }
        if fm == 0.0
            || fm.abs() < config.residual_tolerance
            || dm.abs() < config.activity_tolerance + config.relative_tolerance * xm.abs()
        {
            return Ok((xm, i));
        }
    }
    Err(BisectError::NotConverged)
}
