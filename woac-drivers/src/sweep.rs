//! Paired DIC/alkalinity sweeps and the pH curves evaluated along them.

use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;
use woac_core::equilibrium::EquilibriumConstants;
use woac_core::errors::{WoacError, WoacResult};
use woac_core::solver::{PhSolver, WaterParcel};

use crate::drivers::Driver;

/// Linear range from `start` to `end` inclusive (µmol/kg).
///
/// `end` may be below `start`, giving a descending sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
}

impl SweepRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// `points` evenly spaced values, both ends included.
    pub fn linspace(&self, points: usize) -> WoacResult<Array1<f64>> {
        if points < 2 {
            return Err(WoacError::InvalidSweep(format!(
                "a sweep needs at least 2 points, got {}",
                points
            )));
        }
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(WoacError::InvalidSweep(format!(
                "range {} to {} is not finite",
                self.start, self.end
            )));
        }
        Ok(Array1::linspace(self.start, self.end, points))
    }
}

/// DIC/alkalinity pairs (µmol/kg) paired index-for-index.
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    dic: Array1<f64>,
    alkalinity: Array1<f64>,
}

impl Sweep {
    pub fn new(dic: Array1<f64>, alkalinity: Array1<f64>) -> WoacResult<Self> {
        if dic.len() != alkalinity.len() {
            return Err(WoacError::ShapeMismatch {
                name: "alkalinity sweep".to_string(),
                expected: vec![dic.len()],
                actual: vec![alkalinity.len()],
            });
        }
        Ok(Self { dic, alkalinity })
    }

    /// Sweep DIC and alkalinity together over `points` samples.
    pub fn paired(dic: SweepRange, alkalinity: SweepRange, points: usize) -> WoacResult<Self> {
        Self::new(dic.linspace(points)?, alkalinity.linspace(points)?)
    }

    /// Sweep DIC with alkalinity held at `alkalinity`.
    pub fn fixed_alkalinity(dic: SweepRange, alkalinity: f64, points: usize) -> WoacResult<Self> {
        Self::new(dic.linspace(points)?, Array1::from_elem(points, alkalinity))
    }

    pub fn len(&self) -> usize {
        self.dic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dic.is_empty()
    }

    pub fn dic(&self) -> &Array1<f64> {
        &self.dic
    }

    pub fn alkalinity(&self) -> &Array1<f64> {
        &self.alkalinity
    }

    /// Solve every sample at fixed temperature (C) and salinity (PSU).
    ///
    /// The equilibrium constants depend only on temperature and salinity, so
    /// they are evaluated once for the whole sweep. With `parallel` set the
    /// samples are solved on the rayon pool; results keep sweep order either way.
    pub fn evaluate(
        &self,
        driver: Driver,
        temperature: f64,
        salinity: f64,
        solver: &PhSolver,
        parallel: bool,
    ) -> WoacResult<PhCurve> {
        let constants = EquilibriumConstants::new(temperature, salinity);
        let pairs: Vec<(f64, f64)> = self
            .dic
            .iter()
            .copied()
            .zip(self.alkalinity.iter().copied())
            .collect();

        let solve = |&(dic, alkalinity): &(f64, f64)| -> WoacResult<PhSample> {
            let parcel = WaterParcel::from_micromol(temperature, salinity, dic, alkalinity);
            let solution = solver.solve_with_constants(&constants, &parcel)?;
            Ok(PhSample {
                dic,
                alkalinity,
                ph: solution.ph,
            })
        };

        let samples: Vec<PhSample> = if parallel {
            pairs.par_iter().map(solve).collect::<WoacResult<_>>()?
        } else {
            pairs.iter().map(solve).collect::<WoacResult<_>>()?
        };

        debug!(
            driver = %driver,
            samples = samples.len(),
            temperature,
            salinity,
            "Evaluated pH sweep"
        );

        Ok(PhCurve { driver, samples })
    }
}

/// One solved point of a sweep. DIC and alkalinity are in µmol/kg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhSample {
    pub dic: f64,
    pub alkalinity: f64,
    /// Total-scale pH
    pub ph: f64,
}

/// pH along a driver's sweep, in sweep order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhCurve {
    pub driver: Driver,
    pub samples: Vec<PhSample>,
}

impl PhCurve {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn dic(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.dic).collect()
    }

    pub fn ph(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.ph).collect()
    }

    /// `(DIC, pH)` pairs for presentation.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.dic, s.ph)).collect()
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.samples.windows(2).all(|w| w[1].ph > w[0].ph)
    }

    pub fn is_strictly_decreasing(&self) -> bool {
        self.samples.windows(2).all(|w| w[1].ph < w[0].ph)
    }
}
