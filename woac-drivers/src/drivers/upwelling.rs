use serde::{Deserialize, Serialize};
use woac_core::errors::WoacResult;
use woac_core::seasonal::SeasonalMeans;
use woac_core::utils::regression::{linear_fit, LinearFit};

use super::{Driver, PhDriver};
use crate::parameters::{AttributionParameters, UpwellingSource};
use crate::sweep::{PhCurve, Sweep, SweepRange};

/// Upwelling and mixing.
///
/// Mixes source water (DIC and alkalinity divided by `source_density`) into
/// the seasonal-mean state. The first sample is pure source water and the last
/// is the mean state.
#[derive(Debug, Clone)]
pub struct UpwellingDriver {
    parameters: AttributionParameters,
    source: UpwellingSource,
}

impl UpwellingDriver {
    pub fn new(parameters: AttributionParameters, source: UpwellingSource) -> Self {
        Self { parameters, source }
    }
}

impl PhDriver for UpwellingDriver {
    fn driver(&self) -> Driver {
        Driver::Upwelling
    }

    fn sweep(&self, means: &SeasonalMeans) -> WoacResult<Sweep> {
        let p = &self.parameters;
        Sweep::paired(
            SweepRange::new(self.source.dic / p.source_density, means.dic()?),
            SweepRange::new(self.source.ta / p.source_density, means.alkalinity()?),
            p.mixing_points,
        )
    }
}

/// Mixing curve with its linear pH-vs-DIC sensitivity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpwellingCurve {
    pub curve: PhCurve,
    /// Least-squares pH against DIC (µmol/kg) over every sample
    pub fit: LinearFit,
}

impl UpwellingCurve {
    pub fn from_curve(curve: PhCurve) -> WoacResult<Self> {
        let fit = linear_fit(&curve.dic(), &curve.ph())?;
        Ok(Self { curve, fit })
    }

    pub fn slope(&self) -> f64 {
        self.fit.slope
    }

    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    /// Fraction of mean-state water in each sample, 0 at the source and 1 at
    /// the mean.
    pub fn mixing_fractions(&self) -> Vec<f64> {
        let n = self.curve.len();
        if n < 2 {
            return vec![1.0; n];
        }
        (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
    }

    /// `(mixing fraction, pH)` pairs for presentation.
    pub fn mixing_points(&self) -> Vec<(f64, f64)> {
        self.mixing_fractions()
            .into_iter()
            .zip(self.curve.samples.iter().map(|s| s.ph))
            .collect()
    }
}
