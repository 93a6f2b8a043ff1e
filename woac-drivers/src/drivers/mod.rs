//! pH drivers
//!
//! Each driver turns a seasonal-mean water state into a [`Sweep`] of
//! DIC/alkalinity pairs describing one idealised physical process:
//!
//! - [`CalcificationDriver`]: carbonate precipitation and dissolution
//! - [`Co2InvasionDriver`]: air-sea CO2 uptake at constant alkalinity
//! - [`PhotosynthesisDriver`]: organic matter production and remineralisation
//! - [`UpwellingDriver`]: mixing of upwelled source water into the mean state
//!
//! [`AttributionEngine`] solves the pH along each sweep at the seasonal-mean
//! temperature and salinity.

mod calcification;
mod co2_invasion;
mod photosynthesis;
mod upwelling;

pub use calcification::CalcificationDriver;
pub use co2_invasion::Co2InvasionDriver;
pub use photosynthesis::PhotosynthesisDriver;
pub use upwelling::{UpwellingCurve, UpwellingDriver};

use serde::{Deserialize, Serialize};
use std::fmt;
use woac_core::errors::WoacResult;
use woac_core::seasonal::SeasonalMeans;
use woac_core::solver::PhSolver;

use crate::parameters::{AttributionParameters, UpwellingSources};
use crate::sweep::{PhCurve, Sweep, SweepRange};

/// Physical process a pH curve is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Driver {
    Calcification,
    Co2Invasion,
    Photosynthesis,
    Upwelling,
}

impl Driver {
    pub const ALL: [Driver; 4] = [
        Driver::Calcification,
        Driver::Co2Invasion,
        Driver::Photosynthesis,
        Driver::Upwelling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Driver::Calcification => "Calcification/Dissolution",
            Driver::Co2Invasion => "CO2 Invasion",
            Driver::Photosynthesis => "Photosynthesis/Respiration",
            Driver::Upwelling => "Upwelling/Mixing",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds the DIC/alkalinity sweep for one driver.
pub trait PhDriver: fmt::Debug + Send + Sync {
    fn driver(&self) -> Driver;

    /// Sweep in µmol/kg around the seasonal-mean state.
    fn sweep(&self, means: &SeasonalMeans) -> WoacResult<Sweep>;
}

/// pH curves for all four drivers at one site and season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub calcification: PhCurve,
    pub co2_invasion: PhCurve,
    pub photosynthesis: PhCurve,
    pub upwelling: UpwellingCurve,
}

/// Evaluates driver sweeps with a configured solver.
#[derive(Debug, Clone, Default)]
pub struct AttributionEngine {
    parameters: AttributionParameters,
    solver: PhSolver,
}

impl AttributionEngine {
    pub fn new(parameters: AttributionParameters, solver: PhSolver) -> Self {
        Self { parameters, solver }
    }

    pub fn parameters(&self) -> &AttributionParameters {
        &self.parameters
    }

    /// pH along `driver`'s sweep, holding temperature and salinity at the
    /// seasonal mean.
    pub fn curve(&self, driver: &dyn PhDriver, means: &SeasonalMeans) -> WoacResult<PhCurve> {
        let temperature = means.temperature()?;
        let salinity = means.salinity()?;
        driver.sweep(means)?.evaluate(
            driver.driver(),
            temperature,
            salinity,
            &self.solver,
            self.parameters.parallel,
        )
    }

    pub fn calcification(&self, means: &SeasonalMeans) -> WoacResult<PhCurve> {
        self.curve(
            &CalcificationDriver::from_parameters(self.parameters.clone()),
            means,
        )
    }

    /// CO2 invasion curve. `requested` is accepted but the sweep always covers
    /// the configured fixed range.
    pub fn co2_invasion(
        &self,
        means: &SeasonalMeans,
        requested: Option<SweepRange>,
    ) -> WoacResult<PhCurve> {
        let driver = Co2InvasionDriver::from_parameters(self.parameters.clone());
        let driver = match requested {
            Some(range) => driver.with_requested_range(range),
            None => driver,
        };
        self.curve(&driver, means)
    }

    pub fn photosynthesis(&self, means: &SeasonalMeans) -> WoacResult<PhCurve> {
        self.curve(
            &PhotosynthesisDriver::from_parameters(self.parameters.clone()),
            means,
        )
    }

    /// Upwelling curve mixing the configured source into the mean state, with
    /// a least-squares fit of pH against DIC.
    pub fn upwelling(
        &self,
        means: &SeasonalMeans,
        sources: &UpwellingSources,
    ) -> WoacResult<UpwellingCurve> {
        let source = sources.get(&self.parameters.upwelling_label)?;
        let driver = UpwellingDriver::new(self.parameters.clone(), *source);
        UpwellingCurve::from_curve(self.curve(&driver, means)?)
    }

    /// All four driver curves.
    pub fn attribute_all(
        &self,
        means: &SeasonalMeans,
        sources: &UpwellingSources,
    ) -> WoacResult<Attribution> {
        Ok(Attribution {
            calcification: self.calcification(means)?,
            co2_invasion: self.co2_invasion(means, None)?,
            photosynthesis: self.photosynthesis(means)?,
            upwelling: self.upwelling(means, sources)?,
        })
    }
}
