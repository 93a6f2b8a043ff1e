use woac_core::errors::WoacResult;
use woac_core::seasonal::SeasonalMeans;

use super::{Driver, PhDriver};
use crate::parameters::AttributionParameters;
use crate::sweep::{Sweep, SweepRange};

/// Calcification and dissolution.
///
/// Precipitating CaCO3 removes one DIC and two alkalinity per mole, so DIC and
/// alkalinity are swept together at a 1:2 ratio through the seasonal mean.
/// pH rises along the sweep, towards the dissolution end.
#[derive(Debug, Clone)]
pub struct CalcificationDriver {
    parameters: AttributionParameters,
}

impl CalcificationDriver {
    pub fn from_parameters(parameters: AttributionParameters) -> Self {
        Self { parameters }
    }
}

impl PhDriver for CalcificationDriver {
    fn driver(&self) -> Driver {
        Driver::Calcification
    }

    fn sweep(&self, means: &SeasonalMeans) -> WoacResult<Sweep> {
        let p = &self.parameters;
        let dic = means.dic()?;
        let alkalinity = means.alkalinity()?;

        Sweep::paired(
            SweepRange::new(dic - p.dic_below_mean, dic + p.dic_above_mean),
            SweepRange::new(
                alkalinity - p.calcification_alk_below_mean,
                alkalinity + p.calcification_alk_above_mean,
            ),
            p.sweep_points,
        )
    }
}
