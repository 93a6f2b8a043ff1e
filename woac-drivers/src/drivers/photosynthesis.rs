use woac_core::errors::WoacResult;
use woac_core::seasonal::SeasonalMeans;

use super::{Driver, PhDriver};
use crate::parameters::AttributionParameters;
use crate::sweep::{Sweep, SweepRange};

/// Photosynthesis and respiration.
///
/// Uses the same DIC sweep as calcification, but alkalinity runs the other
/// way and by a much smaller amount: nitrate uptake during photosynthesis
/// raises alkalinity while DIC is drawn down.
#[derive(Debug, Clone)]
pub struct PhotosynthesisDriver {
    parameters: AttributionParameters,
}

impl PhotosynthesisDriver {
    pub fn from_parameters(parameters: AttributionParameters) -> Self {
        Self { parameters }
    }
}

impl PhDriver for PhotosynthesisDriver {
    fn driver(&self) -> Driver {
        Driver::Photosynthesis
    }

    fn sweep(&self, means: &SeasonalMeans) -> WoacResult<Sweep> {
        let p = &self.parameters;
        let dic = means.dic()?;
        let alkalinity = means.alkalinity()?;

        Sweep::paired(
            SweepRange::new(dic - p.dic_below_mean, dic + p.dic_above_mean),
            SweepRange::new(
                alkalinity + p.photosynthesis_alk_start_offset,
                alkalinity + p.photosynthesis_alk_end_offset,
            ),
            p.sweep_points,
        )
    }
}
