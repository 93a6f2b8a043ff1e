use tracing::warn;
use woac_core::errors::WoacResult;
use woac_core::seasonal::SeasonalMeans;

use super::{Driver, PhDriver};
use crate::parameters::AttributionParameters;
use crate::sweep::{Sweep, SweepRange};

/// Invasion of atmospheric CO2.
///
/// Dissolving CO2 adds DIC without changing alkalinity. The DIC sweep covers a
/// fixed absolute range rather than one centred on the seasonal mean.
///
/// A caller may pass a requested range, but it is not used: the sweep always
/// spans `invasion_dic_start..=invasion_dic_end`.
#[derive(Debug, Clone)]
pub struct Co2InvasionDriver {
    parameters: AttributionParameters,
    requested_range: Option<SweepRange>,
}

impl Co2InvasionDriver {
    pub fn from_parameters(parameters: AttributionParameters) -> Self {
        Self {
            parameters,
            requested_range: None,
        }
    }

    pub fn with_requested_range(mut self, range: SweepRange) -> Self {
        self.requested_range = Some(range);
        self
    }
}

impl PhDriver for Co2InvasionDriver {
    fn driver(&self) -> Driver {
        Driver::Co2Invasion
    }

    fn sweep(&self, means: &SeasonalMeans) -> WoacResult<Sweep> {
        let p = &self.parameters;
        let fixed = SweepRange::new(p.invasion_dic_start, p.invasion_dic_end);

        if let Some(requested) = self.requested_range {
            if requested != fixed {
                warn!(
                    requested_start = requested.start,
                    requested_end = requested.end,
                    start = fixed.start,
                    end = fixed.end,
                    "Requested CO2 invasion DIC range ignored; using the fixed range"
                );
            }
        }

        Sweep::fixed_alkalinity(fixed, means.alkalinity()?, p.sweep_points)
    }
}
