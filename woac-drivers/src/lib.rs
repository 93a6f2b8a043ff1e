//! Attribution of modelled pH change to physical drivers.
//!
//! Starting from a seasonal-mean water state, each driver perturbs DIC and
//! alkalinity along an idealised process and the pH response is solved at
//! every step. See [`drivers`] for the four processes.

pub mod drivers;
pub mod parameters;
pub mod sweep;

pub use drivers::{
    Attribution, AttributionEngine, CalcificationDriver, Co2InvasionDriver, Driver, PhDriver,
    PhotosynthesisDriver, UpwellingCurve, UpwellingDriver,
};
pub use parameters::{AttributionParameters, UpwellingSource, UpwellingSources};
pub use sweep::{PhCurve, PhSample, Sweep, SweepRange};
