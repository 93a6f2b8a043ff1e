//! Carbonate-system core: equilibrium constants, the pH solver, and the
//! gridded-data collaborators (nearest grid cell and seasonal averages) that
//! feed it.

pub mod equilibrium;
pub mod seasonal;
pub mod solver;
pub mod spatial;
pub mod utils;

pub mod errors;
