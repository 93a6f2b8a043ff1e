//! Seawater pH from carbonate-system state, and attribution of modelled pH
//! change to calcification, CO2 invasion, photosynthesis and upwelling.
//!
//! The numerical core lives in [`woac_core`] and the drivers in
//! [`woac_drivers`]; this crate ties them to a TOML configuration and a
//! one-call site pipeline.

pub mod config;
pub mod pipeline;

pub use config::WoacConfig;
pub use pipeline::{attribute_site, SiteReport};
pub use woac_core;
pub use woac_drivers;
