//! Driver Attribution Parameters
//!
//! Sweep construction constants for the four pH drivers. All concentrations
//! are in µmol/kg.
//!
//! # Sweep shapes
//!
//! | Driver | DIC | Alkalinity | Points |
//! |---|---|---|---|
//! | Calcification/dissolution | mean - 161 to mean + 139 | mean - 322 to mean + 278 | 301 |
//! | CO2 invasion | 1950 to 2250 (fixed) | mean | 301 |
//! | Photosynthesis/respiration | mean - 161 to mean + 139 | mean + 25.82 to mean - 22.29 | 301 |
//! | Upwelling/mixing | source / 1.024 to mean | source / 1.024 to mean | 100 |
//!
//! Calcification moves two units of alkalinity per unit of DIC. Photosynthesis
//! moves alkalinity against DIC at roughly the Redfield nitrate ratio.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use woac_core::errors::{WoacError, WoacResult};

/// Label of the upwelling source used unless configured otherwise.
pub const DEFAULT_UPWELLING_LABEL: &str = "Annual Average";

/// Parameters shared by all four drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionParameters {
    /// DIC below the seasonal mean where the calcification and photosynthesis
    /// sweeps start (µmol/kg).
    /// default: 161.0
    pub dic_below_mean: f64,

    /// DIC above the seasonal mean where those sweeps end (µmol/kg).
    /// default: 139.0
    pub dic_above_mean: f64,

    /// Alkalinity below the mean where the calcification sweep starts (µmol/kg).
    /// default: 322.0
    pub calcification_alk_below_mean: f64,

    /// Alkalinity above the mean where the calcification sweep ends (µmol/kg).
    /// default: 278.0
    pub calcification_alk_above_mean: f64,

    /// Offset from the mean alkalinity where the photosynthesis sweep starts (µmol/kg).
    /// default: 25.82
    pub photosynthesis_alk_start_offset: f64,

    /// Offset from the mean alkalinity where the photosynthesis sweep ends (µmol/kg).
    /// default: -22.29
    pub photosynthesis_alk_end_offset: f64,

    /// Start of the fixed CO2 invasion DIC sweep (µmol/kg).
    /// default: 1950.0
    pub invasion_dic_start: f64,

    /// End of the fixed CO2 invasion DIC sweep (µmol/kg).
    /// default: 2250.0
    pub invasion_dic_end: f64,

    /// Samples in the calcification, CO2 invasion and photosynthesis sweeps.
    /// default: 301
    pub sweep_points: usize,

    /// Samples in the upwelling/mixing sweep.
    /// default: 100
    pub mixing_points: usize,

    /// Divisor applied to upwelling source DIC and alkalinity.
    /// default: 1.024
    pub source_density: f64,

    /// Upwelling source table entry used by the mixing driver.
    /// default: "Annual Average"
    pub upwelling_label: String,

    /// Solve sweep samples on the rayon thread pool.
    /// default: true
    pub parallel: bool,
}

impl Default for AttributionParameters {
    fn default() -> Self {
        Self {
            dic_below_mean: 161.0,
            dic_above_mean: 139.0,
            calcification_alk_below_mean: 322.0,
            calcification_alk_above_mean: 278.0,
            photosynthesis_alk_start_offset: 25.82,
            photosynthesis_alk_end_offset: -22.29,
            invasion_dic_start: 1950.0,
            invasion_dic_end: 2250.0,
            sweep_points: 301,
            mixing_points: 100,
            source_density: 1.024,
            upwelling_label: DEFAULT_UPWELLING_LABEL.to_string(),
            parallel: true,
        }
    }
}

/// Carbonate properties of upwelled source water (µmol/kg).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpwellingSource {
    #[serde(alias = "DIC")]
    pub dic: f64,
    #[serde(alias = "TA")]
    pub ta: f64,
}

/// Upwelling source properties keyed by label, e.g. "Annual Average".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpwellingSources(BTreeMap<String, UpwellingSource>);

impl UpwellingSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, label: &str, source: UpwellingSource) -> Self {
        self.0.insert(label.to_string(), source);
        self
    }

    pub fn get(&self, label: &str) -> WoacResult<&UpwellingSource> {
        self.0
            .get(label)
            .ok_or_else(|| WoacError::UnknownUpwellingSource(label.to_string()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
