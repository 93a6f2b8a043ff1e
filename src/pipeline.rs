//! Site pipeline: nearest grid cell, seasonal means, then driver attribution.

use serde::{Deserialize, Serialize};
use tracing::info;
use woac_core::errors::WoacResult;
use woac_core::seasonal::{seasonal_means, OceanDataset, SeasonalMeans};
use woac_core::spatial::{nearest_index, NearestPoint, Target};
use woac_drivers::Attribution;

use crate::config::WoacConfig;

/// Everything computed for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub location: NearestPoint,
    pub means: SeasonalMeans,
    pub attribution: Attribution,
}

/// Attribute seasonal pH at the grid cell nearest `(lon, lat)`.
pub fn attribute_site(
    dataset: &OceanDataset,
    lon: f64,
    lat: f64,
    config: &WoacConfig,
) -> WoacResult<SiteReport> {
    let location = nearest_index(dataset.lon(), dataset.lat(), &Target::point(lon, lat))?;
    info!(
        row = location.index.row,
        col = location.index.col,
        distance_km = location.distance_km,
        "Located site"
    );

    let means = seasonal_means(dataset, location.index, &config.season)?;
    let attribution = config.engine().attribute_all(&means, &config.upwelling)?;

    Ok(SiteReport {
        location,
        means,
        attribution,
    })
}
