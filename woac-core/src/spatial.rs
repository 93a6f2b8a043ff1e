//! Grid-point lookup on curvilinear ocean-model grids
//!
//! Ocean model output is stored on a 2-D curvilinear grid where every cell
//! carries its own longitude and latitude. [`nearest_index`] finds the cell
//! closest to a site by great-circle distance.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::array;
//! use woac_core::spatial::{nearest_index, GridIndex, Target};
//!
//! let lon = array![[-125.0, -124.5], [-125.0, -124.5]];
//! let lat = array![[47.0, 47.0], [47.5, 47.5]];
//!
//! let nearest = nearest_index(&lon, &lat, &Target::point(-124.6, 47.4)).unwrap();
//! assert_eq!(nearest.index, GridIndex { row: 1, col: 1 });
//! ```

use crate::errors::{WoacError, WoacResult};
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

/// Mean Earth radius (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Spacing of the model's output depth levels (m).
pub const DEFAULT_DEPTH_INCREMENT: f64 = 25.0;

/// Deepest output level (m).
pub const MAX_STANDARD_DEPTH: f64 = 200.0;

/// Position of a cell in a 2-D grid.
///
/// `row` runs along the first axis (eta) and `col` along the second (xi).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

/// Location(s) to search for.
///
/// A single point is compared against every cell. A field supplies one target
/// per cell and must match the grid's shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    Point { lon: f64, lat: f64 },
    Field { lon: Array2<f64>, lat: Array2<f64> },
}

impl Target {
    pub fn point(lon: f64, lat: f64) -> Self {
        Target::Point { lon, lat }
    }
}

/// Result of a nearest-cell search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestPoint {
    pub index: GridIndex,
    /// Great-circle distance to the target (km)
    pub distance_km: f64,
}

/// Great-circle distance between two points given in degrees, in km.
pub fn haversine_km(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin() * EARTH_RADIUS_KM
}

/// Find the grid cell closest to `target`.
///
/// Cells are scanned in row-major order and only a strictly smaller distance
/// replaces the current best, so ties resolve to the first cell visited.
/// Cells whose distance is NaN (missing coordinates) are skipped.
pub fn nearest_index(
    grid_lon: &Array2<f64>,
    grid_lat: &Array2<f64>,
    target: &Target,
) -> WoacResult<NearestPoint> {
    if grid_lon.shape() != grid_lat.shape() {
        return Err(WoacError::GridLookupDegenerate(format!(
            "longitude grid {:?} and latitude grid {:?} differ in shape",
            grid_lon.shape(),
            grid_lat.shape()
        )));
    }
    if grid_lon.is_empty() {
        return Err(WoacError::GridLookupDegenerate(
            "coordinate grids are empty".to_string(),
        ));
    }

    let distances = match target {
        Target::Point { lon, lat } => Zip::from(grid_lon)
            .and(grid_lat)
            .map_collect(|&g_lon, &g_lat| haversine_km(g_lon, g_lat, *lon, *lat)),
        Target::Field { lon, lat } => {
            if lon.shape() != grid_lon.shape() || lat.shape() != grid_lon.shape() {
                return Err(WoacError::GridLookupDegenerate(format!(
                    "target field {:?}/{:?} does not match grid {:?}",
                    lon.shape(),
                    lat.shape(),
                    grid_lon.shape()
                )));
            }
            Zip::from(grid_lon)
                .and(grid_lat)
                .and(lon)
                .and(lat)
                .map_collect(|&g_lon, &g_lat, &t_lon, &t_lat| {
                    haversine_km(g_lon, g_lat, t_lon, t_lat)
                })
        }
    };

    let mut best: Option<NearestPoint> = None;
    for ((row, col), &distance) in distances.indexed_iter() {
        if distance.is_nan() {
            continue;
        }
        if best.map_or(true, |b| distance < b.distance_km) {
            best = Some(NearestPoint {
                index: GridIndex { row, col },
                distance_km: distance,
            });
        }
    }

    best.ok_or_else(|| {
        WoacError::GridLookupDegenerate("no cell has valid coordinates".to_string())
    })
}

/// Snap a depth to the nearest multiple of `increment` and truncate to an integer.
///
/// Exact halfway cases round to the even multiple, so 12.5 m snaps to 0 and
/// 37.5 m snaps to 50 with a 25 m increment.
pub fn round_to_depth_increment(depth: f64, increment: f64) -> i64 {
    (increment * (depth / increment).round_ties_even()) as i64
}

/// Output depth levels of the model: 0, 25, ..., 200 m.
pub fn standard_depths() -> Vec<f64> {
    let n = (MAX_STANDARD_DEPTH / DEFAULT_DEPTH_INCREMENT) as usize;
    (0..=n).map(|i| i as f64 * DEFAULT_DEPTH_INCREMENT).collect()
}
