//! Seasonal averages of gridded carbonate-system fields
//!
//! Model output holds one `(time, row, col)` array per tracked parameter on a
//! monthly time axis. [`seasonal_means`] cuts a spatial box and a date range
//! out of every field, keeps only the months of the requested season, and
//! averages what is left into one scalar per parameter.
//!
//! Missing values are stored as NaN and are left out of the mean. A parameter
//! with nothing left to average is reported as [`WoacError::NoValidData`]
//! without affecting the other parameters.

use crate::errors::{WoacError, WoacResult};
use crate::spatial::GridIndex;
use chrono::{Datelike, NaiveDate};
use ndarray::{s, Array2, Array3, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Tracked carbonate-system parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Dissolved inorganic carbon (µmol/kg)
    Dic,
    /// Total alkalinity (µmol/kg)
    Alkalinity,
    /// Temperature (C)
    Temperature,
    /// Salinity (PSU)
    Salinity,
    /// CO2 partial pressure (µatm)
    PCo2,
    /// Model pH (total scale)
    Ph,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Dic,
        Parameter::Alkalinity,
        Parameter::Temperature,
        Parameter::Salinity,
        Parameter::PCo2,
        Parameter::Ph,
    ];

    /// Variable name used in model output files.
    pub fn variable_name(&self) -> &'static str {
        match self {
            Parameter::Dic => "DIC",
            Parameter::Alkalinity => "Alk",
            Parameter::Temperature => "temp",
            Parameter::Salinity => "salt",
            Parameter::PCo2 => "pco2",
            Parameter::Ph => "ph",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.variable_name())
    }
}

/// Gridded model output for one scenario.
///
/// All six parameter fields share the shape `(time, row, col)`; the coordinate
/// grids are `(row, col)`. Built through [`OceanDatasetBuilder`], which checks
/// those shapes.
#[derive(Debug, Clone)]
pub struct OceanDataset {
    time: Vec<NaiveDate>,
    lon: Array2<f64>,
    lat: Array2<f64>,
    fields: BTreeMap<Parameter, Array3<f64>>,
}

impl OceanDataset {
    pub fn time(&self) -> &[NaiveDate] {
        &self.time
    }

    pub fn lon(&self) -> &Array2<f64> {
        &self.lon
    }

    pub fn lat(&self) -> &Array2<f64> {
        &self.lat
    }

    pub fn field(&self, parameter: Parameter) -> &Array3<f64> {
        // Presence of every parameter is checked at build time
        &self.fields[&parameter]
    }

    /// `(time, row, col)` extent of the fields.
    pub fn shape(&self) -> (usize, usize, usize) {
        let (rows, cols) = self.lon.dim();
        (self.time.len(), rows, cols)
    }
}

#[derive(Debug, Default)]
pub struct OceanDatasetBuilder {
    time: Vec<NaiveDate>,
    lon: Option<Array2<f64>>,
    lat: Option<Array2<f64>>,
    fields: BTreeMap<Parameter, Array3<f64>>,
}

impl OceanDatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monthly time stamps, one per entry along the first field axis.
    pub fn with_time(mut self, time: Vec<NaiveDate>) -> Self {
        self.time = time;
        self
    }

    pub fn with_coordinates(mut self, lon: Array2<f64>, lat: Array2<f64>) -> Self {
        self.lon = Some(lon);
        self.lat = Some(lat);
        self
    }

    pub fn with_field(mut self, parameter: Parameter, values: Array3<f64>) -> Self {
        self.fields.insert(parameter, values);
        self
    }

    pub fn build(self) -> WoacResult<OceanDataset> {
        let lon = self
            .lon
            .ok_or_else(|| WoacError::MissingField("lon_rho".to_string()))?;
        let lat = self
            .lat
            .ok_or_else(|| WoacError::MissingField("lat_rho".to_string()))?;

        if lat.shape() != lon.shape() {
            return Err(WoacError::ShapeMismatch {
                name: "lat_rho".to_string(),
                expected: lon.shape().to_vec(),
                actual: lat.shape().to_vec(),
            });
        }

        let expected = vec![self.time.len(), lon.nrows(), lon.ncols()];
        for parameter in Parameter::ALL {
            let field = self
                .fields
                .get(&parameter)
                .ok_or_else(|| WoacError::MissingField(parameter.to_string()))?;
            if field.shape() != expected.as_slice() {
                return Err(WoacError::ShapeMismatch {
                    name: parameter.to_string(),
                    expected: expected.clone(),
                    actual: field.shape().to_vec(),
                });
            }
        }

        Ok(OceanDataset {
            time: self.time,
            lon,
            lat,
            fields: self.fields,
        })
    }
}

/// Spatial box and season to average over.
///
/// The box spans rows `row - 1 ..= row + box_length + 1` and likewise for
/// columns, so it is not centred on the site. Months are an inclusive numeric
/// range applied within `time_start ..= time_end`, which selects the same
/// season in every year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonWindow {
    /// Extra cells added beyond the site on the outer edge.
    /// default: 1
    pub box_length: usize,

    /// First time index (inclusive).
    /// default: 0
    pub time_start: usize,

    /// Last time index (inclusive). `None` runs to the end of the record.
    /// default: None
    pub time_end: Option<usize>,

    /// First calendar month of the season (1-12, inclusive).
    /// default: 6 (June)
    pub month_start: u32,

    /// Last calendar month of the season (1-12, inclusive).
    /// default: 8 (August)
    pub month_end: u32,
}

impl Default for SeasonWindow {
    fn default() -> Self {
        Self {
            box_length: 1,
            time_start: 0,
            time_end: None,
            month_start: 6,
            month_end: 8,
        }
    }
}

impl SeasonWindow {
    pub fn contains_month(&self, month: u32) -> bool {
        month >= self.month_start && month <= self.month_end
    }
}

/// Seasonal mean of every tracked parameter.
///
/// A parameter without any valid sample in the window holds no value;
/// [`SeasonalMeans::get`] reports it as [`WoacError::NoValidData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalMeans {
    means: BTreeMap<Parameter, Option<f64>>,
}

impl SeasonalMeans {
    /// Build from already-reduced values, e.g. for a hand-specified state.
    pub fn from_values<I: IntoIterator<Item = (Parameter, f64)>>(values: I) -> Self {
        let mut means: BTreeMap<Parameter, Option<f64>> =
            Parameter::ALL.iter().map(|p| (*p, None)).collect();
        for (parameter, value) in values {
            means.insert(parameter, Some(value).filter(|v| !v.is_nan()));
        }
        Self { means }
    }

    pub fn get(&self, parameter: Parameter) -> WoacResult<f64> {
        self.means
            .get(&parameter)
            .copied()
            .flatten()
            .ok_or_else(|| WoacError::NoValidData {
                parameter: parameter.to_string(),
            })
    }

    pub fn dic(&self) -> WoacResult<f64> {
        self.get(Parameter::Dic)
    }

    pub fn alkalinity(&self) -> WoacResult<f64> {
        self.get(Parameter::Alkalinity)
    }

    pub fn temperature(&self) -> WoacResult<f64> {
        self.get(Parameter::Temperature)
    }

    pub fn salinity(&self) -> WoacResult<f64> {
        self.get(Parameter::Salinity)
    }

    /// Parameters whose window held no valid data.
    pub fn missing(&self) -> Vec<Parameter> {
        self.means
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(p, _)| *p)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, WoacResult<f64>)> + '_ {
        self.means.keys().map(move |p| (*p, self.get(*p)))
    }
}

/// Average every parameter over the box around `site` and the season.
///
/// Fails only when the window itself is invalid; parameters without data are
/// reported per parameter through the returned [`SeasonalMeans`].
pub fn seasonal_means(
    dataset: &OceanDataset,
    site: GridIndex,
    window: &SeasonWindow,
) -> WoacResult<SeasonalMeans> {
    let (n_time, n_rows, n_cols) = dataset.shape();

    let rows = box_range("row", site.row, window.box_length, n_rows)?;
    let cols = box_range("col", site.col, window.box_length, n_cols)?;

    let time_end = window.time_end.unwrap_or(n_time.saturating_sub(1));
    if window.time_start > time_end || time_end >= n_time {
        return Err(WoacError::WindowOutOfBounds {
            axis: "time",
            start: window.time_start as i64,
            end: time_end as i64,
            extent: n_time,
        });
    }

    let in_season: Vec<usize> = (window.time_start..=time_end)
        .filter(|&t| window.contains_month(dataset.time()[t].month()))
        .collect();

    let mut means = BTreeMap::new();
    for parameter in Parameter::ALL {
        let sub = dataset
            .field(parameter)
            .slice(s![.., rows.0..=rows.1, cols.0..=cols.1]);

        let mut sum = 0.0;
        let mut count = 0usize;
        for &t in &in_season {
            for &v in sub.index_axis(Axis(0), t).iter() {
                if !v.is_nan() {
                    sum += v;
                    count += 1;
                }
            }
        }

        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            warn!(
                parameter = %parameter,
                row = site.row,
                col = site.col,
                "No valid data in seasonal window"
            );
            None
        };
        means.insert(parameter, mean);
    }

    Ok(SeasonalMeans { means })
}

/// Inclusive `[centre - 1, centre + box_length + 1]`, checked against `extent`.
fn box_range(
    axis: &'static str,
    centre: usize,
    box_length: usize,
    extent: usize,
) -> WoacResult<(usize, usize)> {
    let start = centre as i64 - 1;
    let end = (centre + box_length + 1) as i64;
    if start < 0 || end >= extent as i64 {
        return Err(WoacError::WindowOutOfBounds {
            axis,
            start,
            end,
            extent,
        });
    }
    Ok((start as usize, end as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use ndarray::Array;

    /// Monthly stamps starting in January of `year`.
    fn monthly(year: i32, n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(year + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap()
            })
            .collect()
    }

    /// Every field equals `value(time, row, col)`.
    fn dataset<F: Fn(usize, usize, usize) -> f64 + Copy>(
        n_time: usize,
        n_rows: usize,
        n_cols: usize,
        value: F,
    ) -> OceanDataset {
        let lon = Array::from_shape_fn((n_rows, n_cols), |(_, c)| -125.0 + 0.1 * c as f64);
        let lat = Array::from_shape_fn((n_rows, n_cols), |(r, _)| 47.0 + 0.1 * r as f64);
        let mut builder = OceanDatasetBuilder::new()
            .with_time(monthly(1994, n_time))
            .with_coordinates(lon, lat);
        for parameter in Parameter::ALL {
            builder = builder.with_field(
                parameter,
                Array::from_shape_fn((n_time, n_rows, n_cols), |(t, r, c)| value(t, r, c)),
            );
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_constant_field() {
        let ds = dataset(24, 8, 8, |_, _, _| 2000.0);
        let means = seasonal_means(&ds, GridIndex { row: 3, col: 3 }, &SeasonWindow::default())
            .unwrap();
        for (parameter, value) in means.iter() {
            assert!(is_close!(value.unwrap(), 2000.0), "{}", parameter);
        }
        assert!(means.missing().is_empty());
    }

    #[test]
    fn test_window_is_asymmetric() {
        // Value encodes the row; rows 2..=5 are selected for row 3, box 1
        let ds = dataset(12, 8, 8, |_, r, _| r as f64);
        let means = seasonal_means(&ds, GridIndex { row: 3, col: 3 }, &SeasonWindow::default())
            .unwrap();
        assert!(is_close!(means.dic().unwrap(), 3.5));

        let window = SeasonWindow {
            box_length: 3,
            ..SeasonWindow::default()
        };
        // rows 2..=7
        let means = seasonal_means(&ds, GridIndex { row: 3, col: 1 }, &window).unwrap();
        assert!(is_close!(means.dic().unwrap(), 4.5));
    }

    #[test]
    fn test_month_filter_spans_years() {
        // Value is the calendar month; June-August every year averages to 7
        let ds = dataset(36, 6, 6, |t, _, _| (t % 12 + 1) as f64);
        let means = seasonal_means(&ds, GridIndex { row: 1, col: 1 }, &SeasonWindow::default())
            .unwrap();
        assert!(is_close!(means.temperature().unwrap(), 7.0));

        let winter = SeasonWindow {
            month_start: 1,
            month_end: 2,
            ..SeasonWindow::default()
        };
        let means = seasonal_means(&ds, GridIndex { row: 1, col: 1 }, &winter).unwrap();
        assert!(is_close!(means.temperature().unwrap(), 1.5));
    }

    #[test]
    fn test_time_range_restricts_years() {
        // Value is the year offset; only the second year is selected
        let ds = dataset(36, 6, 6, |t, _, _| (t / 12) as f64);
        let window = SeasonWindow {
            time_start: 12,
            time_end: Some(23),
            ..SeasonWindow::default()
        };
        let means = seasonal_means(&ds, GridIndex { row: 1, col: 1 }, &window).unwrap();
        assert!(is_close!(means.salinity().unwrap(), 1.0));
    }

    #[test]
    fn test_missing_values_skipped() {
        // Half the cells are missing; they must not pull the mean towards zero
        let ds = dataset(12, 6, 6, |_, r, c| {
            if (r + c) % 2 == 0 {
                f64::NAN
            } else {
                10.0
            }
        });
        let means = seasonal_means(&ds, GridIndex { row: 1, col: 1 }, &SeasonWindow::default())
            .unwrap();
        assert!(is_close!(means.alkalinity().unwrap(), 10.0));
    }

    #[test]
    fn test_all_missing_signals_no_valid_data() {
        let lon = Array::from_shape_fn((6, 6), |(_, c)| c as f64);
        let lat = Array::from_shape_fn((6, 6), |(r, _)| r as f64);
        let mut builder = OceanDatasetBuilder::new()
            .with_time(monthly(2000, 12))
            .with_coordinates(lon, lat);
        for parameter in Parameter::ALL {
            let value = if parameter == Parameter::PCo2 {
                f64::NAN
            } else {
                1.0
            };
            builder = builder.with_field(parameter, Array3::from_elem((12, 6, 6), value));
        }
        let ds = builder.build().unwrap();

        let means = seasonal_means(&ds, GridIndex { row: 1, col: 1 }, &SeasonWindow::default())
            .unwrap();
        assert_eq!(
            means.get(Parameter::PCo2),
            Err(WoacError::NoValidData {
                parameter: "pco2".to_string()
            })
        );
        assert_eq!(means.missing(), vec![Parameter::PCo2]);
        assert!(is_close!(means.dic().unwrap(), 1.0));
    }

    #[test]
    fn test_season_absent_from_record() {
        // Four months of data, none in summer
        let ds = dataset(4, 6, 6, |_, _, _| 1.0);
        let means = seasonal_means(&ds, GridIndex { row: 1, col: 1 }, &SeasonWindow::default())
            .unwrap();
        assert_eq!(means.missing().len(), 6);
    }

    #[test]
    fn test_window_out_of_bounds() {
        let ds = dataset(12, 6, 6, |_, _, _| 1.0);
        let window = SeasonWindow::default();

        assert!(matches!(
            seasonal_means(&ds, GridIndex { row: 0, col: 2 }, &window),
            Err(WoacError::WindowOutOfBounds { axis: "row", .. })
        ));
        assert!(matches!(
            seasonal_means(&ds, GridIndex { row: 2, col: 4 }, &window),
            Err(WoacError::WindowOutOfBounds { axis: "col", .. })
        ));

        let window = SeasonWindow {
            time_end: Some(12),
            ..SeasonWindow::default()
        };
        assert!(matches!(
            seasonal_means(&ds, GridIndex { row: 2, col: 2 }, &window),
            Err(WoacError::WindowOutOfBounds { axis: "time", .. })
        ));
    }

    #[test]
    fn test_builder_validates_shapes() {
        let lon = Array2::<f64>::zeros((4, 4));
        let lat = Array2::<f64>::zeros((4, 4));

        let result = OceanDatasetBuilder::new()
            .with_time(monthly(2000, 3))
            .with_coordinates(lon.clone(), lat.clone())
            .with_field(Parameter::Dic, Array3::zeros((3, 4, 4)))
            .build();
        assert!(matches!(result, Err(WoacError::MissingField(_))));

        let mut builder = OceanDatasetBuilder::new()
            .with_time(monthly(2000, 3))
            .with_coordinates(lon, lat);
        for parameter in Parameter::ALL {
            builder = builder.with_field(parameter, Array3::zeros((3, 4, 5)));
        }
        assert!(matches!(
            builder.build(),
            Err(WoacError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_from_values() {
        let means = SeasonalMeans::from_values([
            (Parameter::Dic, 2000.0),
            (Parameter::Alkalinity, 2300.0),
            (Parameter::Ph, f64::NAN),
        ]);
        assert_eq!(means.dic().unwrap(), 2000.0);
        assert!(means.get(Parameter::Ph).is_err());
        assert!(means.temperature().is_err());
    }

    #[test]
    fn test_serialization() {
        let means = SeasonalMeans::from_values([(Parameter::Dic, 2000.0)]);
        let json = serde_json::to_string(&means).expect("Serialization failed");
        let parsed: SeasonalMeans = serde_json::from_str(&json).expect("Deserialization failed");
        assert_eq!(means, parsed);
    }
}
