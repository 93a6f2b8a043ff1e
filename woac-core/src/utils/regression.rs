//! Regression utilities.

use crate::errors::{WoacError, WoacResult};
use serde::{Deserialize, Serialize};

/// Straight line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least-squares fit of `y` against `x`.
///
/// $$m = \frac{\sum (x_i - \bar{x})(y_i - \bar{y})}{\sum (x_i - \bar{x})^2},
///   \quad b = \bar{y} - m \bar{x}$$
///
/// Needs at least two points and some spread in `x`.
///
/// # Example
/// ```
/// use woac_core::utils::regression::linear_fit;
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [3.0, 5.0, 7.0];
/// let fit = linear_fit(&x, &y).unwrap();
/// assert!((fit.slope - 2.0).abs() < 1e-12);
/// assert!((fit.intercept - 1.0).abs() < 1e-12);
/// ```
pub fn linear_fit(x: &[f64], y: &[f64]) -> WoacResult<LinearFit> {
    if x.len() != y.len() {
        return Err(WoacError::ShapeMismatch {
            name: "y".to_string(),
            expected: vec![x.len()],
            actual: vec![y.len()],
        });
    }
    if x.len() < 2 {
        return Err(WoacError::Error(format!(
            "Linear fit needs at least 2 points, got {}",
            x.len()
        )));
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let (sxy, sxx) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            let dx = xi - x_mean;
            (sxy + dx * (yi - y_mean), sxx + dx * dx)
        });

    if sxx == 0.0 {
        return Err(WoacError::Error(
            "Linear fit is undefined when all x values are equal".to_string(),
        ));
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}
