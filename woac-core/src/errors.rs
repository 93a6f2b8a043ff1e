use thiserror::Error;

/// Error type for failed carbonate-system computations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WoacError {
    #[error("{0}")]
    Error(String),
    #[error(
        "Root not bracketed on [{lower:e}, {upper:e}] for T={temperature} C, S={salinity}, \
         DIC={dic} mol/kg, Alk={alkalinity} mol/kg"
    )]
    RootNotBracketed {
        temperature: f64,
        salinity: f64,
        dic: f64,
        alkalinity: f64,
        lower: f64,
        upper: f64,
    },
    #[error("Root finder did not converge after {iterations} iterations")]
    SolverNotConverged { iterations: usize },
    #[error("{name} must be strictly positive at solve time, got {value} mol/kg")]
    NonPositiveConcentration { name: &'static str, value: f64 },
    #[error("No valid data for parameter {parameter} in the selected window")]
    NoValidData { parameter: String },
    #[error("Degenerate grid: {0}")]
    GridLookupDegenerate(String),
    #[error(
        "Window {axis}[{start}..={end}] is outside the dataset extent of {extent} along that axis"
    )]
    WindowOutOfBounds {
        axis: &'static str,
        start: i64,
        end: i64,
        extent: usize,
    },
    #[error("Shape mismatch for {name}. Expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
    #[error("Dataset is missing the {0} field")]
    MissingField(String),
    #[error("No upwelling source named {0:?}")]
    UnknownUpwellingSource(String),
    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type for `Result<T, WoacError>`.
pub type WoacResult<T> = Result<T, WoacError>;
