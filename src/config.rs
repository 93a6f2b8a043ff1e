//! TOML configuration for a site attribution run.
//!
//! Every section is optional and falls back to its defaults:
//!
//! ```toml
//! [solver]
//! max_iterations = 100
//!
//! [attribution]
//! parallel = true
//!
//! [season]
//! box_length = 1
//! month_start = 6
//! month_end = 8
//!
//! [upwelling."Annual Average"]
//! DIC = 2250.0
//! TA = 2350.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use woac_core::errors::{WoacError, WoacResult};
use woac_core::seasonal::SeasonWindow;
use woac_core::solver::{PhSolver, SolverConfig};
use woac_drivers::{AttributionEngine, AttributionParameters, UpwellingSources};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WoacConfig {
    pub solver: SolverConfig,
    pub attribution: AttributionParameters,
    pub season: SeasonWindow,
    pub upwelling: UpwellingSources,
}

impl WoacConfig {
    pub fn from_toml_str(source: &str) -> WoacResult<Self> {
        toml::from_str(source).map_err(|e| WoacError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> WoacResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| WoacError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    pub fn to_toml_string(&self) -> WoacResult<String> {
        toml::to_string(self).map_err(|e| WoacError::Config(e.to_string()))
    }

    pub fn engine(&self) -> AttributionEngine {
        AttributionEngine::new(
            self.attribution.clone(),
            PhSolver::new(self.solver.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = WoacConfig::from_toml_str("").unwrap();
        assert_eq!(config, WoacConfig::default());
        assert!(config.upwelling.is_empty());
    }

    #[test]
    fn test_sections() {
        let config = WoacConfig::from_toml_str(
            r#"
            [solver]
            max_iterations = 80
            residual_tolerance = 1e-14

            [attribution]
            parallel = false
            upwelling_label = "Summer"

            [season]
            box_length = 2
            time_start = 12
            time_end = 47
            month_start = 7
            month_end = 9

            [upwelling.Summer]
            DIC = 2280.0
            TA = 2340.0
            "#,
        )
        .unwrap();

        assert_eq!(config.solver.max_iterations, 80);
        assert_eq!(config.solver.residual_tolerance, 1e-14);
        assert_eq!(config.solver.lower_bound, 1e-16);
        assert!(!config.attribution.parallel);
        assert_eq!(config.season.box_length, 2);
        assert_eq!(config.season.time_end, Some(47));
        assert_eq!(config.upwelling.get("Summer").unwrap().dic, 2280.0);
        assert_eq!(config.engine().parameters().upwelling_label, "Summer");
    }

    #[test]
    fn test_round_trip() {
        let config = WoacConfig::default();
        let serialised = config.to_toml_string().unwrap();
        let parsed = WoacConfig::from_toml_str(&serialised).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            WoacConfig::from_toml_str("[solver]\nmax_iterations = \"many\""),
            Err(WoacError::Config(_))
        ));
        assert!(matches!(
            WoacConfig::from_file("/nonexistent/woac.toml"),
            Err(WoacError::Config(_))
        ));
    }
}
