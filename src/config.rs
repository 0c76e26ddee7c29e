//! Pipeline configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) reproduces the
//! reference comparison: 10 000 steps at 500 K, one component, lag 100.
//! Unknown sections and keys are rejected.
//!
//! ```toml
//! steps = 10000
//!
//! [simulation]
//! temperature = 500.0
//! friction = 1.0
//! timestep = 0.02
//! seed = 42
//!
//! [model]
//! n_components = 1
//! lag_time = 100
//! gamma = 0.05
//!
//! [report]
//! width = 30
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::decomposition::{PcaConfig, TicaConfig};
use crate::error::Result;
use crate::systems::LangevinConfig;

/// Settings shared by both projectors
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Components kept by each model
    pub n_components: usize,
    /// tICA lag in frames
    pub lag_time: usize,
    /// tICA covariance regularization
    pub gamma: f64,
    /// Scale tICA projections by timescales
    pub weighted_transform: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_components: 1,
            lag_time: 100,
            gamma: 0.05,
            weighted_transform: false,
        }
    }
}

impl ModelConfig {
    /// tICA settings derived from this section
    pub fn tica(&self) -> TicaConfig {
        TicaConfig {
            n_components: Some(self.n_components),
            lag_time: self.lag_time,
            gamma: self.gamma,
            weighted_transform: self.weighted_transform,
        }
    }

    /// PCA settings derived from this section
    pub fn pca(&self) -> PcaConfig {
        PcaConfig {
            n_components: Some(self.n_components),
        }
    }
}

/// Terminal report settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Bar chart width in cells
    pub width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { width: 30 }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Frames to record
    pub steps: usize,
    /// Integrator parameters
    pub simulation: LangevinConfig,
    /// Projector parameters
    pub model: ModelConfig,
    /// Report layout
    pub report: ReportConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            steps: Self::DEFAULT_STEPS,
            simulation: LangevinConfig::default(),
            model: ModelConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Default number of recorded frames
    pub const DEFAULT_STEPS: usize = 10_000;

    /// Reference settings with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        let mut config = Self::default();
        config.simulation.seed = Some(seed);
        config
    }

    /// Parse from a TOML string
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.simulation.validate()?;
        self.model.tica().validate()
    }

    /// Apply command-line overrides on top of the loaded values
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(steps) = overrides.steps {
            self.steps = steps;
        }
        if let Some(lag) = overrides.lag_time {
            self.model.lag_time = lag;
        }
        if let Some(seed) = overrides.seed {
            self.simulation.seed = Some(seed);
        }
        if let Some(temperature) = overrides.temperature {
            self.simulation.temperature = temperature;
        }
        if let Some(gamma) = overrides.gamma {
            self.model.gamma = gamma;
        }
        if let Some(width) = overrides.width {
            self.report.width = width;
        }
        self.validate()
    }
}

/// Optional values that replace file settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub steps: Option<usize>,
    pub lag_time: Option<usize>,
    pub seed: Option<u64>,
    pub temperature: Option<f64>,
    pub gamma: Option<f64>,
    pub width: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.steps, PipelineConfig::DEFAULT_STEPS);
        assert_eq!(config.model.lag_time, 100);
        assert_eq!(config.simulation.temperature, 500.0);
        assert_eq!(config.simulation.seed, None);
    }

    #[test]
    fn test_partial_sections() {
        let text = r#"
            steps = 2000

            [simulation]
            seed = 42
            temperature = 300.0

            [model]
            gamma = 0.0
        "#;
        let config = PipelineConfig::from_toml_str(text).unwrap();
        assert_eq!(config.steps, 2000);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.friction, 1.0);
        assert_eq!(config.model.lag_time, 100);
        assert_eq!(config.model.gamma, 0.0);
        assert_eq!(config.model.tica().n_components, Some(1));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(PipelineConfig::from_toml_str("[model]\nlag_time = 0").is_err());
        assert!(PipelineConfig::from_toml_str("[simulation]\ntimestep = -1.0").is_err());
        assert!(matches!(
            PipelineConfig::from_toml_str("[model]\nn_components = 0"),
            Err(Error::InvalidParameter { name: "n_components", .. })
        ));
        assert!(matches!(
            PipelineConfig::from_toml_str("steps = \"many\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_unknown_sections_and_keys_rejected() {
        for text in [
            "[tica]\nlag_time = 7",
            "[modle]\nlag_time = 3",
            "[model]\nlagtime = 3",
            "[simulation]\ntemprature = 300.0",
            "[report]\nheight = 10",
            "step = 100",
        ] {
            assert!(
                matches!(PipelineConfig::from_toml_str(text), Err(Error::Config(_))),
                "accepted {:?}",
                text
            );
        }
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let text = r#"
            steps = 2000

            [simulation]
            seed = 1
            friction = 2.0

            [model]
            lag_time = 20
            gamma = 0.1
        "#;
        let mut config = PipelineConfig::from_toml_str(text).unwrap();
        config
            .apply_overrides(&ConfigOverrides {
                steps: Some(500),
                lag_time: Some(7),
                seed: Some(99),
                width: Some(12),
                ..ConfigOverrides::default()
            })
            .unwrap();

        assert_eq!(config.steps, 500);
        assert_eq!(config.model.lag_time, 7);
        assert_eq!(config.simulation.seed, Some(99));
        assert_eq!(config.report.width, 12);
        // untouched
        assert_eq!(config.simulation.friction, 2.0);
        assert_eq!(config.simulation.temperature, 500.0);
        assert_eq!(config.model.gamma, 0.1);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let mut config = PipelineConfig::seeded(3);
        config.apply_overrides(&ConfigOverrides::default()).unwrap();
        assert_eq!(config, PipelineConfig::seeded(3));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let mut config = PipelineConfig::default();
        let err = config
            .apply_overrides(&ConfigOverrides {
                lag_time: Some(0),
                ..ConfigOverrides::default()
            })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "lag_time", .. }));

        let mut config = PipelineConfig::default();
        assert!(config
            .apply_overrides(&ConfigOverrides {
                temperature: Some(-5.0),
                ..ConfigOverrides::default()
            })
            .is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PipelineConfig::from_file("/nonexistent/pipeline.toml"),
            Err(Error::Io(_))
        ));
    }
}
