//! Game Configuration
//!
//! Parameters of a fictitious-play run, their defaults, validation, and JSON IO.
use crate::constants::{
    DEFAULT_C, DEFAULT_GAMMA, DEFAULT_HEATMAP_DIR, DEFAULT_HEATMAP_ETA, DEFAULT_HEATMAP_ITER, DEFAULT_MAX_ITERS,
};
use crate::errors::FairnessError;
use crate::regression::RegressionMethod;
use crate::utils::{validate_count_parameter, validate_float_parameter, validate_positive_float_parameter};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_c() -> f64 {
    DEFAULT_C
}
fn default_max_iters() -> usize {
    DEFAULT_MAX_ITERS
}
fn default_gamma() -> f64 {
    DEFAULT_GAMMA
}
fn default_heatmap_iter() -> usize {
    DEFAULT_HEATMAP_ITER
}
fn default_heatmap_eta() -> f64 {
    DEFAULT_HEATMAP_ETA
}
fn default_heatmap_dir() -> String {
    DEFAULT_HEATMAP_DIR.to_string()
}
fn default_log_iterations() -> usize {
    1
}

/// Configuration for a [`crate::game::FictitiousPlay`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Bound on the L1 norm of the dual variables.
    #[serde(rename = "C", default = "default_c")]
    pub c: f64,
    /// Iteration count the run terminates at, `max_iters - 1` rounds are played.
    #[serde(default = "default_max_iters")]
    pub max_iters: usize,
    /// Disparity tolerated in any subgroup.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// Render a heat map every `heatmap_iter` iterations.
    #[serde(default = "default_heatmap_iter")]
    pub heatmap_iter: usize,
    /// Grid step handed to the heat map renderer.
    #[serde(default = "default_heatmap_eta")]
    pub heatmap_eta: f64,
    /// Directory heat maps are written under.
    #[serde(default = "default_heatmap_dir")]
    pub heatmap_dir: String,
    /// Log per-iteration statistics.
    #[serde(default)]
    pub print_output: bool,
    /// Render heat maps through the visualizer.
    #[serde(default)]
    pub heatmap: bool,
    /// Hand the trajectory to the plotter when the run ends.
    #[serde(default)]
    pub plots: bool,
    /// With `print_output`, log every N iterations.
    #[serde(default = "default_log_iterations")]
    pub log_iterations: usize,
    /// Score rows in parallel.
    #[serde(default)]
    pub parallel: bool,
    /// How the learner's scoring functions are fit.
    #[serde(default)]
    pub regression: RegressionMethod,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            c: DEFAULT_C,
            max_iters: DEFAULT_MAX_ITERS,
            gamma: DEFAULT_GAMMA,
            heatmap_iter: DEFAULT_HEATMAP_ITER,
            heatmap_eta: DEFAULT_HEATMAP_ETA,
            heatmap_dir: DEFAULT_HEATMAP_DIR.to_string(),
            print_output: false,
            heatmap: false,
            plots: false,
            log_iterations: 1,
            parallel: false,
            regression: RegressionMethod::LeastSquares,
        }
    }
}

impl GameConfig {
    pub fn validate_parameters(&self) -> Result<(), FairnessError> {
        validate_positive_float_parameter(self.c, "C")?;
        validate_positive_float_parameter(self.gamma, "gamma")?;
        validate_float_parameter(self.heatmap_eta, f64::MIN_POSITIVE, 1.0, "heatmap_eta")?;
        validate_count_parameter(self.max_iters, 1, "max_iters")?;
        validate_count_parameter(self.heatmap_iter, 1, "heatmap_iter")?;
        if let RegressionMethod::Ridge { alpha } = self.regression {
            validate_positive_float_parameter(alpha, "alpha")?;
        }
        Ok(())
    }

    /// Set the bound on the dual variables.
    /// * `c` - Non-negative bound.
    pub fn set_c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    /// Set the iteration count the run terminates at.
    pub fn set_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the fairness tolerance.
    pub fn set_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set how often heat maps are rendered.
    pub fn set_heatmap_iter(mut self, heatmap_iter: usize) -> Self {
        self.heatmap_iter = heatmap_iter;
        self
    }

    pub fn set_heatmap_eta(mut self, heatmap_eta: f64) -> Self {
        self.heatmap_eta = heatmap_eta;
        self
    }

    pub fn set_heatmap_dir(mut self, heatmap_dir: &str) -> Self {
        self.heatmap_dir = heatmap_dir.to_string();
        self
    }

    pub fn set_print_output(mut self, print_output: bool) -> Self {
        self.print_output = print_output;
        self
    }

    pub fn set_heatmap(mut self, heatmap: bool) -> Self {
        self.heatmap = heatmap;
        self
    }

    pub fn set_plots(mut self, plots: bool) -> Self {
        self.plots = plots;
        self
    }

    /// Set the logging frequency.
    /// * `log_iterations` - Log every N iterations, 0 disables the per-iteration lines.
    pub fn set_log_iterations(mut self, log_iterations: usize) -> Self {
        self.log_iterations = log_iterations;
        self
    }

    pub fn set_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the regression method of the learner.
    pub fn set_regression(mut self, regression: RegressionMethod) -> Self {
        self.regression = regression;
        self
    }
}

/// JSON persistence for configurations and run reports.
pub trait GameIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), FairnessError> {
        fs::write(path, self.json_dump()?).map_err(|e| FairnessError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json string.
    fn json_dump(&self) -> Result<String, FairnessError> {
        serde_json::to_string(self).map_err(|e| FairnessError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    fn from_json(json_str: &str) -> Result<Self, FairnessError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| FairnessError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, FairnessError> {
        let json_str = fs::read_to_string(path).map_err(|e| FairnessError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl GameIO for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.c, 10.0);
        assert_eq!(config.max_iters, 10);
        assert_eq!(config.gamma, 0.01);
        assert_eq!(config.heatmap_iter, 1);
        assert!(!config.print_output && !config.heatmap && !config.plots);
        assert!(config.validate_parameters().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"C": 5.0, "gamma": 0.05, "regression": {"Ridge": {"alpha": 0.5}}}"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.c, 5.0);
        assert_eq!(config.gamma, 0.05);
        assert_eq!(config.max_iters, 10);
        assert_eq!(config.heatmap_dir, "viz/heatmaps");
        assert_eq!(config.regression, RegressionMethod::Ridge { alpha: 0.5 });
    }

    #[test]
    fn test_game_io_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("game.json");
        let config = GameConfig::default().set_max_iters(25).set_gamma(0.002).set_parallel(true);
        config.save_json(&file_path).unwrap();
        let config2 = GameConfig::load_json(&file_path).unwrap();
        assert_eq!(config, config2);
        assert!(GameConfig::load_json(dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_validate_parameters() {
        assert!(GameConfig::default().set_gamma(-1.0).validate_parameters().is_err());
        assert!(GameConfig::default().set_c(f64::NAN).validate_parameters().is_err());
        assert!(GameConfig::default().set_max_iters(0).validate_parameters().is_err());
        assert!(GameConfig::default().set_heatmap_iter(0).validate_parameters().is_err());
        assert!(GameConfig::default()
            .set_regression(RegressionMethod::Ridge { alpha: -0.1 })
            .validate_parameters()
            .is_err());
    }
}
