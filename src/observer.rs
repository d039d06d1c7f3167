//! Observers
//!
//! Side-effect-only collaborators of the game loop: heat map rendering during the run
//! and trajectory plotting at the end. Nothing they return feeds back into the game,
//! apart from the colour range a visualizer reports.
use crate::data::Matrix;
use crate::errors::FairnessError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Renders the mixed classifier over the protected-attribute plane.
pub trait Visualizer {
    /// Render a heat map and return the `(vmin, vmax)` colour range used.
    ///
    /// * `x` - Features.
    /// * `x_prime` - The protected attributes drawn, at most two columns.
    /// * `y` - Labels.
    /// * `a` - Mixed decisions for every row.
    /// * `eta` - Grid step.
    /// * `path` - Where to write the rendering, without extension.
    /// * `vmin`, `vmax` - Colour range to reuse, `None` to let the renderer pick.
    #[allow(clippy::too_many_arguments)]
    fn heat_map(
        &mut self,
        x: &Matrix<f64>,
        x_prime: &Matrix<f64>,
        y: &[f64],
        a: &[f64],
        eta: f64,
        path: &str,
        vmin: Option<f64>,
        vmax: Option<f64>,
    ) -> Result<(f64, f64), FairnessError>;
}

/// Receives the error and disparity trajectory once a run finishes.
pub trait Plotter {
    fn plot_single(
        &mut self,
        errors: &[f64],
        fp_diffs: &[f64],
        max_iters: usize,
        gamma: f64,
        c: f64,
    ) -> Result<(), FairnessError>;
}

/// Observers injected into a run, both optional.
#[derive(Default)]
pub struct Observers<'a> {
    pub visualizer: Option<&'a mut dyn Visualizer>,
    pub plotter: Option<&'a mut dyn Plotter>,
}

/// Trajectory written by [`JsonPlotter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub errors: Vec<f64>,
    pub fp_diffs: Vec<f64>,
    pub max_iters: usize,
    pub gamma: f64,
    #[serde(rename = "C")]
    pub c: f64,
}

/// [`Plotter`] that writes the trajectory as JSON, for plotting elsewhere.
#[derive(Debug, Clone)]
pub struct JsonPlotter {
    pub path: PathBuf,
}

impl JsonPlotter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JsonPlotter { path: path.into() }
    }
}

impl Plotter for JsonPlotter {
    fn plot_single(
        &mut self,
        errors: &[f64],
        fp_diffs: &[f64],
        max_iters: usize,
        gamma: f64,
        c: f64,
    ) -> Result<(), FairnessError> {
        let trajectory = Trajectory {
            errors: errors.to_vec(),
            fp_diffs: fp_diffs.to_vec(),
            max_iters,
            gamma,
            c,
        };
        let json = serde_json::to_string(&trajectory).map_err(|e| FairnessError::UnableToWrite(e.to_string()))?;
        fs::write(&self.path, json).map_err(|e| FairnessError::UnableToWrite(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_plotter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("trajectory.json");
        let mut plotter = JsonPlotter::new(&path);
        plotter.plot_single(&[0.3, 0.25], &[0.04, 0.01], 3, 0.01, 10.0).unwrap();
        let read: Trajectory = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(read.errors, vec![0.3, 0.25]);
        assert_eq!(read.fp_diffs, vec![0.04, 0.01]);
        assert_eq!(read.max_iters, 3);
        assert_eq!(read.c, 10.0);
    }

    #[test]
    fn test_json_plotter_bad_path() {
        let dir = tempdir().unwrap();
        let mut plotter = JsonPlotter::new(dir.path().join("no").join("such").join("dir.json"));
        assert!(matches!(
            plotter.plot_single(&[], &[], 1, 0.01, 10.0),
            Err(FairnessError::UnableToWrite(_))
        ));
    }
}
