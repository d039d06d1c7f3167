//! Decision Oracle
//!
//! A binary classifier built from two real-valued regressors, one scoring the cost of
//! predicting 0 and one scoring the cost of predicting 1.
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::regression::{LinearModel, Regressor};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Pair of fitted regressors turned into a 0/1 rule.
///
/// A row is labelled 1 iff the "predict 1" score is strictly lower than the
/// "predict 0" score. Used both for the learner's classifiers and for the subgroups
/// returned by the auditor, where 1 means membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionOracle<R = LinearModel> {
    /// Scores the cost of predicting 0.
    pub b0: R,
    /// Scores the cost of predicting 1.
    pub b1: R,
}

impl<R: Regressor> DecisionOracle<R> {
    pub fn new(b0: R, b1: R) -> Self {
        DecisionOracle { b0, b1 }
    }

    #[inline]
    fn predict_row(&self, data: &Matrix<f64>, row: usize) -> u8 {
        u8::from(self.b1.score_row(data, row) < self.b0.score_row(data, row))
    }

    fn check_dimensions(&self, data: &Matrix<f64>) -> Result<(), FairnessError> {
        let expected = self.b0.n_features();
        if data.cols != expected || self.b1.n_features() != expected {
            return Err(FairnessError::DimensionMismatch(expected, data.cols));
        }
        Ok(())
    }

    /// Predict every row of `data`.
    ///
    /// * `data` - Matrix with the same columns the regressors were fit on.
    /// * `parallel` - If `true`, rows are scored in parallel using Rayon.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<u8>, FairnessError> {
        self.predict_rows(data, &data.index, parallel)
    }

    /// Predict only the given rows of `data`, in the order given.
    pub fn predict_rows(&self, data: &Matrix<f64>, rows: &[usize], parallel: bool) -> Result<Vec<u8>, FairnessError> {
        self.check_dimensions(data)?;
        if parallel {
            Ok(rows.par_iter().map(|r| self.predict_row(data, *r)).collect())
        } else {
            Ok(rows.iter().map(|r| self.predict_row(data, *r)).collect())
        }
    }

    /// Coefficient difference `b0.coef - b1.coef`, the direction of the decision boundary.
    ///
    /// Empty when the regressors carry no coefficients.
    pub fn coefficient_delta(&self) -> Vec<f64> {
        match (self.b0.coefficients(), self.b1.coefficients()) {
            (Some(c0), Some(c1)) => c0.iter().zip(c1).map(|(a, b)| a - b).collect(),
            _ => Vec::new(),
        }
    }
}
