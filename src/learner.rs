//! Cost Sensitive Learner
//!
//! The learner's best response: cost-sensitive classification reduced to two
//! least-squares regressions, one per candidate label.
use crate::data::Dataset;
use crate::errors::FairnessError;
use crate::oracle::DecisionOracle;
use crate::regression::RegressionMethod;
use serde::{Deserialize, Serialize};

/// Learner that best-responds to a vector of costs for predicting 1 on negative examples.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CostSensitiveLearner {
    pub method: RegressionMethod,
}

impl CostSensitiveLearner {
    pub fn new(method: RegressionMethod) -> Self {
        CostSensitiveLearner { method }
    }

    /// Per-row costs of predicting 1.
    ///
    /// Positive rows cost `-1/n` (a correct prediction), the k-th negative row costs
    /// `costs[k]`.
    pub fn row_costs(costs: &[f64], data: &Dataset) -> Result<Vec<f64>, FairnessError> {
        let negatives = data.negatives();
        if costs.len() != negatives.len() {
            return Err(FairnessError::CostLengthMismatch(negatives.len(), costs.len()));
        }
        let n = data.rows() as f64;
        let mut c1 = vec![-1.0 / n; data.rows()];
        for (cost, row) in costs.iter().zip(negatives.rows()) {
            c1[*row] = *cost;
        }
        Ok(c1)
    }

    /// Solve the cost-sensitive classification problem for the given costs.
    ///
    /// The cost of predicting 0 is zero everywhere, so `b0` regresses a zero vector and
    /// `b1` regresses the per-row costs of predicting 1. The returned oracle predicts 1
    /// where the fitted cost of 1 is below the fitted cost of 0.
    ///
    /// * `costs` - One cost per negative example, in row order.
    /// * `data` - The fairness problem.
    pub fn best_response(&self, costs: &[f64], data: &Dataset) -> Result<DecisionOracle, FairnessError> {
        let c1 = Self::row_costs(costs, data)?;
        let c0 = vec![0.0; data.rows()];
        let b0 = self.method.fit_all(&data.x, &c0)?;
        let b1 = self.method.fit_all(&data.x, &c1)?;
        Ok(DecisionOracle::new(b0, b1))
    }
}
