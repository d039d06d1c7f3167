//! Cost Updates
//!
//! Feed the auditor's most violated subgroup back into the learner's costs of
//! predicting 1 on negative examples.
use crate::auditor::DisparitySign;
use crate::errors::FairnessError;
use log::debug;

/// Parameters of one cost update.
#[derive(Debug, Clone, Copy)]
pub struct CostUpdate {
    /// Bound `C` on the dual variables.
    pub c: f64,
    /// Current iteration `t`, starting at 1.
    pub iteration: usize,
    /// Disparity reported by the auditor this round.
    pub fp_disparity: f64,
    /// Tolerance below which the audit counts as satisfied.
    pub gamma: f64,
}

impl CostUpdate {
    /// Group cost of the k-th negative example, 0 when the audit is satisfied.
    #[inline]
    fn group_cost(&self, n: f64, sign: DisparitySign, g_weight_0: f64, member: u8) -> f64 {
        if self.fp_disparity.abs() < self.gamma {
            return 0.0;
        }
        (1.0 / n) * sign.as_f64() * self.c * (1.0 / self.iteration as f64) * (g_weight_0 - f64::from(member))
    }

    /// Apply the update to `costs` given subgroup membership of every negative example.
    ///
    /// Each entry follows the running average
    /// `c[k] = (c[k] - 1/n) * (t - 1)/t + group_cost[k] + 1/n`.
    ///
    /// * `costs` - Current costs, one per negative example.
    /// * `members` - Subgroup membership, aligned with `costs`.
    /// * `sign` - Direction of the subgroup's disparity.
    /// * `n` - Number of rows in the full data.
    pub fn apply(&self, costs: &[f64], members: &[u8], sign: DisparitySign, n: usize) -> Result<Vec<f64>, FairnessError> {
        if members.len() != costs.len() {
            return Err(FairnessError::CostLengthMismatch(members.len(), costs.len()));
        }
        if costs.is_empty() {
            return Err(FairnessError::NoNegativeExamples);
        }
        if self.iteration == 0 {
            return Err(FairnessError::InvalidParameter(
                "iteration".to_string(),
                "a value of at least 1".to_string(),
                self.iteration.to_string(),
            ));
        }
        if self.fp_disparity.abs() < self.gamma {
            debug!(
                "Audit satisfied at iteration {}, disparity {:.6} below gamma {}.",
                self.iteration, self.fp_disparity, self.gamma
            );
        }
        let n = n as f64;
        let t = self.iteration as f64;
        let g_weight_0 = members.iter().map(|g| f64::from(*g)).sum::<f64>() / members.len() as f64;
        Ok(costs
            .iter()
            .zip(members)
            .map(|(c1, g)| (c1 - 1.0 / n) * ((t - 1.0) / t) + self.group_cost(n, sign, g_weight_0, *g) + 1.0 / n)
            .collect())
    }
}
