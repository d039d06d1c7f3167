//! Auditor
//!
//! The auditor player: given the learner's mixed decisions, find the subgroup of the
//! protected-attribute space whose false positive rate deviates most from the
//! population rate.
use crate::data::Dataset;
use crate::errors::FairnessError;
use crate::oracle::DecisionOracle;
use crate::regression::RegressionMethod;
use serde::{Deserialize, Serialize};

/// Direction of a subgroup's false positive rate relative to the population.
///
/// The numeric sign feeds the learner's cost update: `+1` lowers the cost of
/// predicting 1 on members of the group, `-1` raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisparitySign {
    /// The subgroup's rate is below the population rate, sign `+1`.
    Below,
    /// The subgroup's rate is above the population rate, sign `-1`.
    Above,
}

impl DisparitySign {
    pub fn as_f64(self) -> f64 {
        match self {
            DisparitySign::Below => 1.0,
            DisparitySign::Above => -1.0,
        }
    }
}

/// Most violated subgroup found in one audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    /// Membership rule over the protected attributes, 1 means in the subgroup.
    pub group: DecisionOracle,
    /// Disparity the game reacts to: the raw gap weighted by the group size.
    pub disparity: f64,
    /// `|FP(group) - FP|`, unweighted.
    pub raw_disparity: f64,
    /// Mean absolute difference between membership and the mixed decisions on negatives.
    pub group_error: f64,
    /// Subgroup members among negatives, as a fraction of all rows.
    pub group_size: f64,
    pub sign: DisparitySign,
}

/// Subgroup discovery oracle.
pub trait Auditor: Sync {
    /// Return the maximal-disparity subgroup for the mixed decisions `a`.
    ///
    /// * `a` - Probability of predicting 1 for every row.
    /// * `data` - The fairness problem.
    /// * `fp` - Running population false positive rate.
    fn get_group(&self, a: &[f64], data: &Dataset, fp: f64) -> Result<AuditResult, FairnessError>;
}

/// Auditor that searches linear threshold subgroups by cost-sensitive regression on
/// the negative examples.
///
/// Two candidates are fit: one whose members have mixed decisions below `fp` and one
/// with decisions above. The candidate with the larger size-weighted disparity wins,
/// ties go to the group below.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RegressionAuditor {
    pub method: RegressionMethod,
    pub parallel: bool,
}

impl RegressionAuditor {
    pub fn new(method: RegressionMethod, parallel: bool) -> Self {
        RegressionAuditor { method, parallel }
    }

    fn candidate(
        &self,
        data: &Dataset,
        a0: &[f64],
        c1: &[f64],
        fp: f64,
        sign: DisparitySign,
    ) -> Result<AuditResult, FairnessError> {
        let rows = data.negatives().rows();
        let n = data.rows() as f64;
        let c0 = vec![0.0; rows.len()];
        let b0 = self.method.fit(&data.x_prime, &c0, rows)?;
        let b1 = self.method.fit(&data.x_prime, c1, rows)?;
        let group = DecisionOracle::new(b0, b1);
        let members = group.predict_rows(&data.x_prime, rows, self.parallel)?;

        let group_error =
            members.iter().zip(a0).map(|(g, a)| (f64::from(*g) - a).abs()).sum::<f64>() / a0.len() as f64;
        let (count, fp_sum) = members
            .iter()
            .zip(a0)
            .filter(|(g, _)| **g == 1)
            .fold((0usize, 0.0), |(c, s), (_, a)| (c + 1, s + a));
        let fp_group = if count == 0 { 0.0 } else { fp_sum / count as f64 };
        let group_size = count as f64 / n;
        let raw_disparity = (fp_group - fp).abs();

        Ok(AuditResult {
            group,
            disparity: raw_disparity * group_size,
            raw_disparity,
            group_error,
            group_size,
            sign,
        })
    }
}

impl Auditor for RegressionAuditor {
    fn get_group(&self, a: &[f64], data: &Dataset, fp: f64) -> Result<AuditResult, FairnessError> {
        if a.len() != data.rows() {
            return Err(FairnessError::RowMismatch("mixed decisions".to_string(), data.rows(), a.len()));
        }
        let n = data.rows() as f64;
        let a0 = data.negatives().gather(a);

        // Membership is cheap where the cost of 1 is negative.
        let c1_below: Vec<f64> = a0.iter().map(|a_| -(fp - a_) / n).collect();
        let c1_above: Vec<f64> = a0.iter().map(|a_| -(a_ - fp) / n).collect();

        let below = self.candidate(data, &a0, &c1_below, fp, DisparitySign::Below)?;
        let above = self.candidate(data, &a0, &c1_above, fp, DisparitySign::Above)?;
        if above.disparity > below.disparity {
            Ok(above)
        } else {
            Ok(below)
        }
    }
}
