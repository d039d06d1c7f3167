//! Run History
//!
//! Per-iteration statistics of a fictitious-play run, append only.
use crate::config::GameIO;
use serde::{Deserialize, Serialize};

/// Statistics recorded for one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Iteration `t`, starting at 1.
    pub iteration: usize,
    /// Error of the mixed classifier.
    pub error: f64,
    /// Magnitude of the disparity the auditor found.
    pub fp_disparity: f64,
    /// Subgroup member count among negatives, as a fraction of all rows.
    pub group_size: f64,
    /// `b0.coef - b1.coef` of the subgroup oracle.
    pub coefficients: Vec<f64>,
    /// Rows flagged by any subgroup so far.
    pub covered: usize,
    /// Running false positive rate the audit was run against.
    pub fp: f64,
    /// Instantaneous false positive rate of the learner fit this iteration.
    pub learner_fp: f64,
    /// Per protected attribute, the largest gap between the rate on one side of the
    /// attribute's mean and `fp`.
    pub marginal_unfairness: Vec<f64>,
}

/// Full trajectory of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameHistory {
    pub records: Vec<IterationRecord>,
    /// Number of rows in the data the game ran on.
    pub n_rows: usize,
    /// The run was stopped through its stop flag before `max_iters`.
    pub stopped_early: bool,
}

impl GameHistory {
    pub fn new(n_rows: usize) -> Self {
        GameHistory {
            records: Vec::new(),
            n_rows,
            stopped_early: false,
        }
    }

    pub fn push(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn errors(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.error).collect()
    }

    pub fn fp_disparities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.fp_disparity).collect()
    }

    pub fn coefficients(&self) -> Vec<Vec<f64>> {
        self.records.iter().map(|r| r.coefficients.clone()).collect()
    }

    pub fn coverage(&self) -> Vec<usize> {
        self.records.iter().map(|r| r.covered).collect()
    }

    /// Fraction of rows covered by some subgroup at the end of the run.
    pub fn covered_fraction(&self) -> f64 {
        match (self.records.last(), self.n_rows) {
            (Some(r), n) if n > 0 => r.covered as f64 / n as f64,
            _ => 0.0,
        }
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }
}

impl GameIO for GameHistory {}

/// Final error and disparity of one run in a sweep over tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    pub gamma: f64,
    pub error: f64,
    pub fp_disparity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iteration: usize, covered: usize) -> IterationRecord {
        IterationRecord {
            iteration,
            error: 0.1 * iteration as f64,
            fp_disparity: 0.01,
            group_size: 0.2,
            coefficients: vec![0.5, -0.5],
            covered,
            fp: 0.3,
            learner_fp: 0.25,
            marginal_unfairness: vec![0.0, 0.1],
        }
    }

    #[test]
    fn test_accessors() {
        let mut h = GameHistory::new(10);
        assert!(h.is_empty());
        assert_eq!(h.covered_fraction(), 0.0);
        h.push(record(1, 2));
        h.push(record(2, 5));
        assert_eq!(h.len(), 2);
        assert_eq!(h.errors(), vec![0.1, 0.2]);
        assert_eq!(h.fp_disparities(), vec![0.01, 0.01]);
        assert_eq!(h.coverage(), vec![2, 5]);
        assert_eq!(h.coefficients()[1], vec![0.5, -0.5]);
        assert_eq!(h.covered_fraction(), 0.5);
    }

    #[test]
    fn test_history_json() {
        let mut h = GameHistory::new(4);
        h.push(record(1, 1));
        let json = h.json_dump().unwrap();
        let h2 = GameHistory::from_json(&json).unwrap();
        assert_eq!(h, h2);
    }
}
