//! Game State
//!
//! Everything one iteration of fictitious play reads from the previous one.
use crate::data::Dataset;
use crate::errors::FairnessError;
use crate::oracle::DecisionOracle;

/// State carried between iterations.
///
/// Each iteration consumes a state and produces the next one, nothing else is shared.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Iteration `t` about to be played, starting at 1.
    pub iteration: usize,
    /// Running average decisions over iterations `1..t-1`, one per row.
    pub a: Vec<f64>,
    /// Running population false positive rate.
    pub fp: f64,
    /// Learner's cost of predicting 1, one per negative example.
    pub costs: Vec<f64>,
    /// Rows that were members of any flagged subgroup so far.
    pub group_membership: Vec<bool>,
    /// Most recent learner classifier.
    pub learner: DecisionOracle,
}

impl GameState {
    /// Initial state: uniform costs `1/n`, nothing averaged yet, and the learner's best
    /// response to those costs as the first classifier.
    pub fn initial(data: &Dataset, seed: DecisionOracle) -> Result<Self, FairnessError> {
        let n = data.rows();
        let m = data.negatives().len();
        if m == 0 {
            return Err(FairnessError::NoNegativeExamples);
        }
        Ok(GameState {
            iteration: 1,
            a: vec![0.0; n],
            fp: 0.0,
            costs: Self::uniform_costs(n, m),
            group_membership: vec![false; n],
            learner: seed,
        })
    }

    /// `1/n` for each of the `m` negative examples.
    pub fn uniform_costs(n: usize, m: usize) -> Vec<f64> {
        vec![1.0 / n as f64; m]
    }

    /// Membership after adding one more subgroup, never drops a row.
    pub fn cover(&self, members: &[u8]) -> Vec<bool> {
        self.group_membership
            .iter()
            .zip(members)
            .map(|(seen, g)| *seen || *g != 0)
            .collect()
    }

    /// Number of rows covered by some subgroup.
    pub fn covered(&self) -> usize {
        self.group_membership.iter().filter(|g| **g).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regression::LinearModel;

    fn state(n: usize) -> GameState {
        let zero = LinearModel {
            coef: vec![0.0],
            intercept: 0.0,
        };
        GameState {
            iteration: 1,
            a: vec![0.0; n],
            fp: 0.0,
            costs: GameState::uniform_costs(n, 2),
            group_membership: vec![false; n],
            learner: DecisionOracle::new(zero.clone(), zero),
        }
    }

    #[test]
    fn test_coverage_is_monotone() {
        let mut s = state(5);
        let groups: [[u8; 5]; 4] = [[0, 1, 0, 0, 0], [0, 0, 0, 0, 0], [1, 0, 0, 0, 1], [0, 1, 0, 0, 1]];
        let mut previous = 0;
        for g in groups.iter() {
            s.group_membership = s.cover(g);
            let now = s.covered();
            assert!(now >= previous);
            previous = now;
        }
        assert_eq!(s.group_membership, vec![true, true, false, false, true]);
        assert_eq!(previous, 3);
    }

    #[test]
    fn test_uniform_costs() {
        assert_eq!(GameState::uniform_costs(4, 3), vec![0.25; 3]);
        assert_eq!(state(4).costs.len(), 2);
    }
}
