//! Average Strategy
//!
//! Fictitious-play averages: the mixed classifier made of every learner seen so far,
//! and its error.
use crate::data::Dataset;
use crate::errors::FairnessError;
use crate::metric::{as_f64, classification_error};
use crate::oracle::DecisionOracle;

/// `((t - 1)/t) * previous + (1/t) * latest`, the running mean after `t` observations.
#[inline]
pub fn running_average(previous: f64, latest: f64, iteration: usize) -> f64 {
    let t = iteration as f64;
    ((t - 1.0) / t) * previous + latest * (1.0 / t)
}

/// Mix the latest decisions into the running average decisions `a`.
///
/// * `latest` - Decisions (or probabilities) of the latest classifier, one per row.
/// * `a` - Running average over iterations `1..t-1`.
/// * `iteration` - `t`, starting at 1.
pub fn mix_decisions(latest: &[f64], a: &[f64], iteration: usize) -> Result<Vec<f64>, FairnessError> {
    if latest.len() != a.len() {
        return Err(FairnessError::RowMismatch("average decisions".to_string(), a.len(), latest.len()));
    }
    if iteration == 0 {
        return Err(FairnessError::InvalidParameter(
            "iteration".to_string(),
            "a value of at least 1".to_string(),
            iteration.to_string(),
        ));
    }
    Ok(latest
        .iter()
        .zip(a)
        .map(|(p, prev)| running_average(*prev, *p, iteration))
        .collect())
}

/// Add classifier `q` to the mixture and return `(error, new_a)`.
///
/// The error is that of the mixed classifier, `mean |new_a - y|`, not of `q` alone.
pub fn evaluate_average(
    q: &DecisionOracle,
    data: &Dataset,
    a: &[f64],
    iteration: usize,
    parallel: bool,
) -> Result<(f64, Vec<f64>), FairnessError> {
    let latest = as_f64(&q.predict(&data.x, parallel)?);
    let new_a = mix_decisions(&latest, a, iteration)?;
    let error = classification_error(&new_a, data.y);
    Ok((error, new_a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurrence_three_steps() {
        let mut a = vec![0.0];
        let mut seen = Vec::new();
        for (t, p) in [0.2, 0.8, 0.5].iter().enumerate() {
            a = mix_decisions(&[*p], &a, t + 1).unwrap();
            seen.push(a[0]);
        }
        assert!((seen[0] - 0.2).abs() < 1e-12);
        assert!((seen[1] - 0.5).abs() < 1e-12);
        assert!((seen[2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_first_iteration_forgets_start() {
        let a = mix_decisions(&[1.0, 0.0, 1.0], &[0.7, 0.3, 0.1], 1).unwrap();
        assert_eq!(a, vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_average_stays_in_unit_interval() {
        let mut a = vec![0.0; 4];
        let decisions = [[1.0, 0.0, 1.0, 0.0], [1.0, 1.0, 0.0, 0.0], [0.0, 1.0, 1.0, 0.0]];
        for (t, d) in decisions.iter().enumerate() {
            a = mix_decisions(d, &a, t + 1).unwrap();
            assert!(a.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        assert!((a[0] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(a[3], 0.0);
    }

    #[test]
    fn test_running_average_and_errors() {
        assert!((running_average(0.5, 1.0, 2) - 0.75).abs() < 1e-12);
        assert!(mix_decisions(&[1.0], &[0.0, 0.0], 1).is_err());
        assert!(mix_decisions(&[1.0], &[0.0], 0).is_err());
    }
}
