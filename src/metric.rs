//! Metrics
//!
//! Error and false-positive-rate statistics of (mixed) classifiers, and the marginal
//! unfairness diagnostic over single protected attributes.
use crate::data::{Matrix, NegativeIndex};

/// Mean of `values` over `rows`, 0 for an empty selection.
pub fn mean_over(values: &[f64], rows: &[usize]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    rows.iter().map(|r| values[*r]).sum::<f64>() / rows.len() as f64
}

/// Convert 0/1 predictions into floats.
pub fn as_f64(preds: &[u8]) -> Vec<f64> {
    preds.iter().map(|p| f64::from(*p)).collect()
}

/// False positive rate of `preds` (decisions or probabilities of predicting 1),
/// averaged over the negative examples.
pub fn false_positive_rate(preds: &[f64], negatives: &NegativeIndex) -> f64 {
    mean_over(preds, negatives.rows())
}

/// Mean absolute difference between decisions and labels.
pub fn classification_error(preds: &[f64], y: &[f64]) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    preds.iter().zip(y).map(|(p, y_)| (p - y_).abs()).sum::<f64>() / y.len() as f64
}

/// Unfairness of the mixed classifier `a` along each protected attribute.
///
/// Each column is thresholded at its mean. For both the rows above and the rows at or
/// below the mean, the false positive rate among negatives is compared with the
/// population rate `fp`. An empty side counts as a rate of 0. Returns the larger
/// absolute gap per column.
///
/// * `a` - Probability of predicting 1 for every row.
/// * `x_prime` - Protected attributes.
/// * `y` - Labels.
/// * `fp` - Population false positive rate.
pub fn marginal_unfairness(a: &[f64], x_prime: &Matrix<f64>, y: &[f64], fp: f64) -> Vec<f64> {
    (0..x_prime.cols)
        .map(|q| {
            let col = x_prime.get_col(q);
            let mean = if col.is_empty() {
                0.0
            } else {
                col.iter().sum::<f64>() / col.len() as f64
            };
            let (inside, outside): (Vec<usize>, Vec<usize>) =
                (0..col.len()).filter(|i| y[*i] == 0.0).partition(|i| col[*i] > mean);
            let fp_in = mean_over(a, &inside);
            let fp_out = mean_over(a, &outside);
            f64::max((fp_in - fp).abs(), (fp_out - fp).abs())
        })
        .collect()
}
