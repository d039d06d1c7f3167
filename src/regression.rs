//! Regression
//!
//! Real-valued scoring functions used by the decision oracles, and the linear
//! least-squares fits that produce them.
use crate::data::Matrix;
use crate::errors::FairnessError;
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Size below which a pivot of the equilibrated normal equations is treated as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// A fitted real-valued scoring function over the rows of a matrix.
pub trait Regressor: Send + Sync {
    /// Number of columns the regressor was fit on.
    fn n_features(&self) -> usize;
    /// Score a single row of `data`.
    fn score_row(&self, data: &Matrix<f64>, row: usize) -> f64;
    /// Per-feature coefficients, if the model family has them.
    fn coefficients(&self) -> Option<&[f64]> {
        None
    }
}

/// Method used to fit the linear scoring functions.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
pub enum RegressionMethod {
    /// Ordinary least squares with an intercept.
    #[default]
    LeastSquares,
    /// Least squares with an L2 penalty on the coefficients (the intercept is not penalized).
    Ridge {
        /// Strength of the penalty.
        alpha: f64,
    },
}

impl FromStr for RegressionMethod {
    type Err = FairnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LeastSquares" => Ok(RegressionMethod::LeastSquares),
            "Ridge" => Ok(RegressionMethod::Ridge { alpha: 1.0 }),
            _ => Err(FairnessError::ParseString(
                s.to_string(),
                "RegressionMethod".to_string(),
                items_to_strings(vec!["LeastSquares", "Ridge"]),
            )),
        }
    }
}

impl RegressionMethod {
    fn penalty(&self) -> f64 {
        match self {
            RegressionMethod::LeastSquares => 0.0,
            RegressionMethod::Ridge { alpha } => *alpha,
        }
    }

    /// Fit a linear model of `y` on the given rows of `data`.
    ///
    /// * `data` - The feature matrix.
    /// * `y` - Targets, `y[k]` belongs to row `rows[k]`.
    /// * `rows` - Rows of `data` to fit on.
    pub fn fit(&self, data: &Matrix<f64>, y: &[f64], rows: &[usize]) -> Result<LinearModel, FairnessError> {
        if y.len() != rows.len() {
            return Err(FairnessError::RowMismatch("regression targets".to_string(), rows.len(), y.len()));
        }
        if rows.is_empty() {
            return Err(FairnessError::EmptyData);
        }
        let p = data.cols;
        let n = rows.len() as f64;

        let x_mean: Vec<f64> = (0..p)
            .map(|j| rows.iter().map(|r| data.get(*r, j)).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Centered normal equations, the intercept is recovered from the means.
        let mut gram = vec![vec![0.0; p]; p];
        let mut rhs = vec![0.0; p];
        for (k, r) in rows.iter().enumerate() {
            let centered: Vec<f64> = (0..p).map(|j| data.get(*r, j) - x_mean[j]).collect();
            let yc = y[k] - y_mean;
            for i in 0..p {
                rhs[i] += centered[i] * yc;
                for j in i..p {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }
        // Columns constant up to rounding carry no direction.
        for j in 0..p {
            let raw = rows.iter().map(|r| data.get(*r, j).powi(2)).sum::<f64>();
            if gram[j][j] <= raw * PIVOT_TOLERANCE {
                for i in 0..p {
                    gram[i][j] = 0.0;
                    gram[j][i] = 0.0;
                }
                rhs[j] = 0.0;
            }
        }
        let alpha = self.penalty();
        for i in 0..p {
            gram[i][i] += alpha;
            for j in 0..i {
                gram[i][j] = gram[j][i];
            }
        }

        let coef = solve_normal_equations(gram, rhs);
        let intercept = y_mean - coef.iter().zip(x_mean.iter()).map(|(c, m)| c * m).sum::<f64>();
        Ok(LinearModel { coef, intercept })
    }

    /// Fit a linear model of `y` on every row of `data`.
    pub fn fit_all(&self, data: &Matrix<f64>, y: &[f64]) -> Result<LinearModel, FairnessError> {
        if y.len() != data.rows {
            return Err(FairnessError::RowMismatch("regression targets".to_string(), data.rows, y.len()));
        }
        self.fit(data, y, &data.index)
    }
}

/// Solve the symmetric positive semi-definite system `a x = b` by elimination.
///
/// The system is equilibrated to a unit diagonal first, so the pivot test measures
/// collinearity independent of column units. Directions with a vanishing pivot
/// (collinear or constant columns) get a zero coefficient, which still yields a
/// least-squares solution.
fn solve_normal_equations(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let p = b.len();
    let scale: Vec<f64> = (0..p)
        .map(|i| if a[i][i] > 0.0 { a[i][i].sqrt() } else { 0.0 })
        .collect();
    for i in 0..p {
        for j in 0..p {
            a[i][j] = if scale[i] > 0.0 && scale[j] > 0.0 {
                a[i][j] / (scale[i] * scale[j])
            } else {
                0.0
            };
        }
        b[i] = if scale[i] > 0.0 { b[i] / scale[i] } else { 0.0 };
    }
    let tol = PIVOT_TOLERANCE;
    let mut active = vec![true; p];

    for k in 0..p {
        if a[k][k] <= tol {
            active[k] = false;
            continue;
        }
        for i in (k + 1)..p {
            let f = a[i][k] / a[k][k];
            if f == 0.0 {
                continue;
            }
            for j in k..p {
                a[i][j] -= f * a[k][j];
            }
            b[i] -= f * b[k];
        }
    }

    let mut x = vec![0.0; p];
    for k in (0..p).rev() {
        if !active[k] {
            continue;
        }
        let s: f64 = ((k + 1)..p).map(|j| a[k][j] * x[j]).sum();
        x[k] = (b[k] - s) / a[k][k];
    }
    x.iter()
        .zip(&scale)
        .map(|(v, s)| if *s > 0.0 { v / s } else { 0.0 })
        .collect()
}

/// Fitted linear scoring function `intercept + coef · x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub coef: Vec<f64>,
    pub intercept: f64,
}

impl Regressor for LinearModel {
    fn n_features(&self) -> usize {
        self.coef.len()
    }

    #[inline]
    fn score_row(&self, data: &Matrix<f64>, row: usize) -> f64 {
        self.coef
            .iter()
            .enumerate()
            .fold(self.intercept, |acc, (j, c)| acc + c * data.get(row, j))
    }

    fn coefficients(&self) -> Option<&[f64]> {
        Some(&self.coef)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_least_squares_exact_line() {
        // y = 2 + 3 * x0 - x1
        let data = vec![0.0, 1.0, 2.0, 3.0, 1.0, 0.0, 2.0, 5.0];
        let m = Matrix::new(&data, 4, 2);
        let y: Vec<f64> = (0..4).map(|i| 2.0 + 3.0 * m.get(i, 0) - m.get(i, 1)).collect();
        let model = RegressionMethod::LeastSquares.fit_all(&m, &y).unwrap();
        assert_close(model.intercept, 2.0);
        assert_close(model.coef[0], 3.0);
        assert_close(model.coef[1], -1.0);
        assert_close(model.score_row(&m, 3), y[3]);
    }

    #[test]
    fn test_zero_target_gives_zero_model() {
        let data = vec![0.3, 0.1, 0.7, 0.9, 0.2, 0.4];
        let m = Matrix::new(&data, 3, 2);
        let model = RegressionMethod::LeastSquares.fit_all(&m, &[0.0; 3]).unwrap();
        assert!(model.coef.iter().all(|c| *c == 0.0));
        assert_eq!(model.intercept, 0.0);
    }

    #[test]
    fn test_constant_column_is_dropped() {
        // Second column is constant, so it carries no information.
        let data = vec![0.0, 1.0, 2.0, 5.0, 5.0, 5.0];
        let m = Matrix::new(&data, 3, 2);
        let y = vec![1.0, 3.0, 5.0];
        let model = RegressionMethod::LeastSquares.fit_all(&m, &y).unwrap();
        assert_close(model.coef[0], 2.0);
        assert_eq!(model.coef[1], 0.0);
        assert_close(model.intercept, 1.0);
        assert!(model.coef.iter().all(|c| c.is_finite()));

        // Constant up to rounding of the column mean.
        let data = vec![0.0, 1.0, 2.0, 0.1, 0.1, 0.1];
        let m = Matrix::new(&data, 3, 2);
        let model = RegressionMethod::LeastSquares.fit_all(&m, &y).unwrap();
        assert_close(model.coef[0], 2.0);
        assert_eq!(model.coef[1], 0.0);
        assert_close(model.intercept, 1.0);
    }

    #[test]
    fn test_mixed_scale_columns() {
        // Income in dollars next to a fraction, the target depends on the fraction only.
        let income = [9_000.0, 25_000.0, 48_000.0, 61_000.0, 87_000.0, 120_000.0, 175_000.0, 230_000.0];
        let fraction = [0.0, 0.01, 0.05, 0.02, 0.06, 0.03, 0.015, 0.04];
        let data: Vec<f64> = income.iter().chain(fraction.iter()).cloned().collect();
        let m = Matrix::new(&data, 8, 2);
        let y: Vec<f64> = fraction.iter().map(|f| 1.0 - 10.0 * f).collect();
        let model = RegressionMethod::LeastSquares.fit_all(&m, &y).unwrap();
        assert!((model.coef[1] + 10.0).abs() < 1e-6, "{:?}", model.coef);
        assert!(model.coef[0].abs() < 1e-9);
        assert!((model.intercept - 1.0).abs() < 1e-6);
        for (i, target) in y.iter().enumerate() {
            assert!((model.score_row(&m, i) - target).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fit_on_row_subset() {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        let m = Matrix::new(&data, 4, 1);
        // Only rows 1 and 3, targets aligned with that order.
        let model = RegressionMethod::LeastSquares.fit(&m, &[1.0, 7.0], &[1, 3]).unwrap();
        assert_close(model.coef[0], 3.0);
        assert_close(model.intercept, -2.0);
        assert!(RegressionMethod::LeastSquares.fit(&m, &[1.0], &[1, 3]).is_err());
    }

    #[test]
    fn test_ridge_shrinks() {
        let data = vec![0.0, 1.0, 2.0, 3.0];
        let m = Matrix::new(&data, 4, 1);
        let y = vec![0.0, 1.0, 2.0, 3.0];
        let ols = RegressionMethod::LeastSquares.fit_all(&m, &y).unwrap();
        let ridge = RegressionMethod::Ridge { alpha: 5.0 }.fit_all(&m, &y).unwrap();
        assert!(ridge.coef[0].abs() < ols.coef[0].abs());
        // Sum of squares of centered x is 5, so the slope halves.
        assert_close(ridge.coef[0], 0.5);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!(
            "LeastSquares".parse::<RegressionMethod>().unwrap(),
            RegressionMethod::LeastSquares
        );
        assert_eq!(
            "Ridge".parse::<RegressionMethod>().unwrap(),
            RegressionMethod::Ridge { alpha: 1.0 }
        );
        assert!("Lasso".parse::<RegressionMethod>().is_err());
    }
}
