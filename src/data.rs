//! Data
//!
//! Containers for the feature matrix, the protected attributes and the labels the
//! fairness game runs over, plus a seeded synthetic data source.
use crate::errors::FairnessError;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Contiguous Column Major Matrix data container.
///
/// This structure holds a dense matrix of values in a single contiguous memory block,
/// in column-major order (Fortran-style).
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f32`, `f64`).
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
        }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.item_index(i, j)]
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        i + j * self.rows
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        let start = self.item_index(0, col);
        &self.data[start..start + self.rows]
    }

    /// A view over the first `cols` columns, sharing the same buffer.
    pub fn leading_columns(&self, cols: usize) -> Matrix<'a, T> {
        let cols = cols.min(self.cols);
        Matrix::new(&self.data[..self.rows * cols], self.rows, cols)
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        (0..self.cols).map(|j| *self.get(row, j)).collect()
    }
}

/// Mapping from a negative-example position (k-th row with y = 0) to its row in the data.
///
/// Cost vectors and the auditor's group predictions are indexed by the negative
/// position, predictions over the full data by row. Every translation goes through here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegativeIndex {
    rows: Vec<usize>,
    n: usize,
}

impl NegativeIndex {
    /// Build the mapping from a label vector.
    pub fn from_labels(y: &[f64]) -> Self {
        let rows = y
            .iter()
            .enumerate()
            .filter_map(|(i, v)| if *v == 0.0 { Some(i) } else { None })
            .collect();
        NegativeIndex { rows, n: y.len() }
    }

    /// Number of negative examples, `m`.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows in the full data, `n`.
    pub fn population(&self) -> usize {
        self.n
    }

    /// Original row of every negative example, in row order.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Restrict a per-row vector to the negative examples.
    pub fn gather<T: Copy>(&self, values: &[T]) -> Vec<T> {
        self.rows.iter().map(|r| values[*r]).collect()
    }
}

/// Borrowed, validated view of one fairness problem: features, protected attributes
/// and binary labels, all row aligned.
pub struct Dataset<'a> {
    /// Features the learner fits on.
    pub x: Matrix<'a, f64>,
    /// Protected attributes the auditor searches subgroups over.
    pub x_prime: Matrix<'a, f64>,
    /// Binary labels.
    pub y: &'a [f64],
    negatives: NegativeIndex,
}

impl<'a> Dataset<'a> {
    /// Validate and wrap the three aligned inputs.
    ///
    /// Fails if the data is empty, if the row counts of `x`, `x_prime` and `y` differ,
    /// if a label is not 0 or 1, or if there are no negative examples.
    pub fn new(x: Matrix<'a, f64>, x_prime: Matrix<'a, f64>, y: &'a [f64]) -> Result<Self, FairnessError> {
        let n = x.rows;
        if n == 0 {
            return Err(FairnessError::EmptyData);
        }
        if x_prime.rows != n {
            return Err(FairnessError::RowMismatch("protected attributes".to_string(), n, x_prime.rows));
        }
        if y.len() != n {
            return Err(FairnessError::RowMismatch("labels".to_string(), n, y.len()));
        }
        if let Some((i, v)) = y.iter().enumerate().find(|(_, v)| **v != 0.0 && **v != 1.0) {
            return Err(FairnessError::NonBinaryLabel(*v, i));
        }
        let negatives = NegativeIndex::from_labels(y);
        if negatives.is_empty() {
            return Err(FairnessError::NoNegativeExamples);
        }
        Ok(Dataset {
            x,
            x_prime,
            y,
            negatives,
        })
    }

    /// Number of rows, `n`.
    pub fn rows(&self) -> usize {
        self.x.rows
    }

    pub fn negatives(&self) -> &NegativeIndex {
        &self.negatives
    }
}

/// Owned column-major buffers for a fairness problem, as produced by a [`DataLoader`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedDataset {
    pub x: Vec<f64>,
    pub x_prime: Vec<f64>,
    pub y: Vec<f64>,
    pub n_features: usize,
    pub n_protected: usize,
}

impl OwnedDataset {
    pub fn rows(&self) -> usize {
        self.y.len()
    }

    /// Borrow the buffers as a validated [`Dataset`].
    pub fn view(&self) -> Result<Dataset<'_>, FairnessError> {
        let n = self.rows();
        if self.x.len() != n * self.n_features {
            return Err(FairnessError::RowMismatch(
                "features".to_string(),
                n,
                self.x.len() / self.n_features.max(1),
            ));
        }
        if self.x_prime.len() != n * self.n_protected {
            return Err(FairnessError::RowMismatch(
                "protected attributes".to_string(),
                n,
                self.x_prime.len() / self.n_protected.max(1),
            ));
        }
        Dataset::new(
            Matrix::new(&self.x, n, self.n_features),
            Matrix::new(&self.x_prime, n, self.n_protected),
            &self.y,
        )
    }
}

/// Source of fairness problems, consumed once when a run starts.
pub trait DataLoader {
    /// Load the named data set as `(X, X', y)`.
    fn get_data(&self, dataset: &str) -> Result<OwnedDataset, FairnessError>;
}

/// Generate a seeded synthetic problem.
///
/// Features are uniform on `[0, 1)`, the protected attributes are copies of the first
/// `n_protected` feature columns, and exactly `n_positive` rows are labelled 1: the rows
/// with the highest noisy linear score.
///
/// * `n_rows` - Number of examples.
/// * `n_features` - Number of feature columns, at least `n_protected`.
/// * `n_protected` - Number of protected attribute columns.
/// * `n_positive` - Number of rows labelled 1.
/// * `seed` - Seed for the random number generator.
pub fn generate_synthetic(
    n_rows: usize,
    n_features: usize,
    n_protected: usize,
    n_positive: usize,
    seed: u64,
) -> Result<OwnedDataset, FairnessError> {
    if n_protected > n_features {
        return Err(FairnessError::InvalidParameter(
            "n_protected".to_string(),
            format!("at most n_features ({})", n_features),
            n_protected.to_string(),
        ));
    }
    if n_positive > n_rows {
        return Err(FairnessError::InvalidParameter(
            "n_positive".to_string(),
            format!("at most n_rows ({})", n_rows),
            n_positive.to_string(),
        ));
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let x: Vec<f64> = (0..n_rows * n_features).map(|_| rng.gen::<f64>()).collect();
    let weights: Vec<f64> = (0..n_features).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let scores: Vec<f64> = (0..n_rows)
        .map(|i| {
            let linear: f64 = weights.iter().enumerate().map(|(j, w)| w * x[i + j * n_rows]).sum();
            linear + rng.gen_range(-0.25..0.25)
        })
        .collect();

    let mut order: Vec<usize> = (0..n_rows).collect();
    order.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
    let mut y = vec![0.0; n_rows];
    for i in order.iter().take(n_positive) {
        y[*i] = 1.0;
    }

    let x_prime = x[..n_rows * n_protected].to_vec();
    Ok(OwnedDataset {
        x,
        x_prime,
        y,
        n_features,
        n_protected,
    })
}

/// [`DataLoader`] serving seeded synthetic problems under the name `"synthetic"`.
#[derive(Debug, Clone)]
pub struct SyntheticLoader {
    pub n_rows: usize,
    pub n_features: usize,
    pub n_protected: usize,
    pub n_positive: usize,
    pub seed: u64,
}

impl DataLoader for SyntheticLoader {
    fn get_data(&self, dataset: &str) -> Result<OwnedDataset, FairnessError> {
        match dataset {
            "synthetic" => generate_synthetic(
                self.n_rows,
                self.n_features,
                self.n_protected,
                self.n_positive,
                self.seed,
            ),
            _ => Err(FairnessError::ParseString(
                dataset.to_string(),
                "dataset".to_string(),
                "synthetic".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_access() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let m = Matrix::new(&data, 3, 2);
        assert_eq!(*m.get(0, 0), 1.0);
        assert_eq!(*m.get(2, 1), 6.0);
        assert_eq!(m.get_row(1), vec![2.0, 5.0]);
        assert_eq!(m.get_col(1), &[4.0, 5.0, 6.0]);
        let first = m.leading_columns(1);
        assert_eq!(first.cols, 1);
        assert_eq!(first.get_col(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_negative_index() {
        let y = vec![1.0, 0.0, 0.0, 1.0, 0.0];
        let neg = NegativeIndex::from_labels(&y);
        assert_eq!(neg.len(), 3);
        assert_eq!(neg.population(), 5);
        assert_eq!(neg.rows(), &[1, 2, 4]);
        assert_eq!(neg.gather(&[10, 11, 12, 13, 14]), vec![11, 12, 14]);
    }

    #[test]
    fn test_dataset_preconditions() {
        let x = vec![0.1, 0.2, 0.3];
        let xp = vec![1.0, 0.0];
        let y = vec![0.0, 1.0, 0.0];
        let err = Dataset::new(Matrix::new(&x, 3, 1), Matrix::new(&xp, 2, 1), &y);
        assert!(matches!(err, Err(FairnessError::RowMismatch(_, 3, 2))));

        let xp = vec![1.0, 0.0, 1.0];
        let y_short = vec![0.0, 1.0];
        let err = Dataset::new(Matrix::new(&x, 3, 1), Matrix::new(&xp, 3, 1), &y_short);
        assert!(matches!(err, Err(FairnessError::RowMismatch(_, 3, 2))));

        let y_all_pos = vec![1.0, 1.0, 1.0];
        let err = Dataset::new(Matrix::new(&x, 3, 1), Matrix::new(&xp, 3, 1), &y_all_pos);
        assert!(matches!(err, Err(FairnessError::NoNegativeExamples)));

        let y_bad = vec![0.0, 0.5, 1.0];
        let err = Dataset::new(Matrix::new(&x, 3, 1), Matrix::new(&xp, 3, 1), &y_bad);
        assert!(matches!(err, Err(FairnessError::NonBinaryLabel(_, 1))));

        let ok = Dataset::new(Matrix::new(&x, 3, 1), Matrix::new(&xp, 3, 1), &y).unwrap();
        assert_eq!(ok.rows(), 3);
        assert_eq!(ok.negatives().rows(), &[0, 2]);
    }

    #[test]
    fn test_synthetic_split() {
        let d = generate_synthetic(20, 3, 2, 8, 0).unwrap();
        assert_eq!(d.rows(), 20);
        assert_eq!(d.y.iter().filter(|v| **v == 1.0).count(), 8);
        assert_eq!(&d.x_prime[..], &d.x[..40]);
        let view = d.view().unwrap();
        assert_eq!(view.negatives().len(), 12);

        // Same seed, same data.
        let d2 = generate_synthetic(20, 3, 2, 8, 0).unwrap();
        assert_eq!(d.x, d2.x);
        assert_eq!(d.y, d2.y);
    }

    #[test]
    fn test_synthetic_loader() {
        let loader = SyntheticLoader {
            n_rows: 10,
            n_features: 2,
            n_protected: 1,
            n_positive: 4,
            seed: 3,
        };
        assert_eq!(loader.get_data("synthetic").unwrap().rows(), 10);
        assert!(matches!(loader.get_data("adult"), Err(FairnessError::ParseString(..))));
    }
}
