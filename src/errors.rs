//! Errors
//!
//! Custom error types used throughout the `gerryfair` crate.
use thiserror::Error;

/// Errors that can occur while running the fairness game.
#[derive(Debug, Error)]
pub enum FairnessError {
    /// The data holds no rows at all.
    #[error("The data set is empty, at least one row is required.")]
    EmptyData,
    /// No negative (y = 0) examples, false positive rates are undefined.
    #[error("No negative examples (y = 0) were found, false positive disparity is undefined.")]
    NoNegativeExamples,
    /// First value is the name of the matrix, second is expected rows, third is what was passed.
    #[error("Row count mismatch for {0}, expected {1} rows but {2} provided.")]
    RowMismatch(String, usize, usize),
    /// A label that is neither 0 nor 1, with the row it was found on.
    #[error("Label {0} at row {1} is not binary, labels must be 0 or 1.")]
    NonBinaryLabel(f64, usize),
    /// The cost vector does not have one entry per negative example.
    #[error("Cost vector has {1} entries, but there are {0} negative examples.")]
    CostLengthMismatch(usize, usize),
    /// Data passed for prediction has a different column count than the fitted model.
    #[error("Model was fit on {0} columns, but data with {1} columns was provided.")]
    DimensionMismatch(usize, usize),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Unable to write to file.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// Unable to read from file.
    #[error("Unable to read from file {0}")]
    UnableToRead(String),
    /// A visualization or plotting observer failed.
    #[error("Visualization failed: {0}")]
    Visualization(String),
}
