//! Error types for opselect operations.
//!
//! Defines error types for each subsystem:
//! - Information-distance computation
//! - Dissimilarity matrix maintenance
//! - Medoid clustering
//! - End-to-end order parameter selection
//! - COLVAR parsing and configuration loading

use thiserror::Error;

/// Errors that can occur while computing the information distance.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    #[error("Trajectory lengths differ: '{left}' has {left_len} samples, '{right}' has {right_len}")]
    LengthMismatch {
        left: String,
        right: String,
        left_len: usize,
        right_len: usize,
    },

    #[error("Order parameter '{0}' has an empty trajectory")]
    EmptyTrajectory(String),

    #[error("Order parameter '{name}' has a non-finite sample at index {index}")]
    NonFiniteSample { name: String, index: usize },

    #[error("Histogram bin count must be at least 1 (got {0})")]
    InvalidBins(usize),
}

/// Errors that can occur during dissimilarity matrix operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Cannot reduce an empty dissimilarity matrix")]
    Empty,

    #[error("Dissimilarity matrix capacity must be at least 1")]
    ZeroCapacity,

    #[error("Distance computation failed: {0}")]
    Metric(#[from] MetricError),
}

/// Errors that can occur during medoid clustering.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClusterError {
    #[error("At least one cluster center is required")]
    NoCenters,

    #[error("Cannot compute the medoid of an empty group")]
    EmptyGroup,

    #[error("Clustering did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("Distance computation failed: {0}")]
    Metric(#[from] MetricError),
}

/// Errors that can occur during order parameter selection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectionError {
    #[error("No candidate order parameters were supplied")]
    NoCandidates,

    #[error("Order parameter name '{0}' appears more than once")]
    DuplicateName(String),

    #[error("Invalid selector configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Metric(#[from] MetricError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Errors that can occur while reading a COLVAR file.
#[derive(Debug, Error)]
pub enum ColvarError {
    #[error("COLVAR input has no header line")]
    MissingHeader,

    #[error("COLVAR header declares no order parameter columns")]
    NoColumns,

    #[error("Column '{0}' is declared more than once in the COLVAR header")]
    DuplicateColumn(String),

    #[error("Line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while loading selector configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
