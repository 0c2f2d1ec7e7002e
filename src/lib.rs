//! opselect: information-theoretic order parameter selection.
//!
//! This library reads collective-variable trajectories, scores pairs with a
//! normalized mutual-information distance and picks a small set of
//! representative order parameters by k-medoids clustering and the jump
//! method.

pub mod cli;
pub mod colvar;
pub mod error;
pub mod selection;

// Re-export commonly used error types
pub use error::{ClusterError, ColvarError, ConfigError, MatrixError, MetricError, SelectionError};
