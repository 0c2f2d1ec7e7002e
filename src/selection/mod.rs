//! Information-theoretic selection of representative order parameters.
//!
//! This module picks a small subset of scalar time series that together
//! describe a larger candidate set with as little redundancy as possible.
//!
//! # Overview
//!
//! The pipeline has four stages:
//!
//! 1. **Metric** - [`InformationDistance`] scores two series as
//!    `1 - I(X;Y) / H(X,Y)` from equal-width histograms and memoizes results
//! 2. **Basis** - [`DissimilarityMatrix`] keeps a bounded set of the most
//!    mutually distant candidates seen in two insertion passes
//! 3. **Clustering** - [`MedoidClustering`] refines a seed set into medoids
//!    of all candidates
//! 4. **Model selection** - the jump method turns the distortion measured at
//!    every basis size into a representative count
//!
//! # Usage
//!
//! ```rust,ignore
//! use opselect::selection::{OrderParameterSelector, SelectorConfig};
//!
//! let selector = OrderParameterSelector::new(SelectorConfig::new(30))?;
//! let report = selector.select_with_report(&order_parameters)?;
//! for name in &report.selected {
//!     println!("{}", name);
//! }
//! ```

pub mod clustering;
pub mod config;
pub mod histogram;
pub mod jump;
pub mod matrix;
pub mod metric;
pub mod order_parameter;
pub mod selector;

// Re-export main types for convenience
pub use clustering::{distortion, group_assign, group_medoid, ClusterOutcome, MedoidClustering};
pub use config::{CacheKeyPolicy, SelectorConfig, DEFAULT_CAPACITY};
pub use jump::{choose_count, estimate_count, jump_estimates, DistortionPoint, JumpEstimate};
pub use matrix::{AddOutcome, DissimilarityMatrix};
pub use metric::{information_distance, CacheStats, DistanceCache, InformationDistance};
pub use order_parameter::OrderParameter;
pub use selector::{select_order_parameters, OrderParameterSelector, SelectionReport};
