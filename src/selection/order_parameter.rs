//! Named scalar trajectories, the unit of comparison.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A named scalar time series.
///
/// Identity is the name alone: two order parameters with the same name are
/// interchangeable regardless of their samples, so callers must keep names
/// unique within a run. The trajectory is reference-counted, which makes
/// clones cheap enough to hand around in center sets and matrix snapshots.
#[derive(Debug, Clone)]
pub struct OrderParameter {
    name: String,
    trajectory: Arc<[f64]>,
}

impl OrderParameter {
    /// Creates an order parameter from a name and its samples.
    pub fn new(name: impl Into<String>, trajectory: impl Into<Arc<[f64]>>) -> Self {
        Self {
            name: name.into(),
            trajectory: trajectory.into(),
        }
    }

    /// Returns the unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the samples.
    pub fn trajectory(&self) -> &[f64] {
        &self.trajectory
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.trajectory.len()
    }

    /// Returns true if the trajectory has no samples.
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }
}

impl PartialEq for OrderParameter {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for OrderParameter {}

impl Hash for OrderParameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for OrderParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
