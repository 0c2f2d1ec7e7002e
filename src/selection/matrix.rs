//! Bounded dissimilarity matrix of mutually informative order parameters.
//!
//! The matrix keeps at most `capacity` members together with their pairwise
//! information distances. Once full, a new candidate only gets in by
//! replacing the member whose slot it would make more distinctive, so the
//! basis drifts toward the least redundant candidates seen so far.

use std::fmt;

use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use ordered_float::OrderedFloat;
use tracing::debug;

use crate::error::MatrixError;

use super::metric::InformationDistance;
use super::order_parameter::OrderParameter;

/// What happened to a candidate passed to [`DissimilarityMatrix::add`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The matrix had room and the candidate was appended.
    Appended,

    /// The candidate replaced the member in `slot`.
    Replaced {
        slot: usize,
        evicted: OrderParameter,
    },

    /// The matrix was full and no slot gained from the candidate.
    Discarded,

    /// A member with the same name is already held.
    AlreadyPresent,
}

/// Fixed-capacity set of order parameters with their pairwise distances.
///
/// Row and column `i` of the distance matrix always belong to `members()[i]`;
/// the diagonal holds self-distances and is never compared.
#[derive(Debug, Clone)]
pub struct DissimilarityMatrix {
    capacity: usize,
    members: Vec<OrderParameter>,
    distances: Array2<f64>,
}

impl DissimilarityMatrix {
    /// Creates an empty matrix holding at most `capacity` members.
    pub fn new(capacity: usize) -> Result<Self, MatrixError> {
        if capacity == 0 {
            return Err(MatrixError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            members: Vec::with_capacity(capacity),
            distances: Array2::zeros((0, 0)),
        })
    }

    /// Returns the maximum number of members.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the current number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the matrix holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if the matrix is at capacity.
    pub fn is_full(&self) -> bool {
        self.members.len() == self.capacity
    }

    /// Returns the members in slot order.
    pub fn members(&self) -> &[OrderParameter] {
        &self.members
    }

    /// Returns the member names in slot order.
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|op| op.name()).collect()
    }

    /// Returns a read-only view of the distance matrix.
    pub fn distances(&self) -> ArrayView2<'_, f64> {
        self.distances.view()
    }

    /// Product of the off-diagonal distances in row `slot`.
    ///
    /// Small values mark a member that is close to some other member and
    /// therefore adds little to the basis.
    pub fn informativeness(&self, slot: usize) -> f64 {
        self.distances
            .row(slot)
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != slot)
            .map(|(_, &d)| d)
            .product()
    }

    /// Offers a candidate to the matrix.
    pub fn add(
        &mut self,
        candidate: &OrderParameter,
        metric: &mut InformationDistance,
    ) -> Result<AddOutcome, MatrixError> {
        if self.members.contains(candidate) {
            return Ok(AddOutcome::AlreadyPresent);
        }

        if self.is_full() {
            self.try_replace(candidate, metric)
        } else {
            self.append(candidate, metric)?;
            Ok(AddOutcome::Appended)
        }
    }

    fn append(
        &mut self,
        candidate: &OrderParameter,
        metric: &mut InformationDistance,
    ) -> Result<(), MatrixError> {
        let row = self
            .members
            .iter()
            .map(|member| metric.distance(candidate, member))
            .collect::<Result<Vec<_>, _>>()?;
        let self_distance = metric.distance(candidate, candidate)?;

        let n = self.members.len();
        let mut grown = Array2::<f64>::zeros((n + 1, n + 1));
        grown.slice_mut(s![..n, ..n]).assign(&self.distances);
        for (i, &d) in row.iter().enumerate() {
            grown[[i, n]] = d;
            grown[[n, i]] = d;
        }
        grown[[n, n]] = self_distance;

        self.distances = grown;
        self.members.push(candidate.clone());
        Ok(())
    }

    fn try_replace(
        &mut self,
        candidate: &OrderParameter,
        metric: &mut InformationDistance,
    ) -> Result<AddOutcome, MatrixError> {
        let mut row = self
            .members
            .iter()
            .map(|member| metric.distance(member, candidate))
            .collect::<Result<Vec<_>, _>>()?;

        // Other pairwise distances are held fixed: each slot is scored as if
        // only its own row and column changed.
        let mut best: Option<(usize, f64)> = None;
        for slot in 0..self.members.len() {
            let existing = self.informativeness(slot);
            let proposed: f64 = row
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != slot)
                .map(|(_, &d)| d)
                .product();
            let gain = proposed - existing;
            if gain > 0.0 && best.map_or(true, |(_, g)| gain > g) {
                best = Some((slot, gain));
            }
        }

        let Some((slot, gain)) = best else {
            return Ok(AddOutcome::Discarded);
        };

        row[slot] = metric.distance(candidate, candidate)?;
        let row = Array1::from(row);
        self.distances.row_mut(slot).assign(&row);
        self.distances.column_mut(slot).assign(&row);
        let evicted = std::mem::replace(&mut self.members[slot], candidate.clone());

        debug!(
            slot,
            gain,
            added = candidate.name(),
            evicted = evicted.name(),
            "replaced dissimilarity matrix member"
        );

        Ok(AddOutcome::Replaced { slot, evicted })
    }

    /// Removes the least distinguishing member and returns it.
    ///
    /// The removed member is the one with the smallest off-diagonal distance
    /// product; ties go to the earliest slot.
    pub fn reduce(&mut self) -> Result<OrderParameter, MatrixError> {
        let slot = (0..self.members.len())
            .min_by_key(|&i| OrderedFloat(self.informativeness(i)))
            .ok_or(MatrixError::Empty)?;

        let keep: Vec<usize> = (0..self.members.len()).filter(|&i| i != slot).collect();
        self.distances = self
            .distances
            .select(Axis(0), &keep)
            .select(Axis(1), &keep);
        let removed = self.members.remove(slot);

        debug!(slot, removed = removed.name(), remaining = self.len(), "reduced dissimilarity matrix");
        Ok(removed)
    }

    /// Reduces until at most `count` members remain, returning the removed members in order.
    pub fn reduce_to(&mut self, count: usize) -> Result<Vec<OrderParameter>, MatrixError> {
        let mut removed = Vec::new();
        while self.members.len() > count {
            removed.push(self.reduce()?);
        }
        Ok(removed)
    }
}

impl fmt::Display for DissimilarityMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Members:")?;
        for member in &self.members {
            writeln!(f, "{}", member)?;
        }
        writeln!(f)?;
        writeln!(f, "Matrix:")?;
        for row in self.distances.rows() {
            let cells: Vec<String> = row.iter().map(|d| format!("{:.6}", d)).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
