//! The shared nearest neighbor index contract.

use crate::error::Result;

/// An incrementally built index over a metric space, supporting k-nearest-neighbor queries.
///
/// An index is a multiset: inserting the same point twice makes it retrievable twice.  Points are
/// never removed, and the index only grows.  Implementations take `&mut self` for [`insert`] and
/// `&self` for [`knn`], so the borrow checker enforces the single-writer/multi-reader discipline
/// the engines require; no internal synchronization is provided.
///
/// [`insert`]: NearestNeighborIndex::insert
/// [`knn`]: NearestNeighborIndex::knn
pub trait NearestNeighborIndex<T: Clone> {
    /// Add a point to the index.
    ///
    /// Fails only on precondition violations (see [`Error`](crate::error::Error)); engines without
    /// preconditions always return `Ok`.
    fn insert(&mut self, point: T) -> Result<()>;

    /// Return up to `k` points, nearest to `query` first.
    ///
    /// Returns fewer than `k` points if the index holds fewer; an empty index or `k == 0` yields
    /// an empty vector.  Ties are broken in an implementation-defined but deterministic order.
    fn knn(&self, query: &T, k: usize) -> Vec<T>;

    /// The number of points in the index.
    fn len(&self) -> usize;

    /// Check whether the index holds no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
