//! Exhaustive nearest neighbor search.

use crate::distance::Proximity;
use crate::error::Result;
use crate::knn::NearestNeighborIndex;
use crate::util::Ordered;

use std::iter::FromIterator;

/// A [`NearestNeighborIndex`] that does brute-force search.
///
/// Every query scans every point, so this is only reasonable for small sets — and as the oracle
/// the tree engines are tested against.
#[derive(Clone, Debug)]
pub struct ExhaustiveSearch<T>(Vec<T>);

impl<T> ExhaustiveSearch<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a new point to the index.
    pub fn push(&mut self, point: T) {
        self.0.push(point);
    }

    /// Get the size of this index.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this index is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for ExhaustiveSearch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for ExhaustiveSearch<T> {
    fn from_iter<I: IntoIterator<Item = T>>(points: I) -> Self {
        Self(points.into_iter().collect())
    }
}

impl<T> IntoIterator for ExhaustiveSearch<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T> Extend<T> for ExhaustiveSearch<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, points: I) {
        for point in points {
            self.push(point);
        }
    }
}

impl<T: Proximity + Clone> NearestNeighborIndex<T> for ExhaustiveSearch<T> {
    fn insert(&mut self, point: T) -> Result<()> {
        self.push(point);
        Ok(())
    }

    fn knn(&self, query: &T, k: usize) -> Vec<T> {
        let mut scored: Vec<_> = self
            .0
            .iter()
            .map(|p| (query.distance(p), p))
            .collect();
        scored.sort_by_key(|&(d, _)| Ordered::new(d));
        scored.truncate(k);
        scored.into_iter().map(|(_, p)| p.clone()).collect()
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::euclid::Euclidean;

    #[test]
    fn test_knn() {
        let index: ExhaustiveSearch<_> = [[2.0, 0.0], [1.0, 0.0], [4.0, 0.0], [3.0, 0.0]]
            .into_iter()
            .map(Euclidean)
            .collect();

        let found = index.knn(&Euclidean([0.0, 0.0]), 3);
        assert_eq!(
            found,
            vec![
                Euclidean([1.0, 0.0]),
                Euclidean([2.0, 0.0]),
                Euclidean([3.0, 0.0])
            ]
        );

        assert!(index.knn(&Euclidean([0.0, 0.0]), 0).is_empty());
        assert_eq!(index.knn(&Euclidean([0.0, 0.0]), 10).len(), 4);
    }
}
