//! [k-d trees](https://en.wikipedia.org/wiki/K-d_tree) with bucketed leaves.
//!
//! Unlike a classical k-d tree that splits at point medians, this engine partitions a fixed
//! bounding extent: leaves buffer points until they hold [`CHILDREN_LIMIT`] of them, then split
//! their box exactly in half along the axis of greatest extent.  The extent must be configured
//! once, before the first insertion.

use crate::coords::{CoordinateMetric, CoordinateProximity, Coordinates, FromCoords};
use crate::distance::{Metric, Proximity};
use crate::error::{Error, Result};
use crate::knn::NearestNeighborIndex;
use crate::util::Ordered;

use num_traits::{One, Signed, Zero};

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

/// Maximum number of points a leaf buffers before it splits.
pub const CHILDREN_LIMIT: usize = 20;

/// Marker trait for point types usable in a [`KdTree`].
///
/// A k-d point needs indexable coordinates, must be constructible from raw coordinates (for box
/// centers), and must measure distances both to other points and to coordinate slices, with a
/// single consistent metric.
pub trait KdPoint
where
    Self: Coordinates + FromCoords,
    Self: Metric,
    Self: CoordinateProximity<<Self as Coordinates>::Value, Distance = <Self as Proximity>::Distance>,
    Self: CoordinateMetric<<Self as Coordinates>::Value>,
{
}

/// Blanket [KdPoint] implementation.
impl<T> KdPoint for T
where
    T: Coordinates + FromCoords,
    T: Metric,
    T: CoordinateProximity<<T as Coordinates>::Value, Distance = <T as Proximity>::Distance>,
    T: CoordinateMetric<<T as Coordinates>::Value>,
{
}

/// A node in a k-d tree: a leaf with a bucket of points, or, once split, an internal node with
/// exactly two children whose boxes halve this node's box along `dimension`.
struct KdNode<T: Coordinates> {
    /// Split axis; meaningful only once the node has split.
    dimension: usize,
    /// The center of this node's box, as a point.
    middle: T,
    minpoint: Vec<T::Value>,
    maxpoint: Vec<T::Value>,
    /// Points buffered in this leaf; drained on split.
    bucket: Vec<T>,
    left: Option<Box<KdNode<T>>>,
    right: Option<Box<KdNode<T>>>,
}

impl<T: KdPoint> KdNode<T> {
    fn new(minpoint: Vec<T::Value>, maxpoint: Vec<T::Value>) -> Self {
        let two = T::Value::one() + T::Value::one();
        let center: Vec<T::Value> = minpoint
            .iter()
            .zip(&maxpoint)
            .map(|(&lo, &hi)| (lo + hi) / two)
            .collect();

        Self {
            dimension: 0,
            middle: T::from_coords(&center),
            minpoint,
            maxpoint,
            bucket: Vec::new(),
            left: None,
            right: None,
        }
    }

    /// A node is a leaf iff it has no child nodes; children are always created in pairs.
    fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    fn add_point(&mut self, point: T) {
        if self.is_leaf() {
            self.bucket.push(point);
            if self.bucket.len() >= CHILDREN_LIMIT {
                self.split();
            }
        } else {
            self.route(point);
        }
    }

    /// Send a point to the child on its side of the split plane.
    fn route(&mut self, point: T) {
        let side = if point.coord(self.dimension) < self.middle.coord(self.dimension) {
            &mut self.left
        } else {
            &mut self.right
        };
        // Both children exist once the node has split.
        if let Some(child) = side {
            child.add_point(point);
        }
    }

    /// Split this leaf in half along the axis of greatest extent and redistribute the bucket.
    fn split(&mut self) {
        let dimension = self.widest_dimension();
        if (self.maxpoint[dimension] - self.minpoint[dimension]).is_zero() {
            // Degenerate box; nothing can be separated, so let the bucket grow.
            return;
        }

        let two = T::Value::one() + T::Value::one();
        let cut = (self.minpoint[dimension] + self.maxpoint[dimension]) / two;

        let mut left_max = self.maxpoint.clone();
        left_max[dimension] = cut;
        let mut right_min = self.minpoint.clone();
        right_min[dimension] = cut;

        self.dimension = dimension;
        self.left = Some(Box::new(KdNode::new(self.minpoint.clone(), left_max)));
        self.right = Some(Box::new(KdNode::new(right_min, self.maxpoint.clone())));

        for point in std::mem::take(&mut self.bucket) {
            self.route(point);
        }
    }

    fn widest_dimension(&self) -> usize {
        let mut best = 0;
        let mut widest = T::Value::zero();
        for i in 0..self.minpoint.len() {
            let extent = (self.maxpoint[i] - self.minpoint[i]).abs();
            if extent > widest {
                widest = extent;
                best = i;
            }
        }
        best
    }
}

/// Shorthand for a k-d point's distance type.
type Dist<T> = <T as Proximity>::Distance;

/// A pending node in the best-first search queue, keyed by the distance from the query to the
/// node's box center.
struct Visit<'a, T: KdPoint> {
    dist: Dist<T>,
    node: &'a KdNode<T>,
}

impl<T: KdPoint> PartialEq for Visit<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        Ordered::new(self.dist) == Ordered::new(other.dist)
    }
}

impl<T: KdPoint> Eq for Visit<'_, T> {}

impl<T: KdPoint> PartialOrd for Visit<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: KdPoint> Ord for Visit<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        Ordered::new(self.dist).cmp(&Ordered::new(other.dist))
    }
}

/// A [k-d tree](https://en.wikipedia.org/wiki/K-d_tree) over a fixed bounding extent.
///
/// The extent must be configured with [`set_extent`](KdTree::set_extent) before the first
/// insertion and is locked afterwards.
pub struct KdTree<T: Coordinates> {
    root: Option<KdNode<T>>,
    extent: Option<(Vec<T::Value>, Vec<T::Value>)>,
    len: usize,
}

impl<T: KdPoint> KdTree<T> {
    /// Create an empty tree with no extent configured.
    pub fn new() -> Self {
        Self {
            root: None,
            extent: None,
            len: 0,
        }
    }

    /// Create an empty tree spanning the box between `minpoint` and `maxpoint`.
    pub fn with_extent(minpoint: &T, maxpoint: &T) -> Result<Self> {
        let mut tree = Self::new();
        tree.set_extent(minpoint, maxpoint)?;
        Ok(tree)
    }

    /// Fix the bounding extent of the tree.
    ///
    /// Must be called before the first insertion; once a point has been inserted the extent is
    /// locked and this returns [`Error::ExtentLocked`].
    pub fn set_extent(&mut self, minpoint: &T, maxpoint: &T) -> Result<()> {
        if self.len > 0 {
            return Err(Error::ExtentLocked);
        }
        if minpoint.dims() != maxpoint.dims() {
            return Err(Error::DimensionMismatch {
                point: maxpoint.dims(),
                extent: minpoint.dims(),
            });
        }

        self.extent = Some((minpoint.as_vec(), maxpoint.as_vec()));
        self.root = None;
        Ok(())
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add a point to the tree.
    ///
    /// Fails with [`Error::ExtentNotSet`] if no extent is configured, or
    /// [`Error::DimensionMismatch`] if the point's dimensionality disagrees with it.
    pub fn push(&mut self, point: T) -> Result<()> {
        let Some((minpoint, maxpoint)) = &self.extent else {
            return Err(Error::ExtentNotSet);
        };
        if point.dims() != minpoint.len() {
            return Err(Error::DimensionMismatch {
                point: point.dims(),
                extent: minpoint.len(),
            });
        }

        let root = self
            .root
            .get_or_insert_with(|| KdNode::new(minpoint.clone(), maxpoint.clone()));
        root.add_point(point);
        self.len += 1;
        Ok(())
    }

    /// Return up to `k` points, nearest to `query` first.
    ///
    /// Best-first search: internal nodes are visited in order of distance from the query to their
    /// box centers, and a box is skipped once it provably cannot contain a point closer than the
    /// current k-th best.
    pub fn knn(&self, query: &T, k: usize) -> Vec<T>
    where
        T: Clone,
    {
        let Some(root) = &self.root else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        let mut pending = BinaryHeap::new();
        pending.push(Reverse(Visit {
            dist: query.distance(&root.middle),
            node: root,
        }));

        let mut found: Vec<(Dist<T>, &T)> = Vec::new();
        while let Some(Reverse(visit)) = pending.pop() {
            // Keep the pool trimmed to k so the pruning bound tracks the true k-th best.
            found.sort_by_key(|&(d, _)| Ordered::new(d));
            found.truncate(k);

            let node = visit.node;
            if found.len() == k {
                let kth = found[k - 1].0;
                // Everything inside the box lies within d(middle, maxpoint) of its center, so
                // by the triangle inequality nothing in it can beat the k-th best.
                if visit.dist - node.middle.distance_to_coords(&node.maxpoint) > kth {
                    continue;
                }
            }

            if node.is_leaf() {
                for point in &node.bucket {
                    found.push((query.distance(point), point));
                }
            } else {
                if let Some(left) = node.left.as_deref() {
                    pending.push(Reverse(Visit {
                        dist: query.distance(&left.middle),
                        node: left,
                    }));
                }
                if let Some(right) = node.right.as_deref() {
                    pending.push(Reverse(Visit {
                        dist: query.distance(&right.middle),
                        node: right,
                    }));
                }
            }
        }

        found.sort_by_key(|&(d, _)| Ordered::new(d));
        found.truncate(k);
        found.into_iter().map(|(_, p)| p.clone()).collect()
    }
}

impl<T: Coordinates> fmt::Debug for KdTree<T>
where
    T::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KdTree")
            .field("extent", &self.extent)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<T: KdPoint> Default for KdTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: KdPoint + Clone> NearestNeighborIndex<T> for KdTree<T> {
    fn insert(&mut self, point: T) -> Result<()> {
        self.push(point)
    }

    fn knn(&self, query: &T, k: usize) -> Vec<T> {
        KdTree::knn(self, query, k)
    }

    fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::euclid::Euclidean;
    use crate::tests::{random_points, test_knn_oracle, test_scenario, EXTENT};

    type Point = Euclidean<[f64; 2]>;

    fn extent_tree() -> KdTree<Point> {
        let (lo, hi) = EXTENT;
        KdTree::with_extent(&Euclidean(lo), &Euclidean(hi)).unwrap()
    }

    #[test]
    fn test_extent_preconditions() {
        let mut tree: KdTree<Point> = KdTree::new();
        assert_eq!(tree.push(Euclidean([0.0, 0.0])), Err(Error::ExtentNotSet));

        tree.set_extent(&Euclidean([-1.0, -1.0]), &Euclidean([1.0, 1.0]))
            .unwrap();
        // Reconfiguring before any insertion is still allowed.
        tree.set_extent(&Euclidean([-2.0, -2.0]), &Euclidean([2.0, 2.0]))
            .unwrap();

        tree.push(Euclidean([0.5, 0.5])).unwrap();
        assert_eq!(
            tree.set_extent(&Euclidean([-4.0, -4.0]), &Euclidean([4.0, 4.0])),
            Err(Error::ExtentLocked)
        );
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut tree: KdTree<Euclidean<Vec<f64>>> = KdTree::new();
        tree.set_extent(
            &Euclidean(vec![-1.0, -1.0]),
            &Euclidean(vec![1.0, 1.0]),
        )
        .unwrap();

        assert_eq!(
            tree.push(Euclidean(vec![0.0, 0.0, 0.0])),
            Err(Error::DimensionMismatch { point: 3, extent: 2 })
        );
    }

    #[test]
    fn test_empty() {
        let tree = extent_tree();
        assert!(tree.is_empty());
        assert!(tree.knn(&Euclidean([0.0, 0.0]), 5).is_empty());
    }

    #[test]
    fn test_scenario_kd() {
        test_scenario(extent_tree);
    }

    #[test]
    fn test_oracle_kd() {
        test_knn_oracle(extent_tree);
    }

    #[test]
    fn test_multiset() {
        let mut tree = extent_tree();
        for _ in 0..3 {
            tree.push(Euclidean([1.0, 2.0])).unwrap();
        }
        tree.push(Euclidean([9.0, 9.0])).unwrap();

        assert_eq!(tree.len(), 4);
        let found = tree.knn(&Euclidean([0.0, 0.0]), 3);
        assert_eq!(found, vec![Euclidean([1.0, 2.0]); 3]);
    }

    /// Walk the tree and check the structural invariants: bucket sizes stay bounded, internal
    /// nodes have drained buckets, and child boxes exactly halve their parent's box along the
    /// split dimension.
    fn assert_structure(node: &KdNode<Point>) {
        if node.is_leaf() {
            assert!(node.bucket.len() <= CHILDREN_LIMIT);
            return;
        }

        assert!(node.bucket.is_empty());
        let dim = node.dimension;
        let cut = (node.minpoint[dim] + node.maxpoint[dim]) / 2.0;

        let (left, right) = (node.left.as_ref().unwrap(), node.right.as_ref().unwrap());
        assert_eq!(left.minpoint, node.minpoint);
        assert_eq!(right.maxpoint, node.maxpoint);
        assert_eq!(left.maxpoint[dim], cut);
        assert_eq!(right.minpoint[dim], cut);
        for i in 0..node.minpoint.len() {
            if i != dim {
                assert_eq!(left.maxpoint[i], node.maxpoint[i]);
                assert_eq!(right.minpoint[i], node.minpoint[i]);
            }
        }

        assert_structure(left);
        assert_structure(right);
    }

    #[test]
    fn test_structure_invariants() {
        let mut tree = extent_tree();
        for p in random_points(11, 500) {
            tree.push(p).unwrap();
        }

        assert_eq!(tree.len(), 500);
        assert_structure(tree.root.as_ref().unwrap());
    }
}
