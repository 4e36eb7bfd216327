//! [Cover trees](https://en.wikipedia.org/wiki/Cover_tree).
//!
//! A cover tree indexes a metric space using nothing but pairwise distances.  Every node sits at
//! an integer *level*: a child attached at level `l` lies within `2^l` of its parent but beyond
//! `2^(l-1)`, so each level halves the scale at which points are separated.  The variant
//! implemented here maintains only this separation-and-covering invariant — a point present at
//! one level is not repeated at the levels below it — which keeps insertion simple at the cost of
//! the textbook worst-case search bounds.

use crate::distance::Metric;
use crate::error::Result;
use crate::knn::NearestNeighborIndex;
use crate::util::Ordered;

use num_traits::{Float, Zero};

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::{self, Write};
use std::iter::FromIterator;

/// `2^level` as a distance value.
fn scale<D: Float>(level: i32) -> D {
    (D::one() + D::one()).powi(level)
}

/// A node in a cover tree.
///
/// Nodes live in the tree's arena and refer to each other by index, so traversal working sets
/// never alias an owning handle.
#[derive(Debug)]
struct CoverNode<T> {
    /// The point this node carries.
    item: T,
    /// Children keyed by attachment level.
    children: BTreeMap<i32, Vec<usize>>,
}

/// A [cover tree](https://en.wikipedia.org/wiki/Cover_tree).
///
/// The primary engine of this crate: supports any [`Metric`] point type, with no coordinate
/// access required.  Distance values must be [`Float`] so that the per-level radii `2^level` can
/// be computed for negative levels.
#[derive(Debug)]
pub struct CoverTree<T> {
    nodes: Vec<CoverNode<T>>,
    root: Option<usize>,
    /// Highest level in use; grows when a point falls outside the root's covering radius.
    max_level: i32,
    /// Lowest level at which any child is attached; `None` until the first attachment.
    min_level: Option<i32>,
}

impl<T> CoverTree<T>
where
    T: Metric,
    T::Distance: Float,
{
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            max_level: 0,
            min_level: None,
        }
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The highest level in use.  `2^max_level` bounds the distance from the root to any point
    /// attached directly beneath it.
    pub fn max_level(&self) -> i32 {
        self.max_level
    }

    /// The lowest level at which any child is attached.  A tree without attachments reports its
    /// `max_level`.
    pub fn min_level(&self) -> i32 {
        self.min_level.unwrap_or(self.max_level)
    }

    /// Add a point to the tree.
    ///
    /// Insertion cannot fail: a point outside the current covering radius widens the radius by
    /// doubling until the point fits, so arbitrarily distant points are always admitted.
    pub fn push(&mut self, item: T) {
        let Some(root) = self.root else {
            self.root = Some(self.alloc(item));
            return;
        };

        loop {
            match self.place(&item, root) {
                Some((parent, level)) => {
                    let child = self.alloc(item);
                    self.nodes[parent].children.entry(level).or_default().push(child);
                    self.min_level = Some(self.min_level.map_or(level, |m| m.min(level)));
                    return;
                }
                // Outside the covering radius; widen it and retry.
                None => self.max_level += 1,
            }
        }
    }

    /// Find the parent and level at which `item` attaches, or `None` if the current covering
    /// radius cannot absorb it.
    ///
    /// Walks levels downward carrying a candidate set of `(distance, node)` pairs, per the
    /// cover tree insertion rule: descend while some candidate could still cover the point one
    /// level deeper, attach as soon as the point lands in a level's separation band.
    fn place(&self, item: &T, root: usize) -> Option<(usize, i32)> {
        let mut level = self.max_level;
        let mut pool = vec![(item.distance(&self.nodes[root].item), root)];

        loop {
            let mut min_dist = pool[0].0;
            let mut nearest = pool[0].1;
            for &(d, ix) in &pool[1..] {
                if d < min_dist {
                    min_dist = d;
                    nearest = ix;
                }
            }

            if min_dist.is_zero() {
                // An identical point is already in the tree; hang the copy directly beneath it.
                // Without this the descent below would never terminate.
                return Some((nearest, level - 1));
            }

            let covering = scale::<T::Distance>(level);
            if min_dist > covering {
                return None;
            }

            let separation = scale::<T::Distance>(level - 1);
            if min_dist > separation {
                // The point falls in this level's band.  Attach it to the first candidate
                // inside the covering radius.  Candidates carried down from higher levels
                // precede the children pulled in at this level, and at least one carried
                // candidate qualifies, so the parent is always attached above `level` and
                // every node's children end up keyed strictly below its own level.
                let parent = pool
                    .iter()
                    .find(|&&(d, _)| d <= covering)
                    .map(|&(_, ix)| ix)
                    .unwrap_or(nearest);
                return Some((parent, level));
            }

            // The point could still be covered one level deeper: keep candidates inside the
            // covering radius, then pull in their children attached at the next level down.
            let mut next = Vec::with_capacity(pool.len());
            for &(d, ix) in &pool {
                if d <= covering {
                    next.push((d, ix));
                }
            }
            for &(_, ix) in &pool {
                if let Some(kids) = self.nodes[ix].children.get(&(level - 1)) {
                    for &c in kids {
                        let dc = item.distance(&self.nodes[c].item);
                        if dc <= separation {
                            next.push((dc, c));
                        }
                    }
                }
            }

            pool = next;
            level -= 1;
        }
    }

    /// Return up to `k` points, nearest to `query` first.
    pub fn knn(&self, query: &T, k: usize) -> Vec<T>
    where
        T: Clone,
    {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if k == 0 {
            return Vec::new();
        }

        // Candidate pool, kept sorted by distance between levels.
        let mut pool = vec![(query.distance(&self.nodes[root].item), root)];

        for level in (self.min_level()..=self.max_level).rev() {
            let slack = scale::<T::Distance>(level);

            // Visit children attached exactly at this level.
            let mut expanded = pool.clone();
            let bound = Self::kth_distance(&pool, k) + slack;
            for &(_, ix) in &pool {
                if let Some(kids) = self.nodes[ix].children.get(&level) {
                    for &c in kids {
                        let dc = query.distance(&self.nodes[c].item);
                        if dc <= bound {
                            expanded.push((dc, c));
                        }
                    }
                }
            }

            // Carry forward everything that could still hide a closer point.  Any undiscovered
            // descendant hangs below this level, so it lies within
            // 2^(level-1) + 2^(level-2) + ... < 2^level of some carried candidate.
            expanded.sort_by_key(|&(d, _)| Ordered::new(d));
            let bound = Self::kth_distance(&expanded, k) + slack;
            expanded.retain(|&(d, _)| d <= bound);

            pool = expanded;
        }

        pool.truncate(k);
        pool.into_iter()
            .map(|(_, ix)| self.nodes[ix].item.clone())
            .collect()
    }

    /// Distance of the k-th best candidate in a sorted pool, or infinity with fewer than `k`.
    fn kth_distance(pool: &[(T::Distance, usize)], k: usize) -> T::Distance {
        if pool.len() < k {
            T::Distance::infinity()
        } else {
            pool[k - 1].0
        }
    }

    /// Write the tree structure to `sink`: each node's point followed by nested per-level child
    /// blocks.  Diagnostic only; the format is not stable.
    pub fn dump<W: Write>(&self, sink: &mut W) -> io::Result<()>
    where
        T: Debug,
    {
        match self.root {
            Some(root) => self.dump_node(root, sink),
            None => Ok(()),
        }
    }

    fn dump_node<W: Write>(&self, ix: usize, sink: &mut W) -> io::Result<()>
    where
        T: Debug,
    {
        writeln!(sink, "{{")?;
        writeln!(sink, "Point {:?}", self.nodes[ix].item)?;
        for (&level, kids) in self.nodes[ix].children.iter().rev() {
            writeln!(sink, "Level {}:", level)?;
            for &c in kids {
                self.dump_node(c, sink)?;
            }
        }
        writeln!(sink, "}}")
    }

    fn alloc(&mut self, item: T) -> usize {
        self.nodes.push(CoverNode {
            item,
            children: BTreeMap::new(),
        });
        self.nodes.len() - 1
    }
}

impl<T> Default for CoverTree<T>
where
    T: Metric,
    T::Distance: Float,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for CoverTree<T>
where
    T: Metric,
    T::Distance: Float,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push(item);
        }
    }
}

impl<T> FromIterator<T> for CoverTree<T>
where
    T: Metric,
    T::Distance: Float,
{
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        let mut tree = Self::new();
        tree.extend(items);
        tree
    }
}

impl<T> NearestNeighborIndex<T> for CoverTree<T>
where
    T: Metric + Clone,
    T::Distance: Float,
{
    fn insert(&mut self, point: T) -> Result<()> {
        self.push(point);
        Ok(())
    }

    fn knn(&self, query: &T, k: usize) -> Vec<T> {
        CoverTree::knn(self, query, k)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::distance::Proximity;
    use crate::euclid::Euclidean;
    use crate::taxi::Taxicab;
    use crate::tests::{distinct_points, random_points, test_knn_oracle, test_scenario};

    type Point = Euclidean<[f64; 2]>;

    #[test]
    fn test_empty() {
        let tree: CoverTree<Point> = CoverTree::new();
        assert!(tree.is_empty());
        assert!(tree.knn(&Euclidean([0.0, 0.0]), 3).is_empty());
    }

    #[test]
    fn test_zero_k() {
        let mut tree = CoverTree::new();
        tree.push(Euclidean([1.0, 1.0]));
        assert!(tree.knn(&Euclidean([0.0, 0.0]), 0).is_empty());
    }

    #[test]
    fn test_scenario_cover() {
        test_scenario(CoverTree::new);
    }

    #[test]
    fn test_oracle_cover() {
        test_knn_oracle(CoverTree::new);
    }

    #[test]
    fn test_taxicab_metric() {
        // The engine is generic over the metric; exercise it with a non-Euclidean one.
        let mut tree = CoverTree::new();
        for p in [[0.0, 0.0], [3.0, 0.0], [2.0, 2.0], [-1.0, -1.0]] {
            tree.push(Taxicab(p));
        }
        let found = tree.knn(&Taxicab([2.0, 1.0]), 2);
        assert_eq!(found[0], Taxicab([2.0, 2.0]));
        assert_eq!(found[1], Taxicab([3.0, 0.0]));
    }

    #[test]
    fn test_multiset() {
        let mut tree = CoverTree::new();
        for _ in 0..3 {
            tree.push(Euclidean([1.0, 2.0]));
        }
        tree.push(Euclidean([50.0, 50.0]));

        assert_eq!(tree.len(), 4);
        let found = tree.knn(&Euclidean([0.0, 0.0]), 3);
        assert_eq!(found, vec![Euclidean([1.0, 2.0]); 3]);
    }

    #[test]
    fn test_covering_radius_growth() {
        let mut tree = CoverTree::new();
        tree.push(Euclidean([0.0, 0.0]));
        tree.push(Euclidean([1000.0, 0.0]));

        assert!(tree.max_level() >= 10);
        assert!(2f64.powi(tree.max_level()) >= 1000.0);
        assert_eq!(tree.min_level(), tree.max_level());

        let found = tree.knn(&Euclidean([999.0, 0.0]), 1);
        assert_eq!(found, vec![Euclidean([1000.0, 0.0])]);
    }

    #[test]
    fn test_knn_finds_every_point() {
        // Collinear cluster plus an off-axis point that attaches beneath a mid-level node
        // rather than the root.
        let points = [[0.0, 0.0], [6.0, 0.0], [12.0, 0.0], [20.0, 0.0], [8.0, 4.0]];
        let tree: CoverTree<Point> = points.into_iter().map(Euclidean).collect();

        assert_eq!(tree.max_level(), 5);
        assert_eq!(tree.min_level(), 3);

        for p in points {
            assert_eq!(tree.knn(&Euclidean(p), 1), vec![Euclidean(p)]);
        }
    }

    /// Walk the arena and check the separation-and-covering invariant: a child attached at
    /// level `l` lies within `2^l` of its parent and beyond `2^(l-1)`, and its own children
    /// are keyed strictly below `l`.
    fn assert_separation(tree: &CoverTree<Point>) {
        for node in &tree.nodes {
            for (&level, kids) in &node.children {
                for &c in kids {
                    let d = node.item.distance(&tree.nodes[c].item);
                    assert!(d <= 2f64.powi(level), "covering violated at level {level}");
                    assert!(d > 2f64.powi(level - 1), "separation violated at level {level}");

                    if let Some((&deepest, _)) = tree.nodes[c].children.iter().next_back() {
                        assert!(deepest < level, "child levels must sit below level {level}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_separation_invariant() {
        for seed in 0..4 {
            let mut tree = CoverTree::new();
            for p in distinct_points(seed, 300) {
                tree.push(p);
            }
            assert_separation(&tree);
        }
    }

    #[test]
    fn test_levels_monotonic() {
        let mut tree: CoverTree<Point> = random_points(7, 200).into_iter().collect();
        assert!(tree.min_level() <= tree.max_level());

        // Distant outlier forces the covering radius up, never down.
        let before = tree.max_level();
        tree.push(Euclidean([1.0e6, 0.0]));
        assert!(tree.max_level() >= before.max(19));
    }

    #[test]
    fn test_dump() {
        let mut tree = CoverTree::new();
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            tree.push(Euclidean(p));
        }

        let mut out = Vec::new();
        tree.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("Point").count(), 3);
        assert_eq!(text.matches('{').count(), text.matches('}').count());
        assert!(text.contains("Level"));
    }
}
