//! Incremental nearest neighbor indexes over metric spaces.
//!
//! Build an index one point at a time, then ask it for the `k` points nearest to a query.  Two
//! engines implement the same [`NearestNeighborIndex`] contract with different strategies:
//!
//! * [`CoverTree`] needs nothing but a distance function.  It maintains a hierarchy of covering
//!   balls whose radii shrink geometrically with depth, and grows the root radius on demand to
//!   admit arbitrarily distant points.
//! * [`KdTree`] needs points with indexable coordinates and a known bounding extent.  It
//!   partitions the extent into halved boxes with bucketed leaves, splitting a bucket along its
//!   widest axis when it fills up.
//!
//! [`ExhaustiveSearch`] rounds out the set as the brute-force reference.  All engines treat the
//! index as a multiset, and return query results nearest-first:
//!
//!     use nearby::euclid::Euclidean;
//!     use nearby::CoverTree;
//!
//!     let mut tree = CoverTree::new();
//!     for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]] {
//!         tree.push(Euclidean(p));
//!     }
//!
//!     let found = tree.knn(&Euclidean([0.2, 0.1]), 2);
//!     assert_eq!(found[0], Euclidean([0.0, 0.0]));

#![warn(missing_docs, rust_2018_idioms)]

pub mod coords;
pub mod cover;
pub mod distance;
pub mod error;
pub mod euclid;
pub mod exhaustive;
pub mod kd;
pub mod knn;
pub mod taxi;

mod util;


pub use coords::{Coordinates, FromCoords};
pub use cover::CoverTree;
pub use distance::{Metric, Proximity};
pub use error::{Error, Result};
pub use euclid::{euclidean_distance, Euclidean};
pub use exhaustive::ExhaustiveSearch;
pub use kd::{KdPoint, KdTree, CHILDREN_LIMIT};
pub use knn::NearestNeighborIndex;
pub use taxi::{taxicab_distance, Taxicab};
