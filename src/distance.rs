//! Abstract notions of distance.

use num_traits::{Num, NumAssign, Signed};

/// A number type suitable for distance values.
///
/// This trait is automatically implemented for all types that support the required operations.
pub trait Value: Copy + Num + NumAssign + Signed + PartialOrd {}

/// Blanket [Value] implementation.
impl<T: Copy + Num + NumAssign + Signed + PartialOrd> Value for T {}

/// A space with some notion of distance between points.
///
/// The indexes in this crate never inspect a point's internals; every decision they make flows
/// through this single operation.  Distances must be non-negative and finite.
///
/// Type parameters:
///
/// * `T`: The type to compare against.
pub trait Proximity<T: ?Sized = Self> {
    /// The numeric type of distance values.
    type Distance: Value;

    /// Calculate the distance between this point and another one.
    fn distance(&self, other: &T) -> Self::Distance;
}

/// Blanket [Proximity] implementation for references.
impl<'k, 'v, K: Proximity<V>, V> Proximity<&'v V> for &'k K {
    type Distance = K::Distance;

    fn distance(&self, other: &&'v V) -> Self::Distance {
        (*self).distance(*other)
    }
}

/// Marker trait for [metric spaces](https://en.wikipedia.org/wiki/Metric_space).
///
/// A metric must be symmetric and obey the [triangle inequality]: for all points `x`, `y`, `z`,
///
/// * `d(x, x) == 0`
/// * `d(x, y) == d(y, x)`
/// * `d(x, z) <= d(x, y) + d(y, z)`
///
/// Together these imply `d(x, y) >= 0`.  The pruning bounds used by [`CoverTree`] and [`KdTree`]
/// during search are derived from the triangle inequality; querying an index through a distance
/// function that violates it may silently drop true neighbors.
///
/// [triangle inequality]: https://en.wikipedia.org/wiki/Triangle_inequality
/// [`CoverTree`]: crate::cover::CoverTree
/// [`KdTree`]: crate::kd::KdTree
pub trait Metric<T: ?Sized = Self>: Proximity<T> {}

/// Blanket [Metric] implementation for references.
impl<'k, 'v, K: Metric<V>, V> Metric<&'v V> for &'k K {}
