//! [Taxicab (Manhattan) space](https://en.wikipedia.org/wiki/Taxicab_geometry).

use crate::coords::{CoordinateMetric, CoordinateProximity, Coordinates, FromCoords};
use crate::distance::{Metric, Proximity};

use num_traits::{zero, Signed};

/// A point in taxicab space.
///
/// Mostly useful as a second metric fixture: unlike [`Euclidean`](crate::euclid::Euclidean) it
/// needs no square roots, so it works for integer coordinates too.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Taxicab<T>(pub T);

impl<T> Taxicab<T> {
    /// Wrap a point.
    pub fn new(point: T) -> Self {
        Self(point)
    }

    /// Unwrap a point.
    pub fn inner(&self) -> &T {
        &self.0
    }

    /// Unwrap a point.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Coordinates> Coordinates for Taxicab<T> {
    type Value = T::Value;

    fn dims(&self) -> usize {
        self.0.dims()
    }

    fn coord(&self, i: usize) -> Self::Value {
        self.0.coord(i)
    }
}

impl<T: FromCoords> FromCoords for Taxicab<T> {
    fn from_coords(coords: &[Self::Value]) -> Self {
        Self(T::from_coords(coords))
    }
}

/// Compute the taxicab distance between two points: the sum of absolute coordinate differences.
pub fn taxicab_distance<T, U>(x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
{
    debug_assert_eq!(x.dims(), y.dims());

    let mut sum: T::Value = zero();
    for i in 0..x.dims() {
        sum += (x.coord(i) - y.coord(i)).abs();
    }

    sum
}

/// The taxicab distance function.
impl<T: Coordinates> Proximity for Taxicab<T> {
    type Distance = T::Value;

    fn distance(&self, other: &Self) -> Self::Distance {
        taxicab_distance(self, other)
    }
}

/// Taxicab distance is a metric.
impl<T: Coordinates> Metric for Taxicab<T> {}

impl<T: Coordinates> CoordinateProximity<T::Value> for Taxicab<T> {
    type Distance = T::Value;

    fn distance_to_coords(&self, coords: &[T::Value]) -> Self::Distance {
        taxicab_distance(self, coords)
    }
}

impl<T: Coordinates> CoordinateMetric<T::Value> for Taxicab<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        assert_eq!(taxicab_distance([0, 0], [3, 4]), 7);

        let d = Taxicab([1.0, -1.0]).distance(&Taxicab([-1.0, 1.0]));
        assert_eq!(d, 4.0);
    }
}
