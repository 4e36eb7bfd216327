//! [Euclidean space](https://en.wikipedia.org/wiki/Euclidean_space).

use crate::coords::{CoordinateMetric, CoordinateProximity, Coordinates, FromCoords};
use crate::distance::{Metric, Proximity};

use num_traits::{zero, Float};

/// A point in Euclidean space.
///
/// This wrapper equips any [coordinate space](Coordinates) with the [Euclidean
/// distance](euclidean_distance) metric.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Euclidean<T>(pub T);

impl<T> Euclidean<T> {
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

impl<T: Coordinates> Coordinates for Euclidean<T> {
    type Value = T::Value;

    fn dims(&self) -> usize {
        self.0.dims()
    }

    fn coord(&self, i: usize) -> Self::Value {
        self.0.coord(i)
    }
}

impl<T: FromCoords> FromCoords for Euclidean<T> {
    fn from_coords(coords: &[Self::Value]) -> Self {
        Self(T::from_coords(coords))
    }
}

/// Compute the [Euclidean distance] between two points:
/// the square root of the sum of squared coordinate differences.
///
/// [Euclidean distance]: https://en.wikipedia.org/wiki/Euclidean_distance
pub fn euclidean_distance<T, U>(x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
    T::Value: Float,
{
    debug_assert_eq!(x.dims(), y.dims());

    let mut sum: T::Value = zero();
    for i in 0..x.dims() {
        let diff = x.coord(i) - y.coord(i);
        sum = sum + diff * diff;
    }

    sum.sqrt()
}

/// The Euclidean distance function.
impl<T> Proximity for Euclidean<T>
where
    T: Coordinates,
    T::Value: Float,
{
    type Distance = T::Value;

    fn distance(&self, other: &Self) -> Self::Distance {
        euclidean_distance(self, other)
    }
}

/// Euclidean distance is a metric.
impl<T> Metric for Euclidean<T>
where
    T: Coordinates,
    T::Value: Float,
{
}

impl<T> CoordinateProximity<T::Value> for Euclidean<T>
where
    T: Coordinates,
    T::Value: Float,
{
    type Distance = T::Value;

    fn distance_to_coords(&self, coords: &[T::Value]) -> Self::Distance {
        euclidean_distance(self, coords)
    }
}

impl<T> CoordinateMetric<T::Value> for Euclidean<T>
where
    T: Coordinates,
    T::Value: Float,
{
}
