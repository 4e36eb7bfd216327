//! [Coordinate spaces](https://en.wikipedia.org/wiki/Cartesian_coordinate_system).

use crate::distance::Value;

/// A point with indexable coordinates of fixed dimensionality.
///
/// The cover tree works with bare [`Proximity`](crate::distance::Proximity); only the k-d tree
/// needs per-axis access, to pick split dimensions and maintain bounding boxes.
pub trait Coordinates {
    /// The type of individual coordinates.
    type Value: Value;

    /// Get the number of dims this point has.
    fn dims(&self) -> usize;

    /// Get the `i`th coordinate of this point.
    fn coord(&self, i: usize) -> Self::Value;

    /// Create a vector with this point's coordinates as values.
    fn as_vec(&self) -> Vec<Self::Value> {
        let len = self.dims();
        let mut vec = Vec::with_capacity(len);
        for i in 0..len {
            vec.push(self.coord(i));
        }
        vec
    }
}

/// Points that can be synthesized from raw coordinates.
///
/// The k-d tree builds the centers of its bounding boxes this way, so that they can be fed back
/// into the same distance function as ordinary points.
pub trait FromCoords: Coordinates + Sized {
    /// Build a point from a coordinate slice.  `coords.len()` must equal the point's
    /// dimensionality.
    fn from_coords(coords: &[Self::Value]) -> Self;
}

/// [Coordinates] implementation for slices.
impl<T: Value> Coordinates for [T] {
    type Value = T;

    fn dims(&self) -> usize {
        self.len()
    }

    fn coord(&self, i: usize) -> T {
        self[i]
    }
}

/// [Coordinates] implementations for arrays.
macro_rules! array_coordinates {
    ($n:expr) => {
        impl<T: Value> Coordinates for [T; $n] {
            type Value = T;

            fn dims(&self) -> usize {
                $n
            }

            fn coord(&self, i: usize) -> T {
                self[i]
            }
        }

        impl<T: Value> FromCoords for [T; $n] {
            fn from_coords(coords: &[T]) -> Self {
                let mut array = [T::zero(); $n];
                array.copy_from_slice(coords);
                array
            }
        }
    };
}

array_coordinates!(1);
array_coordinates!(2);
array_coordinates!(3);
array_coordinates!(4);
array_coordinates!(5);
array_coordinates!(6);
array_coordinates!(7);
array_coordinates!(8);

/// [Coordinates] implementation for vectors.
impl<T: Value> Coordinates for Vec<T> {
    type Value = T;

    fn dims(&self) -> usize {
        self.len()
    }

    fn coord(&self, i: usize) -> T {
        self[i]
    }
}

/// [FromCoords] implementation for vectors.
impl<T: Value> FromCoords for Vec<T> {
    fn from_coords(coords: &[T]) -> Self {
        coords.to_vec()
    }
}

/// Blanket [Coordinates] implementation for references.
impl<T: ?Sized + Coordinates> Coordinates for &T {
    type Value = T::Value;

    fn dims(&self) -> usize {
        (*self).dims()
    }

    fn coord(&self, i: usize) -> Self::Value {
        (*self).coord(i)
    }
}

/// Types that support computing distances to raw slices of coordinates.
pub trait CoordinateProximity<T> {
    /// The numeric type of distance values.
    type Distance: Value;

    /// Compute the distance to a point specified by its coordinates.
    fn distance_to_coords(&self, coords: &[T]) -> Self::Distance;
}

/// Blanket [CoordinateProximity] implementation for references.
impl<T: CoordinateProximity<U>, U> CoordinateProximity<U> for &T {
    type Distance = T::Distance;

    fn distance_to_coords(&self, coords: &[U]) -> Self::Distance {
        (*self).distance_to_coords(coords)
    }
}

/// Marker trait for coordinate proximities that are [metrics][crate::distance::Metric].
pub trait CoordinateMetric<T>: CoordinateProximity<T> {}

/// Blanket [CoordinateMetric] implementation for references.
impl<T: CoordinateMetric<U>, U> CoordinateMetric<U> for &T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_vec() {
        assert_eq!([1, 2, 3].as_vec(), vec![1, 2, 3]);
        assert_eq!(vec![1.0, 2.0].as_vec(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_from_coords() {
        assert_eq!(<[i32; 3]>::from_coords(&[1, 2, 3]), [1, 2, 3]);
        assert_eq!(Vec::from_coords(&[0.5, 1.5]), vec![0.5, 1.5]);
    }
}
