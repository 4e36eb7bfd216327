//! Internal utilities.

use std::cmp::Ordering;

/// A wrapper that promotes a partial ordering to a total one.
///
/// Distance values in this crate are usually floats, which are only `PartialOrd`.  Sorting and
/// heap code wraps them in `Ordered`, which panics on incomparable values: a NaN distance means
/// the supplied distance function is not a metric.
#[derive(Clone, Copy, Debug)]
pub struct Ordered<T>(T);

impl<T: PartialOrd> Ordered<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T: PartialOrd> Ord for Ordered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .partial_cmp(&other.0)
            .expect("distance values must be comparable")
    }
}

impl<T: PartialOrd> PartialOrd for Ordered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: PartialOrd> Eq for Ordered<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered() {
        let one = Ordered::new(1.0);
        let two = Ordered::new(2.0);

        assert_eq!(one.cmp(&one), Ordering::Equal);
        assert_eq!(one.cmp(&two), Ordering::Less);
        assert_eq!(two.cmp(&one), Ordering::Greater);
    }

    #[test]
    #[should_panic(expected = "must be comparable")]
    fn test_nan() {
        let one = Ordered::new(1.0);
        let nan = Ordered::new(f64::NAN);
        let _ = one.cmp(&nan);
    }
}
