use chrono::{DateTime, Utc};

pub type Point<V> = (DateTime<Utc>, V);
pub type Series<V> = Vec<Point<V>>;

impl<T> Mean for T where T: ?Sized {}

pub trait Mean {
    /// Arithmetic mean of the values, or `None` for an empty iterator.
    #[must_use]
    fn mean<V>(self) -> Option<f64>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Into<f64>,
    {
        let (sum, count) = self
            .into_iter()
            .fold((0.0, 0_u32), |(sum, count), value| (sum + value.into(), count + 1));
        (count != 0).then(|| sum / f64::from(count))
    }
}

impl<T> Align for T where T: ?Sized {}

pub trait Align {
    /// Pair the values with the timestamps of the index they were computed for.
    fn align<V>(self, index: &[DateTime<Utc>]) -> impl Iterator<Item = Point<V>>
    where
        Self: Sized + IntoIterator<Item = V>,
    {
        index.iter().copied().zip(self)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_mean() {
        assert_abs_diff_eq!([1.0, 2.0, 6.0].mean().unwrap(), 3.0);
    }

    #[test]
    fn test_mean_empty() {
        assert!(Vec::<f64>::new().mean().is_none());
    }

    #[test]
    fn test_align() {
        let index = [
            Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2010, 1, 1, 1, 0, 0).unwrap(),
        ];
        let series: Series<_> = vec![10, 20].align(&index).collect();
        assert_eq!(series, vec![(index[0], 10), (index[1], 20)]);
    }
}
