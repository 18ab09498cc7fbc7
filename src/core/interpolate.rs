/// What to return for arguments outside the sampled range.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Extrapolation {
    /// Zero on both sides, as for power curves.
    Zero,

    /// The nearest end value, as for efficiency curves.
    Nearest,
}

/// Piecewise-linear interpolation over points sorted by strictly ascending `x`.
///
/// The end points themselves are always part of the sampled range. `NaN` propagates.
#[must_use]
pub fn interpolate(points: &[(f64, f64)], x: f64, extrapolation: Extrapolation) -> f64 {
    interpolate_by(points, x, extrapolation, |point| *point)
}

/// Same as [`interpolate`], but over any points which `xy` can turn into coordinates.
pub fn interpolate_by<P>(
    points: &[P],
    x: f64,
    extrapolation: Extrapolation,
    xy: impl Fn(&P) -> (f64, f64),
) -> f64 {
    let (Some((first_x, first_y)), Some((last_x, last_y))) =
        (points.first().map(&xy), points.last().map(&xy))
    else {
        return f64::NAN;
    };
    if x.is_nan() {
        return f64::NAN;
    }
    if x < first_x {
        return match extrapolation {
            Extrapolation::Zero => 0.0,
            Extrapolation::Nearest => first_y,
        };
    }
    if x > last_x {
        return match extrapolation {
            Extrapolation::Zero => 0.0,
            Extrapolation::Nearest => last_y,
        };
    }

    // Index of the first point strictly to the right of `x`:
    let right = points.partition_point(|point| xy(point).0 <= x);
    if right == points.len() {
        return last_y;
    }
    let (left_x, left_y) = xy(&points[right - 1]);
    let (right_x, right_y) = xy(&points[right]);
    left_y + (right_y - left_y) * (x - left_x) / (right_x - left_x)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const POINTS: [(f64, f64); 3] = [(1.0, 10.0), (2.0, 20.0), (4.0, 0.0)];

    #[test]
    fn test_inside() {
        assert_abs_diff_eq!(interpolate(&POINTS, 1.5, Extrapolation::Zero), 15.0);
        assert_abs_diff_eq!(interpolate(&POINTS, 3.0, Extrapolation::Zero), 10.0);
    }

    #[test]
    fn test_exact_points() {
        assert_abs_diff_eq!(interpolate(&POINTS, 1.0, Extrapolation::Zero), 10.0);
        assert_abs_diff_eq!(interpolate(&POINTS, 2.0, Extrapolation::Zero), 20.0);
        assert_abs_diff_eq!(interpolate(&POINTS, 4.0, Extrapolation::Zero), 0.0);
    }

    #[test]
    fn test_outside() {
        assert_abs_diff_eq!(interpolate(&POINTS, 0.5, Extrapolation::Zero), 0.0);
        assert_abs_diff_eq!(interpolate(&POINTS, 0.5, Extrapolation::Nearest), 10.0);
        let nearest = interpolate(&[(1.0, 0.5), (3.0, 0.9)], 10.0, Extrapolation::Nearest);
        assert_abs_diff_eq!(nearest, 0.9);
    }

    #[test]
    fn test_nan() {
        assert!(interpolate(&POINTS, f64::NAN, Extrapolation::Zero).is_nan());
        assert!(interpolate(&[], 1.0, Extrapolation::Zero).is_nan());
    }
}
