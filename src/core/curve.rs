use itertools::Itertools;

use crate::{
    core::interpolate::{Extrapolation, interpolate_by},
    error::ModelError,
    quantity::{power::Watts, speed::MetresPerSecond},
};

/// Wind speed step appended after a power curve which does not end with zero power.
const CUT_OUT_STEP: MetresPerSecond = MetresPerSecond(0.5);

/// Wind-speed-indexed curve with strictly ascending wind speeds.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve<V>(Vec<(MetresPerSecond, V)>);

/// Wind speed to electrical power.
pub type PowerCurve = Curve<Watts>;

/// Wind speed to a dimensionless value: power coefficient or efficiency.
pub type CoefficientCurve = Curve<f64>;

impl<V: Copy + Into<f64>> Curve<V> {
    pub fn try_new(points: Vec<(MetresPerSecond, V)>) -> Result<Self, ModelError> {
        if points.is_empty() {
            return Err(ModelError::shape_mismatch("a curve needs at least one point"));
        }
        if let Some((wind_speed, _)) = points.iter().find(|(wind_speed, value)| {
            !wind_speed.is_finite() || !Into::<f64>::into(*value).is_finite()
        }) {
            return Err(ModelError::shape_mismatch(format!(
                "non-finite curve point at {wind_speed}"
            )));
        }
        if let Some(((left, _), (right, _))) =
            points.iter().tuple_windows().find(|((left, _), (right, _))| left >= right)
        {
            return Err(ModelError::shape_mismatch(format!(
                "curve wind speeds must be strictly ascending, got {left} followed by {right}"
            )));
        }
        Ok(Self(points))
    }

    /// Build the curve from two parallel columns.
    pub fn try_from_columns(wind_speeds: &[f64], values: &[f64]) -> Result<Self, ModelError>
    where
        V: From<f64>,
    {
        if wind_speeds.len() != values.len() {
            return Err(ModelError::shape_mismatch(format!(
                "{} curve wind speeds for {} values",
                wind_speeds.len(),
                values.len(),
            )));
        }
        Self::try_new(
            wind_speeds
                .iter()
                .zip(values)
                .map(|(wind_speed, value)| (MetresPerSecond(*wind_speed), V::from(*value)))
                .collect(),
        )
    }

    pub fn points(&self) -> &[(MetresPerSecond, V)] {
        &self.0
    }

    pub fn wind_speeds(&self) -> impl Iterator<Item = MetresPerSecond> {
        self.0.iter().map(|(wind_speed, _)| *wind_speed)
    }

    pub fn values(&self) -> impl Iterator<Item = V> {
        self.0.iter().map(|(_, value)| *value)
    }

    pub fn first(&self) -> (MetresPerSecond, V) {
        self.0[0]
    }

    pub fn last(&self) -> (MetresPerSecond, V) {
        self.0[self.0.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Linearly interpolated value at the wind speed.
    pub fn at(&self, wind_speed: MetresPerSecond, extrapolation: Extrapolation) -> V
    where
        V: From<f64>,
    {
        V::from(self.at_raw(wind_speed.0, extrapolation))
    }

    fn at_raw(&self, wind_speed: f64, extrapolation: Extrapolation) -> f64 {
        interpolate_by(&self.0, wind_speed, extrapolation, |(wind_speed, value)| {
            (wind_speed.0, (*value).into())
        })
    }
}

impl PowerCurve {
    /// Prepend zero power at zero wind speed, and append zero power after the last point,
    /// unless the curve already has them.
    ///
    /// Aggregating curves which end with a non-zero value would otherwise carry that power
    /// over to any higher wind speed.
    #[must_use]
    pub fn padded_with_zeros(&self) -> Self {
        let mut points = self.0.clone();
        if points[0].0 > MetresPerSecond::ZERO {
            points.insert(0, (MetresPerSecond::ZERO, Watts::ZERO));
        }
        let (last_wind_speed, last_value) = points[points.len() - 1];
        if last_value != Watts::ZERO {
            points.push((last_wind_speed + CUT_OUT_STEP, Watts::ZERO));
        }
        Self(points)
    }

    /// Multiply all the power values, for example, by the number of turbines.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0.iter().map(|(wind_speed, value)| (*wind_speed, *value * factor)).collect())
    }

    /// Sum the curves over the union of their wind speeds.
    ///
    /// Every curve is interpolated linearly at the union points. Past its last point a curve
    /// keeps its last value, before its first point it does not contribute.
    pub fn sum<'a>(curves: impl IntoIterator<Item = &'a Self>) -> Result<Self, ModelError> {
        let curves = curves.into_iter().collect_vec();
        let wind_speeds = curves
            .iter()
            .flat_map(|curve| curve.wind_speeds())
            .sorted_unstable()
            .dedup()
            .collect_vec();
        let points = wind_speeds
            .into_iter()
            .map(|wind_speed| {
                let total = curves
                    .iter()
                    .filter(|curve| curve.first().0 <= wind_speed)
                    .map(|curve| curve.at(wind_speed, Extrapolation::Nearest))
                    .sum::<Watts>();
                (wind_speed, total)
            })
            .collect();
        Self::try_new(points)
    }

    /// Highest power on the curve.
    pub fn max_value(&self) -> Watts {
        self.values().max().unwrap_or(Watts::ZERO)
    }
}
