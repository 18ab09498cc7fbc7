use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, Utc};
use itertools::Itertools;

use crate::{core::series::Mean, error::ModelError, quantity::length::Metres};

/// Weather variable, the first level of the column key.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Variable {
    /// Wind speed in m/s.
    WindSpeed,

    /// Roughness length in metres.
    RoughnessLength,

    /// Air temperature in kelvin.
    Temperature,

    /// Air pressure in pascals.
    Pressure,

    /// Air density in kg/m³.
    Density,

    /// Dimensionless turbulence intensity.
    TurbulenceIntensity,
}

impl Variable {
    pub const ALL: [Self; 6] = [
        Self::WindSpeed,
        Self::RoughnessLength,
        Self::Temperature,
        Self::Pressure,
        Self::Density,
        Self::TurbulenceIntensity,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WindSpeed => "wind_speed",
            Self::RoughnessLength => "roughness_length",
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
            Self::Density => "density",
            Self::TurbulenceIntensity => "turbulence_intensity",
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variable {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|variable| variable.as_str() == s)
            .ok_or_else(|| ModelError::shape_mismatch(format!("unknown weather variable `{s}`")))
    }
}

/// Multi-height weather time series.
///
/// Columns are keyed by `(variable, height)`, and every column is aligned with the index.
#[derive(Clone, Debug, Default)]
pub struct Weather {
    index: Vec<DateTime<Utc>>,
    columns: BTreeMap<Variable, BTreeMap<Metres, Vec<f64>>>,
}

impl Weather {
    pub const fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self { index, columns: BTreeMap::new() }
    }

    /// Add the column and return the table, for building it in one expression.
    pub fn with_column(
        mut self,
        variable: Variable,
        height: Metres,
        values: Vec<f64>,
    ) -> Result<Self, ModelError> {
        self.insert(variable, height, values)?;
        Ok(self)
    }

    pub fn insert(
        &mut self,
        variable: Variable,
        height: Metres,
        values: Vec<f64>,
    ) -> Result<(), ModelError> {
        if values.len() != self.index.len() {
            return Err(ModelError::shape_mismatch(format!(
                "column ({variable}, {height}) has {} values for {} timestamps",
                values.len(),
                self.index.len(),
            )));
        }
        if !height.is_finite() || height < Metres::ZERO {
            return Err(ModelError::shape_mismatch(format!(
                "invalid height {height} for `{variable}`"
            )));
        }
        self.columns.entry(variable).or_default().insert(height, values);
        Ok(())
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub const fn len(&self) -> usize {
        self.index.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = Variable> {
        self.columns.keys().copied()
    }

    /// All heights of the variable with their columns, sorted by height.
    ///
    /// Fails when the variable is missing, naming the model which needed it.
    pub fn heights(
        &self,
        variable: Variable,
        model: &'static str,
    ) -> Result<&BTreeMap<Metres, Vec<f64>>, ModelError> {
        self.columns.get(&variable).ok_or(ModelError::MissingData { variable, model })
    }

    /// Column measured exactly at the height, if any.
    pub fn column(&self, variable: Variable, height: Metres) -> Option<&[f64]> {
        self.columns.get(&variable)?.get(&height).map(Vec::as_slice)
    }

    /// The lowest-height column of the variable.
    pub fn first_column(
        &self,
        variable: Variable,
        model: &'static str,
    ) -> Result<(Metres, &[f64]), ModelError> {
        self.heights(variable, model)?
            .iter()
            .next()
            .map(|(height, values)| (*height, values.as_slice()))
            .ok_or(ModelError::MissingData { variable, model })
    }

    /// Column measured closest to the target height. Ties go to the lower height.
    pub fn closest(
        &self,
        variable: Variable,
        target: Metres,
        model: &'static str,
    ) -> Result<(Metres, &[f64]), ModelError> {
        self.heights(variable, model)?
            .iter()
            .min_by_key(|(height, _)| (**height - target).abs())
            .map(|(height, values)| (*height, values.as_slice()))
            .ok_or(ModelError::MissingData { variable, model })
    }

    /// Two columns measured closest to the target height, the closest first.
    pub fn two_closest(
        &self,
        variable: Variable,
        target: Metres,
        model: &'static str,
    ) -> Result<[(Metres, &[f64]); 2], ModelError> {
        let heights = self.heights(variable, model)?;
        heights
            .iter()
            .sorted_by_key(|(height, _)| (**height - target).abs())
            .map(|(height, values)| (*height, values.as_slice()))
            .next_array()
            .ok_or_else(|| {
                ModelError::shape_mismatch(format!(
                    "the {model} model needs `{variable}` at two heights at least, got {}",
                    heights.len(),
                ))
            })
    }

    /// Mean over all values of all heights of the variable, `None` when it is absent.
    pub fn mean_of(&self, variable: Variable) -> Option<f64> {
        self.columns.get(&variable)?.values().flatten().copied().mean()
    }
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    use super::*;

    /// Two hours of weather with wind speed at 10 and 80 metres.
    pub fn two_hours() -> Weather {
        Weather::new(vec![
            Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2012, 1, 1, 1, 0, 0).unwrap(),
        ])
        .with_column(Variable::WindSpeed, Metres(10.0), vec![5.0, 6.5])
        .unwrap()
        .with_column(Variable::WindSpeed, Metres(80.0), vec![8.0, 9.0])
        .unwrap()
        .with_column(Variable::Temperature, Metres(2.0), vec![267.0, 268.0])
        .unwrap()
        .with_column(Variable::Temperature, Metres(10.0), vec![267.5, 268.5])
        .unwrap()
        .with_column(Variable::Pressure, Metres(0.0), vec![101_125.0, 101_000.0])
        .unwrap()
        .with_column(Variable::RoughnessLength, Metres(0.0), vec![0.15, 0.15])
        .unwrap()
    }

    #[test]
    fn test_column_length_mismatch() {
        let weather = Weather::new(vec![Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap()]);
        let error = weather.with_column(Variable::WindSpeed, Metres(10.0), vec![1.0, 2.0]);
        assert!(matches!(error, Err(ModelError::ShapeMismatch(_))));
    }

    #[test]
    fn test_missing_variable() {
        let error = two_hours().closest(Variable::Density, Metres(100.0), "test").unwrap_err();
        assert!(matches!(
            error,
            ModelError::MissingData { variable: Variable::Density, model: "test" }
        ));
    }

    #[test]
    fn test_closest() {
        let weather = two_hours();
        let (height, values) = weather.closest(Variable::WindSpeed, Metres(100.0), "test").unwrap();
        assert_eq!(height, Metres(80.0));
        assert_eq!(values, [8.0, 9.0]);

        let (height, _) = weather.closest(Variable::WindSpeed, Metres(20.0), "test").unwrap();
        assert_eq!(height, Metres(10.0));
    }

    #[test]
    fn test_two_closest() {
        let weather = two_hours();
        let [(first, _), (second, _)] =
            weather.two_closest(Variable::WindSpeed, Metres(70.0), "test").unwrap();
        assert_eq!(first, Metres(80.0));
        assert_eq!(second, Metres(10.0));
    }

    #[test]
    fn test_two_closest_single_height() {
        let error = two_hours().two_closest(Variable::Pressure, Metres(70.0), "test").unwrap_err();
        assert!(matches!(error, ModelError::ShapeMismatch(_)));
    }

    #[test]
    fn test_mean() {
        assert_abs_diff_eq!(two_hours().mean_of(Variable::WindSpeed).unwrap(), 7.125);
        assert!(two_hours().mean_of(Variable::TurbulenceIntensity).is_none());
    }

    #[test]
    fn test_variable_from_str() {
        assert_eq!("roughness_length".parse::<Variable>().unwrap(), Variable::RoughnessLength);
        assert!("humidity".parse::<Variable>().is_err());
    }
}
