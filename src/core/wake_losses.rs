use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use itertools::Itertools;

use crate::{
    core::{
        curve::{CoefficientCurve, PowerCurve},
        interpolate::Extrapolation,
    },
    error::ModelError,
    quantity::speed::MetresPerSecond,
};

const CATALOG: &str = include_str!("../../data/wind_efficiency_curves.toml");

/// How wake losses inside the wind farms are taken into account.
#[derive(Clone, Debug, Eq, PartialEq, serde_with::DeserializeFromStr)]
pub enum WakeLossesModel {
    /// Wake losses are ignored.
    None,

    /// The aggregated power curve is multiplied by the farm's efficiency curve.
    PowerEfficiencyCurve,

    /// The aggregated power curve is multiplied by the farm's constant efficiency.
    ConstantEfficiency,

    /// The hub-height wind speed is reduced by the named catalog curve.
    NamedCurve(String),
}

impl WakeLossesModel {
    /// Whether the wake losses are applied while aggregating the power curve,
    /// as opposed to reducing the wind speed afterwards.
    pub const fn is_embedded(&self) -> bool {
        !matches!(self, Self::NamedCurve(_))
    }
}

impl Default for WakeLossesModel {
    fn default() -> Self {
        Self::NamedCurve("dena_mean".to_owned())
    }
}

impl Display for WakeLossesModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::PowerEfficiencyCurve => f.write_str("power_efficiency_curve"),
            Self::ConstantEfficiency => f.write_str("constant_efficiency"),
            Self::NamedCurve(name) => f.write_str(name),
        }
    }
}

impl FromStr for WakeLossesModel {
    type Err = ModelError;

    /// Anything but the reserved names is a wind efficiency curve name,
    /// which is only looked up when the wind speed gets reduced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ModelError::configuration("empty wake losses model")),
            "none" => Ok(Self::None),
            "power_efficiency_curve" => Ok(Self::PowerEfficiencyCurve),
            "constant_efficiency" => Ok(Self::ConstantEfficiency),
            name => Ok(Self::NamedCurve(name.to_owned())),
        }
    }
}

/// Wind farm efficiency: a constant or a wind-speed-dependent curve.
#[derive(Clone, Debug, PartialEq)]
pub enum FarmEfficiency {
    Constant(f64),
    Curve(CoefficientCurve),
}

/// Apply the farm efficiency to the aggregated power curve.
///
/// Points below the first wind speed of an efficiency curve are dropped,
/// past its last wind speed the last efficiency holds.
pub fn apply_to_power_curve(
    power_curve: &PowerCurve,
    model: &WakeLossesModel,
    efficiency: &FarmEfficiency,
) -> Result<PowerCurve, ModelError> {
    match (model, efficiency) {
        (WakeLossesModel::ConstantEfficiency, FarmEfficiency::Constant(efficiency)) => {
            Ok(power_curve.scaled(*efficiency))
        }
        (WakeLossesModel::PowerEfficiencyCurve, FarmEfficiency::Curve(efficiency_curve)) => {
            let (first_wind_speed, _) = efficiency_curve.first();
            PowerCurve::try_new(
                power_curve
                    .points()
                    .iter()
                    .filter(|(wind_speed, _)| *wind_speed >= first_wind_speed)
                    .map(|(wind_speed, value)| {
                        let efficiency = efficiency_curve.at(*wind_speed, Extrapolation::Nearest);
                        (*wind_speed, *value * efficiency)
                    })
                    .collect(),
            )
        }
        (WakeLossesModel::ConstantEfficiency, FarmEfficiency::Curve(_)) => {
            Err(ModelError::configuration(
                "the constant efficiency model needs a constant wind farm efficiency, got a curve",
            ))
        }
        (WakeLossesModel::PowerEfficiencyCurve, FarmEfficiency::Constant(_)) => {
            Err(ModelError::configuration(
                "the power efficiency curve model needs a wind farm efficiency curve, \
                 got a constant",
            ))
        }
        (model, _) => Err(ModelError::configuration(format!(
            "`{model}` is not applied to the aggregated power curve"
        ))),
    }
}

/// Named wind efficiency curve from the built-in catalog.
#[derive(Clone, Debug, PartialEq)]
pub struct WindEfficiencyCurve {
    pub name: String,
    pub curve: CoefficientCurve,
}

#[derive(serde::Deserialize)]
struct Catalog {
    curve: Vec<CatalogEntry>,
}

#[derive(serde::Deserialize)]
struct CatalogEntry {
    name: String,
    wind_speed: Vec<f64>,
    efficiency: Vec<f64>,
}

impl WindEfficiencyCurve {
    fn catalog() -> Result<Catalog, ModelError> {
        toml::from_str(CATALOG).map_err(|error| {
            ModelError::configuration(format!("malformed wind efficiency curve catalog: {error}"))
        })
    }

    /// Look up the curve by its name.
    pub fn find(name: &str) -> Result<Self, ModelError> {
        let entry = Self::catalog()?
            .curve
            .into_iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| ModelError::UnknownWindEfficiencyCurve(name.to_owned()))?;
        Ok(Self {
            curve: CoefficientCurve::try_from_columns(&entry.wind_speed, &entry.efficiency)?,
            name: entry.name,
        })
    }

    /// Names of all the catalog curves.
    pub fn names() -> Result<Vec<String>, ModelError> {
        Ok(Self::catalog()?.curve.into_iter().map(|entry| entry.name).collect())
    }

    /// All the catalog curves.
    pub fn all() -> Result<Vec<Self>, ModelError> {
        Self::names()?.iter().map(|name| Self::find(name)).try_collect()
    }

    /// Multiply each wind speed by the efficiency at that wind speed,
    /// clamped to the curve ends.
    pub fn reduce_wind_speed(&self, wind_speeds: &[MetresPerSecond]) -> Vec<MetresPerSecond> {
        wind_speeds
            .iter()
            .map(|wind_speed| *wind_speed * self.curve.at(*wind_speed, Extrapolation::Nearest))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{core::curve::tests::small_power_curve, quantity::power::Watts};

    #[test]
    fn test_parse_model() {
        assert_eq!("none".parse::<WakeLossesModel>().unwrap(), WakeLossesModel::None);
        assert_eq!(
            "constant_efficiency".parse::<WakeLossesModel>().unwrap(),
            WakeLossesModel::ConstantEfficiency,
        );
        assert_eq!(
            "knorr_mean".parse::<WakeLossesModel>().unwrap(),
            WakeLossesModel::NamedCurve("knorr_mean".to_owned()),
        );
        assert!("".parse::<WakeLossesModel>().is_err());
    }

    #[test]
    fn test_default_model() {
        assert_eq!(WakeLossesModel::default().to_string(), "dena_mean");
        assert!(!WakeLossesModel::default().is_embedded());
        assert!(WakeLossesModel::None.is_embedded());
    }

    #[test]
    fn test_catalog_names() {
        assert_eq!(
            WindEfficiencyCurve::names().unwrap(),
            [
                "dena_mean",
                "knorr_mean",
                "dena_extreme1",
                "dena_extreme2",
                "knorr_extreme1",
                "knorr_extreme2",
                "knorr_extreme3",
            ],
        );
    }

    #[test]
    fn test_catalog_is_valid() {
        for curve in WindEfficiencyCurve::all().unwrap() {
            let is_efficiency = |value: &f64| (0.0..=1.0).contains(value);
            assert!(curve.curve.values().all(|value| is_efficiency(&value)), "{}", curve.name);
        }
    }

    #[test]
    fn test_find_unknown() {
        assert!(matches!(
            WindEfficiencyCurve::find("dena_typo"),
            Err(ModelError::UnknownWindEfficiencyCurve(name)) if name == "dena_typo",
        ));
    }

    #[test]
    fn test_reduce_wind_speed() {
        let curve = WindEfficiencyCurve {
            name: "test".to_owned(),
            curve: CoefficientCurve::try_from_columns(&[2.0, 10.0], &[0.5, 0.9]).unwrap(),
        };
        let reduced = curve.reduce_wind_speed(&[
            MetresPerSecond(1.0),
            MetresPerSecond(6.0),
            MetresPerSecond(20.0),
        ]);
        assert_abs_diff_eq!(reduced[0].0, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(reduced[1].0, 4.2, epsilon = 1e-9);
        assert_abs_diff_eq!(reduced[2].0, 18.0, epsilon = 1e-9);
    }

    #[test]
    fn test_constant_efficiency() {
        let curve = apply_to_power_curve(
            &small_power_curve(),
            &WakeLossesModel::ConstantEfficiency,
            &FarmEfficiency::Constant(0.9),
        )
        .unwrap();
        assert_abs_diff_eq!(curve.last().1.0, 2_700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_power_efficiency_curve() {
        let efficiency = CoefficientCurve::try_from_columns(&[4.0, 5.0], &[0.5, 1.0]).unwrap();
        let curve = apply_to_power_curve(
            &small_power_curve(),
            &WakeLossesModel::PowerEfficiencyCurve,
            &FarmEfficiency::Curve(efficiency),
        )
        .unwrap();
        // The 3 m/s point is below the efficiency curve and gets dropped:
        assert_eq!(
            curve.points(),
            [
                (MetresPerSecond(4.0), Watts(500.0)),
                (MetresPerSecond(5.0), Watts(3_000.0)),
                (MetresPerSecond(15.0), Watts(3_000.0)),
            ],
        );
    }

    #[test]
    fn test_mismatching_efficiency() {
        let result = apply_to_power_curve(
            &small_power_curve(),
            &WakeLossesModel::PowerEfficiencyCurve,
            &FarmEfficiency::Constant(0.9),
        );
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }
}
