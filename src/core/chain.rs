pub mod cluster;

use bon::Builder;

use crate::{
    core::{
        plant::PowerPlant,
        power_output,
        profile,
        weather::{Variable, Weather},
    },
    error::ModelError,
    prelude::*,
    quantity::{
        density::KilogramsPerCubicMetre,
        length::Metres,
        power::Watts,
        speed::MetresPerSecond,
        temperature::Kelvin,
    },
};

macro_rules! model_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$variant_meta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Copy,
            Clone,
            Debug,
            Default,
            Eq,
            PartialEq,
            clap::ValueEnum,
            serde::Deserialize,
        )]
        #[serde(rename_all = "snake_case")]
        #[value(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$variant_meta])* $variant),+
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

model_enum! {
    /// Wind speed at hub height.
    WindSpeedModel {
        #[default]
        Logarithmic => "logarithmic",
        Hellman => "hellman",
        InterpolationExtrapolation => "interpolation_extrapolation",
        LogInterpolationExtrapolation => "log_interpolation_extrapolation",
    }
}

model_enum! {
    /// Air temperature at hub height.
    TemperatureModel {
        #[default]
        LinearGradient => "linear_gradient",
        InterpolationExtrapolation => "interpolation_extrapolation",
    }
}

model_enum! {
    /// Air density at hub height.
    DensityModel {
        #[default]
        Barometric => "barometric",
        IdealGas => "ideal_gas",
        InterpolationExtrapolation => "interpolation_extrapolation",
    }
}

model_enum! {
    /// Power output from the hub-height conditions.
    PowerOutputModel {
        #[default]
        PowerCurve => "power_curve",
        PowerCoefficientCurve => "power_coefficient_curve",
    }
}

/// Single-plant model chain configuration.
#[derive(Clone, Debug, Builder)]
pub struct Config {
    #[builder(default)]
    pub wind_speed_model: WindSpeedModel,

    #[builder(default)]
    pub temperature_model: TemperatureModel,

    #[builder(default)]
    pub density_model: DensityModel,

    #[builder(default)]
    pub power_output_model: PowerOutputModel,

    /// Use the density-corrected power curve.
    #[builder(default)]
    pub density_correction: bool,

    /// Height of the surrounding obstacles, zero for widely spread ones.
    #[builder(default = Metres::ZERO)]
    pub obstacle_height: Metres,

    /// Hellman exponent, derived from the roughness length when not set.
    pub hellman_exponent: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Whether the power output needs the density at hub height.
    pub const fn needs_density(&self) -> bool {
        !matches!(self.power_output_model, PowerOutputModel::PowerCurve) || self.density_correction
    }
}

/// Hub-height conditions and power output of a single power plant.
pub trait AtmosphericResolver {
    fn config(&self) -> &Config;

    fn wind_speed_hub(
        &self,
        weather: &Weather,
        hub_height: Metres,
    ) -> Result<Vec<MetresPerSecond>, ModelError>;

    fn temperature_hub(
        &self,
        weather: &Weather,
        hub_height: Metres,
    ) -> Result<Vec<Kelvin>, ModelError>;

    fn density_hub(
        &self,
        weather: &Weather,
        hub_height: Metres,
    ) -> Result<Vec<KilogramsPerCubicMetre>, ModelError>;

    fn calculate_power_output<P: PowerPlant + ?Sized>(
        &self,
        power_plant: &P,
        wind_speed_hub: &[MetresPerSecond],
        density_hub: Option<&[KilogramsPerCubicMetre]>,
    ) -> Result<Vec<Watts>, ModelError>;
}

/// The base resolver: vertical profiles and power output as configured.
#[derive(Clone, Debug, Default)]
pub struct ModelChain {
    config: Config,
}

impl ModelChain {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

fn typed<T: From<f64>>(values: &[f64]) -> impl Iterator<Item = T> {
    values.iter().copied().map(T::from)
}

/// Interpolate every sample between the two columns closest to the hub height.
fn interpolated<T: From<f64>>(
    weather: &Weather,
    variable: Variable,
    hub_height: Metres,
    logarithmic: bool,
) -> Result<Vec<T>, ModelError> {
    let model =
        if logarithmic { "log_interpolation_extrapolation" } else { "interpolation_extrapolation" };
    let [(first_height, first), (second_height, second)] =
        weather.two_closest(variable, hub_height, model)?;
    let interpolate = if logarithmic {
        profile::logarithmic_interpolation_extrapolation
    } else {
        profile::linear_interpolation_extrapolation
    };
    Ok(first
        .iter()
        .zip(second)
        .map(|(first, second)| {
            T::from(interpolate((first_height, *first), (second_height, *second), hub_height))
        })
        .collect())
}

impl AtmosphericResolver for ModelChain {
    fn config(&self) -> &Config {
        &self.config
    }

    fn wind_speed_hub(
        &self,
        weather: &Weather,
        hub_height: Metres,
    ) -> Result<Vec<MetresPerSecond>, ModelError> {
        if let Some(wind_speed) = weather.column(Variable::WindSpeed, hub_height) {
            debug!(%hub_height, "wind speed measured at hub height");
            return Ok(typed(wind_speed).collect());
        }
        let model = self.config.wind_speed_model;
        debug!(%model, %hub_height, "calculating the wind speed at hub height…");
        match model {
            WindSpeedModel::Logarithmic => {
                let (data_height, wind_speed) =
                    weather.closest(Variable::WindSpeed, hub_height, model.as_str())?;
                let (_, roughness_length) =
                    weather.first_column(Variable::RoughnessLength, model.as_str())?;
                profile::ensure_above_obstacles(data_height, self.config.obstacle_height)?;
                Ok(typed(wind_speed)
                    .zip(typed(roughness_length))
                    .map(|(wind_speed, roughness_length)| {
                        profile::logarithmic(
                            wind_speed,
                            data_height,
                            hub_height,
                            roughness_length,
                            self.config.obstacle_height,
                        )
                    })
                    .collect())
            }
            WindSpeedModel::Hellman => {
                let (data_height, wind_speed) =
                    weather.closest(Variable::WindSpeed, hub_height, model.as_str())?;
                let roughness_length = weather
                    .first_column(Variable::RoughnessLength, model.as_str())
                    .ok()
                    .map(|(_, roughness_length)| roughness_length);
                Ok(typed(wind_speed)
                    .enumerate()
                    .map(|(i, wind_speed)| {
                        profile::hellman(
                            wind_speed,
                            data_height,
                            hub_height,
                            roughness_length.map(|roughness_length| Metres(roughness_length[i])),
                            self.config.hellman_exponent,
                        )
                    })
                    .collect())
            }
            WindSpeedModel::InterpolationExtrapolation => {
                interpolated(weather, Variable::WindSpeed, hub_height, false)
            }
            WindSpeedModel::LogInterpolationExtrapolation => {
                interpolated(weather, Variable::WindSpeed, hub_height, true)
            }
        }
    }

    fn temperature_hub(
        &self,
        weather: &Weather,
        hub_height: Metres,
    ) -> Result<Vec<Kelvin>, ModelError> {
        if let Some(temperature) = weather.column(Variable::Temperature, hub_height) {
            return Ok(typed(temperature).collect());
        }
        let model = self.config.temperature_model;
        debug!(%model, %hub_height, "calculating the temperature at hub height…");
        match model {
            TemperatureModel::LinearGradient => {
                let (data_height, temperature) =
                    weather.closest(Variable::Temperature, hub_height, model.as_str())?;
                Ok(typed(temperature)
                    .map(|temperature| {
                        profile::linear_gradient(temperature, data_height, hub_height)
                    })
                    .collect())
            }
            TemperatureModel::InterpolationExtrapolation => {
                interpolated(weather, Variable::Temperature, hub_height, false)
            }
        }
    }

    fn density_hub(
        &self,
        weather: &Weather,
        hub_height: Metres,
    ) -> Result<Vec<KilogramsPerCubicMetre>, ModelError> {
        if let Some(density) = weather.column(Variable::Density, hub_height) {
            return Ok(typed(density).collect());
        }
        let model = self.config.density_model;
        debug!(%model, %hub_height, "calculating the density at hub height…");
        let equation = match model {
            DensityModel::Barometric => profile::barometric,
            DensityModel::IdealGas => profile::ideal_gas,
            DensityModel::InterpolationExtrapolation => {
                return interpolated(weather, Variable::Density, hub_height, false);
            }
        };
        let (pressure_height, pressure) =
            weather.closest(Variable::Pressure, hub_height, model.as_str())?;
        let temperature_hub = self.temperature_hub(weather, hub_height)?;
        Ok(typed(pressure)
            .zip(temperature_hub)
            .map(|(pressure, temperature_hub)| {
                equation(pressure, pressure_height, hub_height, temperature_hub)
            })
            .collect())
    }

    fn calculate_power_output<P: PowerPlant + ?Sized>(
        &self,
        power_plant: &P,
        wind_speed_hub: &[MetresPerSecond],
        density_hub: Option<&[KilogramsPerCubicMetre]>,
    ) -> Result<Vec<Watts>, ModelError> {
        match self.config.power_output_model {
            PowerOutputModel::PowerCurve => {
                let power_curve = power_plant.power_curve().ok_or_else(|| {
                    ModelError::configuration(format!(
                        "`{}` has no power curve assigned",
                        power_plant.name()
                    ))
                })?;
                power_output::power_curve(
                    wind_speed_hub,
                    power_curve,
                    density_hub,
                    self.config.density_correction,
                )
            }
            PowerOutputModel::PowerCoefficientCurve => {
                if self.config.density_correction {
                    warn!("the density correction does not apply to the power coefficient curve");
                }
                let power_coefficient_curve =
                    power_plant.power_coefficient_curve().ok_or_else(|| {
                        ModelError::configuration(format!(
                            "`{}` has no power coefficient curve, \
                             only single turbines may have one",
                            power_plant.name()
                        ))
                    })?;
                let rotor_diameter = power_plant.rotor_diameter().ok_or_else(|| {
                    ModelError::configuration(format!(
                        "`{}` needs a rotor diameter for the power coefficient curve",
                        power_plant.name()
                    ))
                })?;
                let density_hub = density_hub.ok_or_else(|| {
                    ModelError::configuration(
                        "the power coefficient curve needs the density at hub height",
                    )
                })?;
                power_output::power_coefficient_curve(
                    wind_speed_hub,
                    power_coefficient_curve,
                    rotor_diameter,
                    density_hub,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::{
        curve::CoefficientCurve,
        plant::{farm::tests::small_farm, turbine::WindTurbine},
        weather::tests::two_hours,
    };

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.wind_speed_model, WindSpeedModel::Logarithmic);
        assert_eq!(config.temperature_model, TemperatureModel::LinearGradient);
        assert_eq!(config.density_model, DensityModel::Barometric);
        assert_eq!(config.power_output_model, PowerOutputModel::PowerCurve);
        assert!(!config.density_correction);
        assert_eq!(config.obstacle_height, Metres::ZERO);
        assert!(!config.needs_density());
    }

    #[test]
    fn test_needs_density() {
        assert!(Config::builder().density_correction(true).build().needs_density());
        assert!(
            Config::builder()
                .power_output_model(PowerOutputModel::PowerCoefficientCurve)
                .build()
                .needs_density()
        );
    }

    #[test]
    fn test_wind_speed_logarithmic() {
        let wind_speed = ModelChain::default().wind_speed_hub(&two_hours(), Metres(100.0)).unwrap();
        // From 80 metres, the closest height:
        assert_abs_diff_eq!(
            wind_speed[0].0,
            8.0 * (100.0_f64 / 0.15).ln() / (80.0_f64 / 0.15).ln(),
            epsilon = 1e-9,
        );
        assert_eq!(wind_speed.len(), 2);
    }

    #[test]
    fn test_wind_speed_at_hub_height() {
        let wind_speed = ModelChain::default().wind_speed_hub(&two_hours(), Metres(80.0)).unwrap();
        assert_eq!(wind_speed, [MetresPerSecond(8.0), MetresPerSecond(9.0)]);
    }

    #[test]
    fn test_wind_speed_interpolation() {
        let resolver = ModelChain::new(
            Config::builder()
                .wind_speed_model(WindSpeedModel::InterpolationExtrapolation)
                .build(),
        );
        let wind_speed = resolver.wind_speed_hub(&two_hours(), Metres(45.0)).unwrap();
        assert_abs_diff_eq!(wind_speed[0].0, 6.5, epsilon = 1e-9);
        assert_abs_diff_eq!(wind_speed[1].0, 7.75, epsilon = 1e-9);
    }

    #[test]
    fn test_wind_speed_hellman() {
        let resolver = ModelChain::new(
            Config::builder()
                .wind_speed_model(WindSpeedModel::Hellman)
                .hellman_exponent(0.2)
                .build(),
        );
        let wind_speed = resolver.wind_speed_hub(&two_hours(), Metres(160.0)).unwrap();
        assert_abs_diff_eq!(wind_speed[0].0, 8.0 * 2.0_f64.powf(0.2), epsilon = 1e-9);
    }

    #[test]
    fn test_wind_speed_obstacle_too_high() {
        let resolver = ModelChain::new(Config::builder().obstacle_height(Metres(200.0)).build());
        assert!(matches!(
            resolver.wind_speed_hub(&two_hours(), Metres(100.0)),
            Err(ModelError::ObstacleTooHigh { .. }),
        ));
    }

    #[test]
    fn test_temperature_linear_gradient() {
        let temperature =
            ModelChain::default().temperature_hub(&two_hours(), Metres(100.0)).unwrap();
        assert_abs_diff_eq!(temperature[0].0, 267.5 - 0.0065 * 90.0, epsilon = 1e-9);
    }

    #[test]
    fn test_density_barometric() {
        let density = ModelChain::default().density_hub(&two_hours(), Metres(100.0)).unwrap();
        assert_eq!(density.len(), 2);
        assert!(density.iter().all(|density| density.0 > 1.2 && density.0 < 1.4));
    }

    #[test]
    fn test_density_missing_pressure() {
        let weather = Weather::new(two_hours().index().to_vec())
            .with_column(Variable::Temperature, Metres(2.0), vec![267.0, 268.0])
            .unwrap();
        assert!(matches!(
            ModelChain::default().density_hub(&weather, Metres(100.0)),
            Err(ModelError::MissingData { variable: Variable::Pressure, model: "barometric" }),
        ));
    }

    #[test]
    fn test_density_interpolation_single_height() {
        let resolver = ModelChain::new(
            Config::builder().density_model(DensityModel::InterpolationExtrapolation).build(),
        );
        let weather = two_hours()
            .with_column(Variable::Density, Metres(10.0), vec![1.2, 1.3])
            .unwrap();
        assert!(matches!(
            resolver.density_hub(&weather, Metres(100.0)),
            Err(ModelError::ShapeMismatch(_)),
        ));
    }

    #[test]
    fn test_power_coefficient_curve_needs_turbine() {
        let resolver = ModelChain::new(
            Config::builder().power_output_model(PowerOutputModel::PowerCoefficientCurve).build(),
        );
        let density = [KilogramsPerCubicMetre::STANDARD];
        let result = resolver.calculate_power_output(
            &small_farm(None),
            &[MetresPerSecond(5.0)],
            Some(density.as_slice()),
        );
        assert!(matches!(result, Err(ModelError::Configuration(_))));
    }

    #[test]
    fn test_power_coefficient_curve() {
        let turbine = WindTurbine::builder()
            .turbine_type("C")
            .hub_height(Metres(100.0))
            .nominal_power(Watts(5_000.0))
            .rotor_diameter(Metres(10.0))
            .power_coefficient_curve(
                CoefficientCurve::try_from_columns(&[0.0, 25.0], &[0.4, 0.4]).unwrap(),
            )
            .build()
            .unwrap();
        let resolver = ModelChain::new(
            Config::builder().power_output_model(PowerOutputModel::PowerCoefficientCurve).build(),
        );
        let density = [KilogramsPerCubicMetre(1.0)];
        let power = resolver
            .calculate_power_output(&turbine, &[MetresPerSecond(2.0)], Some(density.as_slice()))
            .unwrap();
        let expected = std::f64::consts::PI * 100.0 * 8.0 * 0.4 / 8.0;
        assert_abs_diff_eq!(power[0].0, expected, epsilon = 1e-9);
    }
}
