pub mod cluster;
pub mod farm;
pub mod turbine;

use crate::{
    core::{
        curve::{CoefficientCurve, PowerCurve},
        plant::{cluster::WindTurbineCluster, farm::WindFarm, turbine::WindTurbine},
        profile::estimate_turbulence_intensity,
        smoothing::{SmoothingOrder, StandardDeviationMethod, smooth_power_curve},
        wake_losses::WakeLossesModel,
    },
    error::ModelError,
    quantity::{length::Metres, power::Watts, speed::MetresPerSecond},
};

/// How the aggregated power curve gets built.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregationParameters {
    /// Wake losses applied to the aggregated curve, [`WakeLossesModel::None`] to skip them.
    pub wake_losses_model: WakeLossesModel,

    pub smoothing: bool,
    pub block_width: MetresPerSecond,
    pub standard_deviation_method: StandardDeviationMethod,
    pub smoothing_order: SmoothingOrder,

    /// Mean turbulence intensity of the weather, if measured.
    pub turbulence_intensity: Option<f64>,

    /// Roughness length for estimating the turbulence intensity when it is not measured.
    pub roughness_length: Option<Metres>,
}

impl AggregationParameters {
    /// Turbulence intensity for smoothing at the given hub height.
    ///
    /// Only the turbulence intensity method needs it. When it is not measured,
    /// it gets estimated from the roughness length.
    pub fn turbulence_intensity_at(&self, hub_height: Metres) -> Result<Option<f64>, ModelError> {
        if self.standard_deviation_method != StandardDeviationMethod::TurbulenceIntensity
            || self.turbulence_intensity.is_some()
        {
            return Ok(self.turbulence_intensity);
        }
        match self.roughness_length {
            Some(roughness_length) => {
                Ok(Some(estimate_turbulence_intensity(hub_height, roughness_length)))
            }
            None => Err(ModelError::configuration(
                "smoothing with the turbulence intensity method needs \
                 either the turbulence intensity or the roughness length",
            )),
        }
    }

    /// Smooth the curve with these parameters.
    pub fn smooth(
        &self,
        power_curve: &PowerCurve,
        turbulence_intensity: Option<f64>,
    ) -> Result<PowerCurve, ModelError> {
        smooth_power_curve(
            power_curve,
            self.block_width,
            self.standard_deviation_method,
            turbulence_intensity,
        )
    }
}

/// Wind turbine, wind farm, or wind turbine cluster.
///
/// The plant owns its current power curve, which [`PowerPlant::assign_power_curve`] replaces.
pub trait PowerPlant {
    fn name(&self) -> &str;

    /// Hub height, or the mean hub height after [`PowerPlant::mean_hub_height`].
    fn hub_height(&self) -> Option<Metres>;

    fn nominal_power(&self) -> Watts;

    /// The currently assigned power curve.
    fn power_curve(&self) -> Option<&PowerCurve>;

    fn power_coefficient_curve(&self) -> Option<&CoefficientCurve> {
        None
    }

    fn rotor_diameter(&self) -> Option<Metres> {
        None
    }

    /// Build and store the aggregated power curve.
    fn assign_power_curve(&mut self, parameters: &AggregationParameters) -> Result<(), ModelError>;

    /// Calculate and store the mean hub height.
    fn mean_hub_height(&mut self) -> Result<Metres, ModelError>;
}

/// Any power plant, as loaded from the plant file.
#[derive(Clone, Debug, derive_more::From)]
pub enum Plant {
    Turbine(WindTurbine),
    Farm(WindFarm),
    Cluster(WindTurbineCluster),
}

impl Plant {
    fn inner(&self) -> &dyn PowerPlant {
        match self {
            Self::Turbine(turbine) => turbine,
            Self::Farm(farm) => farm,
            Self::Cluster(cluster) => cluster,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PowerPlant {
        match self {
            Self::Turbine(turbine) => turbine,
            Self::Farm(farm) => farm,
            Self::Cluster(cluster) => cluster,
        }
    }
}

impl PowerPlant for Plant {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn hub_height(&self) -> Option<Metres> {
        self.inner().hub_height()
    }

    fn nominal_power(&self) -> Watts {
        self.inner().nominal_power()
    }

    fn power_curve(&self) -> Option<&PowerCurve> {
        self.inner().power_curve()
    }

    fn power_coefficient_curve(&self) -> Option<&CoefficientCurve> {
        self.inner().power_coefficient_curve()
    }

    fn rotor_diameter(&self) -> Option<Metres> {
        self.inner().rotor_diameter()
    }

    fn assign_power_curve(&mut self, parameters: &AggregationParameters) -> Result<(), ModelError> {
        self.inner_mut().assign_power_curve(parameters)
    }

    fn mean_hub_height(&mut self) -> Result<Metres, ModelError> {
        self.inner_mut().mean_hub_height()
    }
}

/// Power-weighted logarithmic mean: `exp(Σ ln(hᵢ) Pᵢ / Σ Pᵢ)`.
pub fn weighted_mean_hub_height(
    hub_heights: impl IntoIterator<Item = (Metres, Watts)>,
) -> Result<Metres, ModelError> {
    let (weighted_sum, total_power) = hub_heights.into_iter().fold(
        (0.0, Watts::ZERO),
        |(weighted_sum, total_power), (hub_height, power)| {
            (weighted_sum + hub_height.ln() * power.0, total_power + power)
        },
    );
    if total_power > Watts::ZERO {
        Ok(Metres((weighted_sum / total_power.0).exp()))
    } else {
        Err(ModelError::configuration(format!(
            "the mean hub height needs positive total nominal power, got {total_power}"
        )))
    }
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    pub fn parameters() -> AggregationParameters {
        AggregationParameters {
            wake_losses_model: WakeLossesModel::None,
            smoothing: false,
            block_width: MetresPerSecond(0.5),
            standard_deviation_method: StandardDeviationMethod::TurbulenceIntensity,
            smoothing_order: SmoothingOrder::WindFarmPowerCurves,
            turbulence_intensity: None,
            roughness_length: None,
        }
    }

    #[test]
    fn test_weighted_mean_hub_height() {
        let hub_height = weighted_mean_hub_height([
            (Metres(100.0), Watts(3_000_000.0)),
            (Metres(80.0), Watts(1_000_000.0)),
        ])
        .unwrap();
        assert_abs_diff_eq!(hub_height.0, 94.574, epsilon = 1e-3);
    }

    #[test]
    fn test_weighted_mean_hub_height_no_power() {
        assert!(weighted_mean_hub_height([(Metres(100.0), Watts::ZERO)]).is_err());
    }

    #[test]
    fn test_turbulence_intensity_measured() {
        let parameters = AggregationParameters { turbulence_intensity: Some(0.1), ..parameters() };
        assert_eq!(parameters.turbulence_intensity_at(Metres(100.0)).unwrap(), Some(0.1));
    }

    #[test]
    fn test_turbulence_intensity_estimated() {
        let parameters =
            AggregationParameters { roughness_length: Some(Metres(0.15)), ..parameters() };
        let intensity = parameters.turbulence_intensity_at(Metres(100.0)).unwrap().unwrap();
        assert_abs_diff_eq!(intensity, 0.15379, epsilon = 1e-5);
    }

    #[test]
    fn test_turbulence_intensity_missing() {
        assert!(parameters().turbulence_intensity_at(Metres(100.0)).is_err());
    }

    #[test]
    fn test_turbulence_intensity_not_needed() {
        let parameters = AggregationParameters {
            standard_deviation_method: StandardDeviationMethod::StaffellPfenninger,
            ..parameters()
        };
        assert_eq!(parameters.turbulence_intensity_at(Metres(100.0)).unwrap(), None);
    }
}
