use bon::bon;
use itertools::Itertools;

use crate::{
    core::{
        curve::PowerCurve,
        plant::{AggregationParameters, PowerPlant, turbine::WindTurbine, weighted_mean_hub_height},
        smoothing::SmoothingOrder,
        wake_losses::{FarmEfficiency, WakeLossesModel, apply_to_power_curve},
    },
    error::ModelError,
    prelude::*,
    quantity::{length::Metres, power::Watts},
};

/// Turbines of the same type in a wind farm.
#[derive(Clone, Debug)]
pub struct FleetEntry {
    pub turbine: WindTurbine,

    /// Number of turbines, may be fractional when derived from the total capacity.
    pub count: f64,
}

impl FleetEntry {
    pub fn new(turbine: WindTurbine, count: f64) -> Result<Self, ModelError> {
        if !count.is_finite() || count <= 0.0 {
            return Err(ModelError::configuration(format!(
                "invalid number of `{}` turbines: {count}",
                turbine.turbine_type
            )));
        }
        Ok(Self { turbine, count })
    }

    /// Derive the turbine count from the total installed capacity.
    pub fn with_total_capacity(
        turbine: WindTurbine,
        total_capacity: Watts,
    ) -> Result<Self, ModelError> {
        let count = total_capacity / turbine.nominal_power();
        Self::new(turbine, count)
    }

    pub fn nominal_power(&self) -> Watts {
        self.turbine.nominal_power() * self.count
    }
}

#[derive(Clone, Debug)]
pub struct WindFarm {
    name: String,
    fleet: Vec<FleetEntry>,
    efficiency: Option<FarmEfficiency>,

    /// Set by [`PowerPlant::mean_hub_height`].
    hub_height: Option<Metres>,

    /// Set by [`PowerPlant::assign_power_curve`].
    power_curve: Option<PowerCurve>,
}

#[bon]
impl WindFarm {
    #[builder]
    pub fn new(
        #[builder(into)] name: String,
        fleet: Vec<FleetEntry>,
        efficiency: Option<FarmEfficiency>,
    ) -> Result<Self, ModelError> {
        if fleet.is_empty() {
            return Err(ModelError::configuration(format!("wind farm `{name}` has no turbines")));
        }
        if let Some(FarmEfficiency::Constant(efficiency)) = efficiency
            && !(0.0..=1.0).contains(&efficiency)
        {
            return Err(ModelError::configuration(format!(
                "wind farm `{name}` has invalid efficiency {efficiency}"
            )));
        }
        Ok(Self { name, fleet, efficiency, hub_height: None, power_curve: None })
    }
}

impl WindFarm {
    pub fn fleet(&self) -> &[FleetEntry] {
        &self.fleet
    }

    pub const fn efficiency(&self) -> Option<&FarmEfficiency> {
        self.efficiency.as_ref()
    }
}

impl PowerPlant for WindFarm {
    fn name(&self) -> &str {
        &self.name
    }

    fn hub_height(&self) -> Option<Metres> {
        self.hub_height
    }

    fn nominal_power(&self) -> Watts {
        self.fleet.iter().map(FleetEntry::nominal_power).sum()
    }

    fn power_curve(&self) -> Option<&PowerCurve> {
        self.power_curve.as_ref()
    }

    /// Aggregate the turbine power curves, scaled by the turbine counts.
    ///
    /// Depending on the parameters, the turbine curves or the aggregated curve get smoothed,
    /// and the farm efficiency gets applied in the end.
    #[instrument(skip_all, name = "Aggregating the farm power curve…", fields(farm = %self.name))]
    fn assign_power_curve(&mut self, parameters: &AggregationParameters) -> Result<(), ModelError> {
        let turbulence_intensity = if parameters.smoothing {
            // Estimated from the first turbine when not measured.
            parameters.turbulence_intensity_at(self.fleet[0].turbine.hub_height)?
        } else {
            parameters.turbulence_intensity
        };
        let turbine_curves: Vec<PowerCurve> = self
            .fleet
            .iter()
            .map(|entry| {
                let power_curve = entry.turbine.try_nominal_power_curve()?;
                let power_curve = if parameters.smoothing
                    && parameters.smoothing_order == SmoothingOrder::TurbinePowerCurves
                {
                    parameters.smooth(power_curve, turbulence_intensity)?
                } else {
                    power_curve.padded_with_zeros()
                };
                Ok::<_, ModelError>(power_curve.scaled(entry.count))
            })
            .try_collect()?;
        let mut power_curve = PowerCurve::sum(&turbine_curves)?;

        if parameters.smoothing
            && parameters.smoothing_order == SmoothingOrder::WindFarmPowerCurves
        {
            power_curve = parameters.smooth(&power_curve, turbulence_intensity)?;
        }
        match (&parameters.wake_losses_model, &self.efficiency) {
            (WakeLossesModel::None | WakeLossesModel::NamedCurve(_), _) => {}
            (model, Some(efficiency)) => {
                power_curve = apply_to_power_curve(&power_curve, model, efficiency)?;
            }
            (model, None) => {
                info!(%model, "the wind farm has no efficiency, wake losses are not considered");
            }
        }

        debug!(n_points = power_curve.len(), max = %power_curve.max_value(), "aggregated");
        self.power_curve = Some(power_curve);
        Ok(())
    }

    fn mean_hub_height(&mut self) -> Result<Metres, ModelError> {
        let hub_height = weighted_mean_hub_height(
            self.fleet.iter().map(|entry| (entry.turbine.hub_height, entry.nominal_power())),
        )?;
        self.hub_height = Some(hub_height);
        Ok(hub_height)
    }
}
