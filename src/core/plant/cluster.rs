use crate::{
    core::{
        curve::PowerCurve,
        plant::{AggregationParameters, PowerPlant, farm::WindFarm, weighted_mean_hub_height},
    },
    error::ModelError,
    prelude::*,
    quantity::{length::Metres, power::Watts},
};

/// Wind farms which feed into the same grid point, for example.
#[derive(Clone, Debug)]
pub struct WindTurbineCluster {
    name: String,
    wind_farms: Vec<WindFarm>,
    hub_height: Option<Metres>,
    power_curve: Option<PowerCurve>,
}

impl WindTurbineCluster {
    pub fn new(name: impl Into<String>, wind_farms: Vec<WindFarm>) -> Result<Self, ModelError> {
        let name = name.into();
        if wind_farms.is_empty() {
            return Err(ModelError::configuration(format!(
                "wind turbine cluster `{name}` has no wind farms"
            )));
        }
        Ok(Self { name, wind_farms, hub_height: None, power_curve: None })
    }

    pub fn wind_farms(&self) -> &[WindFarm] {
        &self.wind_farms
    }
}

impl PowerPlant for WindTurbineCluster {
    fn name(&self) -> &str {
        &self.name
    }

    fn hub_height(&self) -> Option<Metres> {
        self.hub_height
    }

    fn nominal_power(&self) -> Watts {
        self.wind_farms.iter().map(PowerPlant::nominal_power).sum()
    }

    fn power_curve(&self) -> Option<&PowerCurve> {
        self.power_curve.as_ref()
    }

    /// Assign every wind farm its mean hub height and its own power curve, then sum them up.
    #[instrument(
        skip_all,
        name = "Aggregating the cluster power curve…",
        fields(cluster = %self.name),
    )]
    fn assign_power_curve(&mut self, parameters: &AggregationParameters) -> Result<(), ModelError> {
        for wind_farm in &mut self.wind_farms {
            wind_farm.mean_hub_height()?;
            wind_farm.assign_power_curve(parameters)?;
        }
        let power_curve = PowerCurve::sum(
            self.wind_farms.iter().filter_map(|wind_farm| wind_farm.power_curve()),
        )?;
        debug!(n_farms = self.wind_farms.len(), n_points = power_curve.len(), "aggregated");
        self.power_curve = Some(power_curve);
        Ok(())
    }

    /// Weighted by the wind farm nominal power, each farm's own mean hub height is computed first.
    fn mean_hub_height(&mut self) -> Result<Metres, ModelError> {
        let hub_heights: Vec<(Metres, Watts)> = self
            .wind_farms
            .iter_mut()
            .map(|wind_farm| Ok((wind_farm.mean_hub_height()?, wind_farm.nominal_power())))
            .collect::<Result<_, ModelError>>()?;
        let hub_height = weighted_mean_hub_height(hub_heights)?;
        self.hub_height = Some(hub_height);
        Ok(hub_height)
    }
}
