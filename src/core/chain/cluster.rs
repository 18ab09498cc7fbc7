use bon::Builder;

use crate::{
    core::{
        chain::AtmosphericResolver,
        curve::PowerCurve,
        plant::{AggregationParameters, PowerPlant},
        series::{Align, Series},
        smoothing::{SmoothingOrder, StandardDeviationMethod},
        wake_losses::{WakeLossesModel, WindEfficiencyCurve},
        weather::{Variable, Weather},
    },
    error::ModelError,
    prelude::*,
    quantity::{length::Metres, power::Watts, speed::MetresPerSecond},
};

/// Power output of a wind farm or a wind turbine cluster.
///
/// The chain borrows the plant and replaces its power curve on every run,
/// so that the curve actually used stays inspectable afterwards.
#[derive(Builder)]
pub struct TurbineClusterModelChain<'p, P: PowerPlant + ?Sized, R: AtmosphericResolver> {
    power_plant: &'p mut P,

    /// Hub-height conditions and the final power output calculation.
    resolver: R,

    #[builder(default)]
    wake_losses_model: WakeLossesModel,

    #[builder(default)]
    smoothing: bool,

    #[builder(default = MetresPerSecond(0.5))]
    block_width: MetresPerSecond,

    #[builder(default)]
    standard_deviation_method: StandardDeviationMethod,

    #[builder(default)]
    smoothing_order: SmoothingOrder,

    #[builder(skip)]
    power_curve: Option<PowerCurve>,

    #[builder(skip)]
    power_output: Option<Series<Watts>>,
}

impl<P: PowerPlant + ?Sized, R: AtmosphericResolver> TurbineClusterModelChain<'_, P, R> {
    pub fn power_plant(&self) -> &P {
        self.power_plant
    }

    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    pub const fn wake_losses_model(&self) -> &WakeLossesModel {
        &self.wake_losses_model
    }

    /// The aggregated curve used by the last run.
    pub const fn power_curve(&self) -> Option<&PowerCurve> {
        self.power_curve.as_ref()
    }

    /// Power output of the last run, aligned with the weather index.
    pub const fn power_output(&self) -> Option<&Series<Watts>> {
        self.power_output.as_ref()
    }

    /// Wake losses the aggregation applies itself.
    ///
    /// Named curves are applied to the wind speed later.
    fn aggregated_wake_losses_model(&self) -> WakeLossesModel {
        if self.wake_losses_model.is_embedded() {
            self.wake_losses_model.clone()
        } else {
            WakeLossesModel::None
        }
    }

    /// Aggregate the plant's power curve for the weather.
    #[instrument(
        skip_all,
        name = "Assigning the power curve…",
        fields(plant = self.power_plant.name()),
    )]
    pub fn assign_power_curve(&mut self, weather: &Weather) -> Result<&mut Self, ModelError> {
        let turbulence_intensity = weather.mean_of(Variable::TurbulenceIntensity);
        let roughness_length = weather
            .first_column(Variable::RoughnessLength, "turbulence intensity estimation")
            .ok()
            .and_then(|(_, roughness_length)| roughness_length.first().copied())
            .map(Metres);

        match &self.wake_losses_model {
            WakeLossesModel::None => debug!("wake losses in wind farms are not considered"),
            model if model.is_embedded() => debug!(%model, "wake losses considered"),
            model => debug!(%model, "wake losses considered by the wind efficiency curve"),
        }
        let parameters = AggregationParameters {
            wake_losses_model: self.aggregated_wake_losses_model(),
            smoothing: self.smoothing,
            block_width: self.block_width,
            standard_deviation_method: self.standard_deviation_method,
            smoothing_order: self.smoothing_order,
            turbulence_intensity,
            roughness_length,
        };
        self.power_plant.assign_power_curve(&parameters)?;

        if self.smoothing {
            debug!(
                method = ?self.standard_deviation_method,
                order = ?self.smoothing_order,
                "aggregated power curve smoothed",
            );
        } else {
            debug!("aggregated power curve not smoothed");
        }
        self.power_curve = self.power_plant.power_curve().cloned();
        Ok(self)
    }

    /// Calculate the power output for the weather.
    #[instrument(
        skip_all,
        name = "Calculating the power output…",
        fields(plant = self.power_plant.name(), n_rows = weather.len()),
    )]
    pub fn run_model(&mut self, weather: &Weather) -> Result<&mut Self, ModelError> {
        // A failed run leaves no output to pair with the newly assigned curve:
        self.power_output = None;
        self.assign_power_curve(weather)?;
        let hub_height = self.power_plant.mean_hub_height()?;
        debug!(%hub_height, "mean hub height");

        let mut wind_speed_hub = self.resolver.wind_speed_hub(weather, hub_height)?;
        let density_hub = if self.resolver.config().needs_density() {
            Some(self.resolver.density_hub(weather, hub_height)?)
        } else {
            None
        };
        if let WakeLossesModel::NamedCurve(name) = &self.wake_losses_model {
            wind_speed_hub = WindEfficiencyCurve::find(name)?.reduce_wind_speed(&wind_speed_hub);
        }

        let power_output = self.resolver.calculate_power_output(
            &*self.power_plant,
            &wind_speed_hub,
            density_hub.as_deref(),
        )?;
        if power_output.len() != weather.len() {
            return Err(ModelError::shape_mismatch(format!(
                "{} power output values for {} timestamps",
                power_output.len(),
                weather.len(),
            )));
        }
        info!(
            total = %power_output.iter().copied().sum::<Watts>(),
            max = %power_output.iter().copied().max().unwrap_or(Watts::ZERO),
            "calculated the power output",
        );
        self.power_output = Some(power_output.align(weather.index()).collect());
        Ok(self)
    }
}
