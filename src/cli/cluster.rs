use clap::Parser;

use crate::{
    core::{
        chain::{
            Config,
            DensityModel,
            ModelChain,
            PowerOutputModel,
            TemperatureModel,
            WindSpeedModel,
            cluster::TurbineClusterModelChain,
        },
        plant::PowerPlant,
        smoothing::{SmoothingOrder, StandardDeviationMethod},
        wake_losses::WakeLossesModel,
    },
    io::plant::ModelSection,
    quantity::{length::Metres, speed::MetresPerSecond},
};

/// Model chain options.
///
/// Unset ones fall back to the plant file `[model]` section, then to the defaults.
#[derive(Parser)]
pub struct ClusterArgs {
    /// `none`, `power_efficiency_curve`, `constant_efficiency`, or a wind efficiency curve name,
    /// `dena_mean` by default.
    #[clap(long = "wake-losses-model", env = "WAKE_LOSSES_MODEL")]
    wake_losses_model: Option<WakeLossesModel>,

    /// Smooth the aggregated power curve.
    #[clap(long = "smoothing", env = "SMOOTHING")]
    smoothing: bool,

    /// Width of the smoothing kernel steps, 0.5 m/s by default.
    #[clap(long = "block-width", env = "BLOCK_WIDTH")]
    block_width: Option<MetresPerSecond>,

    /// `turbulence_intensity` by default.
    #[clap(long = "standard-deviation-method", env = "STANDARD_DEVIATION_METHOD")]
    standard_deviation_method: Option<StandardDeviationMethod>,

    /// `wind_farm_power_curves` by default.
    #[clap(long = "smoothing-order", env = "SMOOTHING_ORDER")]
    smoothing_order: Option<SmoothingOrder>,

    /// `logarithmic` by default.
    #[clap(long = "wind-speed-model", env = "WIND_SPEED_MODEL")]
    wind_speed_model: Option<WindSpeedModel>,

    /// `linear_gradient` by default.
    #[clap(long = "temperature-model", env = "TEMPERATURE_MODEL")]
    temperature_model: Option<TemperatureModel>,

    /// `barometric` by default.
    #[clap(long = "density-model", env = "DENSITY_MODEL")]
    density_model: Option<DensityModel>,

    /// `power_curve` by default.
    #[clap(long = "power-output-model", env = "POWER_OUTPUT_MODEL")]
    power_output_model: Option<PowerOutputModel>,

    /// Use the density-corrected power curve.
    #[clap(long = "density-correction", env = "DENSITY_CORRECTION")]
    density_correction: bool,

    /// Height of the surrounding obstacles, zero by default.
    #[clap(long = "obstacle-height", env = "OBSTACLE_HEIGHT")]
    obstacle_height: Option<Metres>,

    /// Hellman exponent, derived from the roughness length when not set.
    #[clap(long = "hellman-exponent", env = "HELLMAN_EXPONENT")]
    hellman_exponent: Option<f64>,
}

impl ClusterArgs {
    fn config(&self, model: &ModelSection) -> Config {
        Config::builder()
            .maybe_wind_speed_model(self.wind_speed_model.or(model.wind_speed_model))
            .maybe_temperature_model(self.temperature_model.or(model.temperature_model))
            .maybe_density_model(self.density_model.or(model.density_model))
            .maybe_power_output_model(self.power_output_model.or(model.power_output_model))
            .density_correction(
                self.density_correction || model.density_correction.unwrap_or_default(),
            )
            .maybe_obstacle_height(self.obstacle_height.or(model.obstacle_height))
            .maybe_hellman_exponent(self.hellman_exponent.or(model.hellman_exponent))
            .build()
    }

    pub fn model_chain<'p, P: PowerPlant + ?Sized>(
        &self,
        power_plant: &'p mut P,
        model: &ModelSection,
    ) -> TurbineClusterModelChain<'p, P, ModelChain> {
        let wake_losses_model =
            self.wake_losses_model.as_ref().or(model.wake_losses_model.as_ref()).cloned();
        TurbineClusterModelChain::builder()
            .power_plant(power_plant)
            .resolver(ModelChain::new(self.config(model)))
            .maybe_wake_losses_model(wake_losses_model)
            .smoothing(self.smoothing || model.smoothing.unwrap_or_default())
            .maybe_block_width(self.block_width.or(model.block_width))
            .maybe_standard_deviation_method(
                self.standard_deviation_method.or(model.standard_deviation_method),
            )
            .maybe_smoothing_order(self.smoothing_order.or(model.smoothing_order))
            .build()
    }
}
