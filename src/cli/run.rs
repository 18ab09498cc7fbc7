use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{cluster::ClusterArgs, plant::PlantArgs},
    core::{chain::AtmosphericResolver, plant::PowerPlant},
    io::{
        output::{OutputFormat, write_power_output},
        weather::read_weather,
    },
    prelude::*,
    tables::{build_fleet_table, build_plant_table, build_power_output_table},
};

#[derive(Parser)]
pub struct RunArgs {
    #[clap(flatten)]
    plant: PlantArgs,

    /// Weather CSV with the variable and height header rows.
    #[clap(long = "weather-path", env = "WEATHER_PATH")]
    weather_path: PathBuf,

    /// Save the power output into the file instead of printing the table.
    #[clap(long = "output-path", env = "OUTPUT_PATH")]
    output_path: Option<PathBuf>,

    #[clap(long = "output-format", default_value = "csv", env = "OUTPUT_FORMAT")]
    output_format: OutputFormat,

    #[clap(flatten)]
    cluster: ClusterArgs,
}

impl RunArgs {
    #[instrument(skip_all, name = "Running the model chain…")]
    pub fn run(&self) -> Result {
        let (mut plant, model) = self.plant.load()?;
        let weather = read_weather(&self.weather_path)?;
        ensure!(!weather.is_empty(), "the weather has no rows");

        let mut chain = self.cluster.model_chain(&mut plant, &model);
        info!(
            plant = chain.power_plant().name(),
            wake_losses_model = %chain.wake_losses_model(),
            wind_speed_model = %chain.resolver().config().wind_speed_model,
            power_output_model = %chain.resolver().config().power_output_model,
            "running…",
        );
        chain.run_model(&weather)?;
        let power_output = chain.power_output().context("the model run produced no power output")?;

        match &self.output_path {
            Some(path) => {
                write_power_output(power_output, path, self.output_format)?;
            }
            None => {
                let nominal_power = chain.power_plant().nominal_power();
                println!("{}", build_power_output_table(power_output, nominal_power));
            }
        }
        if let Some(table) = build_fleet_table(chain.power_plant()) {
            println!("{table}");
        }
        println!("{}", build_plant_table(chain.power_plant()));
        Ok(())
    }
}
