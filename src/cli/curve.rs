use std::path::PathBuf;

use clap::Parser;

use crate::{
    cli::{cluster::ClusterArgs, plant::PlantArgs},
    core::{plant::PowerPlant, weather::Weather},
    io::weather::read_weather,
    prelude::*,
    tables::{build_fleet_table, build_plant_table, build_power_curve_table},
};

#[derive(Parser)]
pub struct CurveArgs {
    #[clap(flatten)]
    plant: PlantArgs,

    /// Weather for the turbulence intensity and roughness length, needed only for smoothing.
    #[clap(long = "weather-path", env = "WEATHER_PATH")]
    weather_path: Option<PathBuf>,

    #[clap(flatten)]
    cluster: ClusterArgs,
}

impl CurveArgs {
    #[instrument(skip_all, name = "Building the power curve…")]
    pub fn run(&self) -> Result {
        let (mut plant, model) = self.plant.load()?;
        let weather = match &self.weather_path {
            Some(path) => read_weather(path)?,
            None => Weather::default(),
        };

        let mut chain = self.cluster.model_chain(&mut plant, &model);
        chain.assign_power_curve(&weather)?;
        let power_curve = chain.power_curve().context("the plant has no power curve")?;
        println!(
            "{}",
            build_power_curve_table(power_curve, chain.power_plant().nominal_power())
        );
        if let Some(table) = build_fleet_table(chain.power_plant()) {
            println!("{table}");
        }
        println!("{}", build_plant_table(chain.power_plant()));
        Ok(())
    }
}
