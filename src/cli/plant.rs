use std::path::PathBuf;

use clap::Parser;

use crate::{
    core::plant::Plant,
    io::plant::{ModelSection, PlantFile},
    prelude::*,
};

#[derive(Parser)]
pub struct PlantArgs {
    /// TOML file with the turbines, wind farms, and the cluster.
    #[clap(long = "plant-path", env = "PLANT_PATH")]
    path: PathBuf,

    /// Cluster name, wind farm name, or turbine type. By default, the cluster or the only farm.
    #[clap(long = "plant", env = "PLANT")]
    name: Option<String>,
}

impl PlantArgs {
    /// Load the plant along with the model options stored in the plant file.
    pub fn load(&self) -> Result<(Plant, ModelSection)> {
        let plant_file = PlantFile::read(&self.path)?;
        let plant = plant_file.build(self.name.as_deref())?;
        Ok((plant, plant_file.model().clone()))
    }
}
