//! Plant file: turbines, wind farms built from them, and an optional cluster of the farms.
//!
//! ```toml
//! [[turbine]]
//! type = "E-126/4200"
//! hub_height = 135.0
//! power_curve = { wind_speed = [3.0, 13.0, 25.0], value = [0.0, 4.2e6, 4.2e6] }
//!
//! [[farm]]
//! name = "north"
//! efficiency = 0.9
//! fleet = [{ turbine = "E-126/4200", count = 6 }]
//!
//! [model]
//! wake_losses_model = "constant_efficiency"
//! wind_speed_model = "hellman"
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    core::{
        chain::{DensityModel, PowerOutputModel, TemperatureModel, WindSpeedModel},
        curve::Curve,
        plant::{
            Plant,
            cluster::WindTurbineCluster,
            farm::{FleetEntry, WindFarm},
            turbine::WindTurbine,
        },
        smoothing::{SmoothingOrder, StandardDeviationMethod},
        wake_losses::{FarmEfficiency, WakeLossesModel},
    },
    prelude::*,
    quantity::{length::Metres, power::Watts, speed::MetresPerSecond},
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlantFile {
    #[serde(default, rename = "turbine")]
    turbines: Vec<TurbineSection>,

    #[serde(default, rename = "farm")]
    farms: Vec<FarmSection>,

    cluster: Option<ClusterSection>,

    #[serde(default)]
    model: ModelSection,
}

/// Model chain options stored along with the plant, overridden by the command line.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    pub wake_losses_model: Option<WakeLossesModel>,
    pub smoothing: Option<bool>,
    pub block_width: Option<MetresPerSecond>,
    pub standard_deviation_method: Option<StandardDeviationMethod>,
    pub smoothing_order: Option<SmoothingOrder>,
    pub wind_speed_model: Option<WindSpeedModel>,
    pub temperature_model: Option<TemperatureModel>,
    pub density_model: Option<DensityModel>,
    pub power_output_model: Option<PowerOutputModel>,
    pub density_correction: Option<bool>,
    pub obstacle_height: Option<Metres>,
    pub hellman_exponent: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TurbineSection {
    #[serde(rename = "type")]
    turbine_type: String,

    hub_height: Metres,
    nominal_power: Option<Watts>,
    rotor_diameter: Option<Metres>,
    power_curve: Option<CurveSection>,
    power_coefficient_curve: Option<CurveSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CurveSection {
    wind_speed: Vec<f64>,
    value: Vec<f64>,
}

impl CurveSection {
    fn build<V: Copy + From<f64> + Into<f64>>(&self) -> Result<Curve<V>> {
        Ok(Curve::try_from_columns(&self.wind_speed, &self.value)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FarmSection {
    name: String,
    fleet: Vec<FleetSection>,
    efficiency: Option<EfficiencySection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FleetSection {
    turbine: String,
    count: Option<f64>,
    total_capacity: Option<Watts>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EfficiencySection {
    Constant(f64),
    Curve(CurveSection),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClusterSection {
    name: String,

    /// Farm names, all the farms by default.
    farms: Option<Vec<String>>,
}

impl PlantFile {
    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read the plant file `{}`", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("invalid plant file `{}`", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let this: Self = toml::from_str(text)?;
        info!(
            n_turbines = this.turbines.len(),
            n_farms = this.farms.len(),
            has_cluster = this.cluster.is_some(),
            wake_losses_model = ?this.model.wake_losses_model,
            "loaded the plant file",
        );
        Ok(this)
    }

    pub const fn model(&self) -> &ModelSection {
        &self.model
    }

    /// Build the plant with the given name: the cluster, a farm, or a turbine type.
    ///
    /// Without a name, the cluster is taken if defined,
    /// otherwise the only farm or the only turbine.
    #[instrument(skip_all, name = "Building the plant…", fields(plant = name))]
    pub fn build(&self, name: Option<&str>) -> Result<Plant> {
        let Some(name) = name else {
            return self.build_default();
        };
        if let Some(cluster) = self.cluster.as_ref().filter(|cluster| cluster.name == name) {
            return Ok(self.build_cluster(cluster)?.into());
        }
        if let Some(farm) = self.farms.iter().find(|farm| farm.name == name) {
            return Ok(self.build_farm(farm)?.into());
        }
        Ok(self.build_turbine(name)?.into())
    }

    fn build_default(&self) -> Result<Plant> {
        if let Some(cluster) = &self.cluster {
            return Ok(self.build_cluster(cluster)?.into());
        }
        match (self.farms.as_slice(), self.turbines.as_slice()) {
            ([farm], _) => Ok(self.build_farm(farm)?.into()),
            ([], [turbine]) => Ok(self.build_turbine(&turbine.turbine_type)?.into()),
            _ => bail!("the plant file defines several plants, pick one by its name"),
        }
    }

    fn build_cluster(&self, section: &ClusterSection) -> Result<WindTurbineCluster> {
        let farms = match &section.farms {
            Some(names) => names
                .iter()
                .map(|name| {
                    let farm =
                        self.farms.iter().find(|farm| &farm.name == name).with_context(|| {
                            format!("cluster `{}` refers to unknown farm `{name}`", section.name)
                        })?;
                    self.build_farm(farm)
                })
                .collect::<Result<Vec<_>>>()?,
            None => self.farms.iter().map(|farm| self.build_farm(farm)).collect::<Result<_>>()?,
        };
        Ok(WindTurbineCluster::new(section.name.clone(), farms)?)
    }

    fn build_farm(&self, section: &FarmSection) -> Result<WindFarm> {
        let fleet = section
            .fleet
            .iter()
            .map(|entry| {
                let turbine = self.build_turbine(&entry.turbine)?;
                let entry = match (entry.count, entry.total_capacity) {
                    (Some(count), None) => FleetEntry::new(turbine, count)?,
                    (None, Some(total_capacity)) => {
                        FleetEntry::with_total_capacity(turbine, total_capacity)?
                    }
                    _ => bail!(
                        "fleet entry `{}` of farm `{}` needs either `count` or `total_capacity`",
                        entry.turbine,
                        section.name,
                    ),
                };
                Ok(entry)
            })
            .collect::<Result<Vec<_>>>()?;
        let efficiency = match &section.efficiency {
            Some(EfficiencySection::Constant(efficiency)) => {
                Some(FarmEfficiency::Constant(*efficiency))
            }
            Some(EfficiencySection::Curve(curve)) => Some(FarmEfficiency::Curve(curve.build()?)),
            None => None,
        };
        Ok(WindFarm::builder()
            .name(section.name.clone())
            .fleet(fleet)
            .maybe_efficiency(efficiency)
            .build()?)
    }

    fn build_turbine(&self, turbine_type: &str) -> Result<WindTurbine> {
        let section = self
            .turbines
            .iter()
            .find(|turbine| turbine.turbine_type == turbine_type)
            .with_context(|| format!("unknown plant or turbine type `{turbine_type}`"))?;
        Ok(WindTurbine::builder()
            .turbine_type(section.turbine_type.clone())
            .hub_height(section.hub_height)
            .maybe_nominal_power(section.nominal_power)
            .maybe_rotor_diameter(section.rotor_diameter)
            .maybe_power_curve(section.power_curve.as_ref().map(CurveSection::build).transpose()?)
            .maybe_power_coefficient_curve(
                section.power_coefficient_curve.as_ref().map(CurveSection::build).transpose()?,
            )
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plant::PowerPlant;

    const PLANT_FILE: &str = r#"
        [[turbine]]
        type = "S3"
        hub_height = 100.0
        power_curve = { wind_speed = [3.0, 4.0, 5.0, 15.0], value = [0.0, 1000.0, 3000.0, 3000.0] }

        [[turbine]]
        type = "C1"
        hub_height = 80.0
        nominal_power = 2000.0
        rotor_diameter = 50.0
        power_coefficient_curve = { wind_speed = [3.0, 25.0], value = [0.3, 0.3] }

        [[farm]]
        name = "north"
        efficiency = 0.9
        fleet = [{ turbine = "S3", count = 3 }]

        [[farm]]
        name = "south"
        efficiency = { wind_speed = [0.0, 25.0], value = [0.8, 1.0] }
        fleet = [{ turbine = "S3", total_capacity = 6000.0 }]

        [cluster]
        name = "all"
    "#;

    #[test]
    fn test_default_is_cluster() {
        let plant = PlantFile::from_toml(PLANT_FILE).unwrap().build(None).unwrap();
        assert!(matches!(plant, Plant::Cluster(_)));
        assert_eq!(plant.nominal_power(), Watts(15_000.0));
    }

    #[test]
    fn test_farm_by_name() {
        let plant = PlantFile::from_toml(PLANT_FILE).unwrap().build(Some("south")).unwrap();
        let Plant::Farm(farm) = plant else { panic!("expected a farm") };
        assert!(matches!(farm.efficiency(), Some(FarmEfficiency::Curve(_))));
        assert_eq!(farm.nominal_power(), Watts(6_000.0));
    }

    #[test]
    fn test_turbine_by_type() {
        let plant = PlantFile::from_toml(PLANT_FILE).unwrap().build(Some("C1")).unwrap();
        assert_eq!(plant.rotor_diameter(), Some(Metres(50.0)));
        assert!(plant.power_coefficient_curve().is_some());
    }

    #[test]
    fn test_unknown_name() {
        assert!(PlantFile::from_toml(PLANT_FILE).unwrap().build(Some("west")).is_err());
    }

    #[test]
    fn test_ambiguous_default() {
        let plant_file = PlantFile::from_toml(
            r#"
            [[turbine]]
            type = "S3"
            hub_height = 100.0
            power_curve = { wind_speed = [3.0, 15.0], value = [0.0, 3000.0] }

            [[turbine]]
            type = "S4"
            hub_height = 100.0
            power_curve = { wind_speed = [3.0, 15.0], value = [0.0, 4000.0] }
            "#,
        )
        .unwrap();
        assert!(plant_file.build(None).is_err());
    }

    #[test]
    fn test_model_section() {
        let plant_file = PlantFile::from_toml(&format!(
            r#"
            {PLANT_FILE}

            [model]
            wake_losses_model = "knorr_mean"
            smoothing = true
            block_width = 0.25
            standard_deviation_method = "Staffell_Pfenninger"
            smoothing_order = "turbine_power_curves"
            wind_speed_model = "log_interpolation_extrapolation"
            density_correction = true
            obstacle_height = 10.0
            "#
        ))
        .unwrap();
        let model = plant_file.model();
        assert_eq!(model.wake_losses_model, Some(WakeLossesModel::NamedCurve("knorr_mean".into())));
        assert_eq!(model.smoothing, Some(true));
        assert_eq!(model.block_width, Some(MetresPerSecond(0.25)));
        assert_eq!(
            model.standard_deviation_method,
            Some(StandardDeviationMethod::StaffellPfenninger),
        );
        assert_eq!(model.smoothing_order, Some(SmoothingOrder::TurbinePowerCurves));
        assert_eq!(model.wind_speed_model, Some(WindSpeedModel::LogInterpolationExtrapolation));
        assert_eq!(model.temperature_model, None);
        assert_eq!(model.obstacle_height, Some(Metres(10.0)));
    }

    #[test]
    fn test_model_section_defaults() {
        let model = PlantFile::from_toml(PLANT_FILE).unwrap().model().clone();
        assert_eq!(model.wake_losses_model, None);
        assert_eq!(model.smoothing, None);
    }

    #[test]
    fn test_invalid_model_section() {
        let text = format!("{PLANT_FILE}\n[model]\nwake_losses_model = \"\"\n");
        assert!(PlantFile::from_toml(&text).is_err());
        let text = format!("{PLANT_FILE}\n[model]\nwind_speed_model = \"power_law\"\n");
        assert!(PlantFile::from_toml(&text).is_err());
    }

    #[test]
    fn test_fleet_needs_count_or_capacity() {
        let plant_file = PlantFile::from_toml(
            r#"
            [[turbine]]
            type = "S3"
            hub_height = 100.0
            power_curve = { wind_speed = [3.0, 15.0], value = [0.0, 3000.0] }

            [[farm]]
            name = "north"
            fleet = [{ turbine = "S3", count = 1, total_capacity = 3000.0 }]
            "#,
        )
        .unwrap();
        assert!(plant_file.build(Some("north")).is_err());
    }
}
