use std::slice;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        curve::PowerCurve,
        plant::{Plant, PowerPlant, farm::WindFarm},
        series::Series,
        wake_losses::{FarmEfficiency, WindEfficiencyCurve},
    },
    quantity::power::Watts,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

pub fn build_plant_table(plant: &dyn PowerPlant) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Plant", "Nominal power", "Hub height", "Curve points", "Curve maximum"]);
    let power_curve = plant.power_curve();
    table.add_row(vec![
        Cell::new(plant.name()).add_attribute(Attribute::Bold),
        Cell::new(plant.nominal_power()).set_alignment(CellAlignment::Right),
        Cell::new(plant.hub_height().map_or_else(|| "-".to_owned(), |height| height.to_string()))
            .set_alignment(CellAlignment::Right),
        Cell::new(power_curve.map_or(0, PowerCurve::len)).set_alignment(CellAlignment::Right),
        Cell::new(power_curve.map_or(Watts::ZERO, PowerCurve::max_value))
            .set_alignment(CellAlignment::Right),
    ]);
    table
}

/// Turbines of every wind farm in the plant, `None` for a single turbine.
pub fn build_fleet_table(plant: &Plant) -> Option<Table> {
    let wind_farms = match plant {
        Plant::Turbine(_) => return None,
        Plant::Farm(wind_farm) => slice::from_ref(wind_farm),
        Plant::Cluster(cluster) => cluster.wind_farms(),
    };
    Some(build_wind_farms_table(wind_farms))
}

fn build_wind_farms_table(wind_farms: &[WindFarm]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Farm",
        "Efficiency",
        "Turbine",
        "Count",
        "Hub height",
        "Nominal power",
        "Curve points",
    ]);
    for wind_farm in wind_farms {
        let efficiency = match wind_farm.efficiency() {
            Some(FarmEfficiency::Constant(efficiency)) => format!("{:.0}%", efficiency * 100.0),
            Some(FarmEfficiency::Curve(curve)) => format!("curve of {} points", curve.len()),
            None => "-".to_owned(),
        };
        for entry in wind_farm.fleet() {
            table.add_row(vec![
                Cell::new(wind_farm.name()).add_attribute(Attribute::Bold),
                Cell::new(&efficiency).add_attribute(Attribute::Dim),
                Cell::new(entry.turbine.name()),
                Cell::new(format!("{:.2}", entry.count)).set_alignment(CellAlignment::Right),
                Cell::new(
                    entry
                        .turbine
                        .hub_height()
                        .map_or_else(String::new, |height| height.to_string()),
                )
                .set_alignment(CellAlignment::Right),
                Cell::new(entry.nominal_power()).set_alignment(CellAlignment::Right),
                Cell::new(entry.turbine.nominal_power_curve().map_or(0, PowerCurve::len))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
    }
    table
}

pub fn build_power_curve_table(power_curve: &PowerCurve, nominal_power: Watts) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Wind speed", "Power", "Load"]);
    for (wind_speed, power) in power_curve.points() {
        let load = *power / nominal_power;
        table.add_row(vec![
            Cell::new(wind_speed).set_alignment(CellAlignment::Right),
            Cell::new(power).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.0}%", load * 100.0)).set_alignment(CellAlignment::Right).fg(
                if load <= 0.0 {
                    Color::DarkGrey
                } else if load < 0.999 {
                    Color::DarkYellow
                } else {
                    Color::Green
                },
            ),
        ]);
    }
    table
}

pub fn build_power_output_table(power_output: &Series<Watts>, nominal_power: Watts) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Time", "Power output", "Load"]);
    for (timestamp, power) in power_output {
        let load = *power / nominal_power;
        table.add_row(vec![
            Cell::new(timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(power).set_alignment(CellAlignment::Right).fg(if power.is_finite() {
                Color::Reset
            } else {
                Color::Red
            }),
            Cell::new(format!("{:.1}%", load * 100.0))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_efficiency_curves_table(curves: &[WindEfficiencyCurve]) -> Table {
    let mut table = new_table();
    let mut header = vec!["Wind speed".to_owned()];
    header.extend(curves.iter().map(|curve| curve.name.clone()));
    table.set_header(header);

    // All catalog curves share the same wind speeds:
    let Some(first) = curves.first() else {
        return table;
    };
    for (i, wind_speed) in first.curve.wind_speeds().enumerate() {
        let mut row = vec![Cell::new(wind_speed).set_alignment(CellAlignment::Right)];
        row.extend(curves.iter().map(|curve| {
            let efficiency = curve.curve.points().get(i).map_or(f64::NAN, |(_, value)| *value);
            Cell::new(format!("{efficiency:.3}")).set_alignment(CellAlignment::Right)
        }));
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        curve::tests::small_power_curve,
        plant::{farm::tests::small_farm, turbine::tests::small_turbine},
    };

    #[test]
    fn test_power_curve_table() {
        let table = build_power_curve_table(&small_power_curve(), Watts(3000.0));
        assert_eq!(table.row_count(), 4);
    }

    #[test]
    fn test_plant_table() {
        let table = build_plant_table(&small_turbine(100.0));
        assert!(table.to_string().contains("S3"));
    }

    #[test]
    fn test_fleet_table() {
        let farm = small_farm(Some(FarmEfficiency::Constant(0.9)));
        let table = build_fleet_table(&Plant::Farm(farm));
        assert_eq!(table.unwrap().row_count(), 2);
        assert!(build_fleet_table(&Plant::Turbine(small_turbine(100.0))).is_none());
    }

    #[test]
    fn test_efficiency_curves_table() {
        let curves = WindEfficiencyCurve::all().unwrap();
        let table = build_efficiency_curves_table(&curves);
        assert_eq!(table.row_count(), curves[0].curve.len());
    }
}
