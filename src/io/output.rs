use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    core::series::Series,
    prelude::*,
    quantity::power::Watts,
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Serialize)]
struct Record {
    timestamp: DateTime<Utc>,

    /// Watts.
    power_output: Watts,
}

pub fn write_power_output(
    power_output: &Series<Watts>,
    path: &Path,
    format: OutputFormat,
) -> Result {
    let file =
        File::create(path).with_context(|| format!("failed to create `{}`", path.display()))?;
    serialize_power_output(power_output, BufWriter::new(file), format)?;
    info!(path = %path.display(), n_rows = power_output.len(), "saved the power output");
    Ok(())
}

pub fn serialize_power_output(
    power_output: &Series<Watts>,
    mut writer: impl Write,
    format: OutputFormat,
) -> Result {
    let records = power_output.iter().map(|(timestamp, power_output)| Record {
        timestamp: *timestamp,
        power_output: *power_output,
    });
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(writer);
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &records.collect::<Vec<_>>())?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
