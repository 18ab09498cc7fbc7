//! Weather CSV with two header rows: variable names, then heights in metres.
//!
//! ```csv
//! ,wind_speed,wind_speed,temperature,pressure,roughness_length
//! ,10,80,2,0,0
//! 2010-01-01 00:00:00+01:00,5.32,7.80,267.60,98405.7,0.15
//! ```
//!
//! Timestamps are RFC 3339, or the same with a space instead of `T`.

use std::{fs::File, io::Read, path::Path};

use chrono::{DateTime, Utc};

use crate::{
    core::weather::{Variable, Weather},
    prelude::*,
    quantity::length::Metres,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

pub fn read_weather(path: &Path) -> Result<Weather> {
    let file = File::open(path)
        .with_context(|| format!("failed to open the weather file `{}`", path.display()))?;
    parse_weather(file).with_context(|| format!("invalid weather file `{}`", path.display()))
}

#[instrument(skip_all, name = "Parsing the weather…")]
pub fn parse_weather(reader: impl Read) -> Result<Weather> {
    let mut records = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(reader)
        .into_records();

    let variables = records.next().context("missing the variable header")??;
    let heights = records.next().context("missing the height header")??;
    let columns: Vec<Option<(Variable, Metres)>> = variables
        .iter()
        .zip(&heights)
        .skip(1)
        .map(|(variable, height)| {
            let Ok(variable) = variable.trim().parse::<Variable>() else {
                warn!(variable, "skipping an unknown weather variable");
                return Ok(None);
            };
            let height = height
                .trim()
                .parse::<Metres>()
                .with_context(|| format!("invalid height `{height}` of `{variable}`"))?;
            Ok(Some((variable, height)))
        })
        .collect::<Result<_>>()?;

    let mut index = Vec::new();
    let mut values = vec![Vec::new(); columns.len()];
    for record in records {
        let record = record?;
        let timestamp = record.get(0).context("empty weather row")?;
        index.push(parse_timestamp(timestamp)?);
        for (column, value) in values.iter_mut().zip(record.iter().skip(1)) {
            column.push(parse_value(value)?);
        }
    }

    let mut weather = Weather::new(index);
    for (key, values) in columns.into_iter().zip(values) {
        if let Some((variable, height)) = key {
            weather.insert(variable, height, values)?;
        }
    }
    info!(
        n_rows = weather.len(),
        variables = ?weather.variables().collect::<Vec<_>>(),
        "loaded the weather",
    );
    Ok(weather)
}

fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, TIMESTAMP_FORMAT))
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .with_context(|| format!("invalid timestamp `{text}`"))
}

/// Empty cells are missing values.
fn parse_value(text: &str) -> Result<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(f64::NAN);
    }
    text.parse().with_context(|| format!("invalid weather value `{text}`"))
}
