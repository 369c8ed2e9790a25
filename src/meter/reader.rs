//! CSV intake for meter readings.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::SeriesError;
use crate::timestamp::parse_timestamp;

use super::MeterSeries;

/// Reads a meter series from a CSV file at the given path.
///
/// # Arguments
///
/// * `path` - Meter CSV file path
///
/// # Errors
///
/// Returns a [`SeriesError`] if the file cannot be opened or its contents are invalid.
pub fn read_csv_path(path: &Path) -> Result<MeterSeries, SeriesError> {
    let file = File::open(path).map_err(|source| SeriesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_csv(io::BufReader::new(file))
}

/// Reads a meter series from CSV.
///
/// The first column holds timestamps; every other column header names a
/// channel. Empty reading cells become `NaN`.
///
/// # Arguments
///
/// * `reader` - CSV source with a header row
///
/// # Errors
///
/// Returns a [`SeriesError`] on malformed CSV, a repeated channel header, an
/// unparseable timestamp or reading, or rows out of timestamp order.
pub fn read_csv(reader: impl Read) -> Result<MeterSeries, SeriesError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(SeriesError::MissingTimestampColumn);
    }
    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if let Some(channel) = duplicate_name(&names) {
        return Err(SeriesError::DuplicateChannel {
            channel: channel.to_string(),
        });
    }

    let mut timestamps = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw_ts = record.get(0).unwrap_or_default();
        let ts = parse_timestamp(raw_ts).ok_or_else(|| SeriesError::Timestamp {
            row,
            value: raw_ts.to_string(),
        })?;
        timestamps.push(ts);

        for (i, name) in names.iter().enumerate() {
            let cell = record.get(i + 1).unwrap_or_default();
            let value = if cell.is_empty() {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|_| SeriesError::Reading {
                    row,
                    channel: name.clone(),
                    value: cell.to_string(),
                })?
            };
            columns[i].push(value);
        }
    }

    let mut series = MeterSeries::new(timestamps)?;
    for (name, values) in names.into_iter().zip(columns) {
        series = series.with_channel(name, values)?;
    }
    tracing::debug!(
        samples = series.len(),
        channels = series.channel_names().count(),
        "meter csv loaded"
    );
    Ok(series)
}

fn duplicate_name(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    names
        .iter()
        .map(String::as_str)
        .find(|name| !seen.insert(*name))
}
