use crate::data::frame::Frame;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRecord {
    timestamp: String,
    #[serde(default)]
    open: Option<f64>,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    close: f64,
    #[serde(default)]
    volume: Option<f64>,
}

//loads a price table from a csv file
//timestamp and close are required, ohlv columns come along when fully present
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let mut rows: Vec<(DateTime<Utc>, CsvRecord)> = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        let record: CsvRecord =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let timestamp = DateTime::parse_from_rfc3339(&record.timestamp)
            .context(format!(
                "Failed to parse timestamp '{}' at line {}",
                record.timestamp,
                index + 2
            ))?
            .with_timezone(&Utc);

        rows.push((timestamp, record));
    }

    //sort by timestamp; the frame constructor rejects duplicates
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let index: Vec<DateTime<Utc>> = rows.iter().map(|(t, _)| *t).collect();
    let closes: Vec<f64> = rows.iter().map(|(_, r)| r.close).collect();
    let mut frame = Frame::with_close(index, closes)?;

    let optional: [(&str, fn(&CsvRecord) -> Option<f64>); 4] = [
        ("open", |r| r.open),
        ("high", |r| r.high),
        ("low", |r| r.low),
        ("volume", |r| r.volume),
    ];

    for (name, get) in optional {
        let values: Option<Vec<f64>> = rows.iter().map(|(_, r)| get(r)).collect();
        if let Some(values) = values {
            frame.insert_column(name, values)?;
        }
    }

    Ok(frame)
}
