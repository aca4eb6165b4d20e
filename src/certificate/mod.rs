// src/certificate/mod.rs
pub mod date_parser;
pub mod types;

pub use date_parser::{display_date, filename_date, parse_certificate_date};
pub use types::{CalibrationDates, CertificateRecord, Coefficients, Sensor};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{fs, path::Path};
use tracing::{debug, instrument, trace};

use crate::error::XmlconError;

/// `temperature: 15-10-22` / `conductivity: 15-10-22`
static SENSOR_DATE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(temperature|conductivity)\b[\s:]*(.*?)\s*$").unwrap()
});

/// Marker after which the pressure line carries its date:
/// `pressure S/N 10291624, range = 5076 psia 15-10-22`
const PRESSURE_DATE_MARKER: &str = "psia ";

enum Line<'a> {
    SensorDate(Sensor, &'a str),
    Coefficient(&'a str, &'a str),
    Skip,
}

fn classify_line(line: &str) -> Line<'_> {
    if let Some(caps) = SENSOR_DATE_LINE.captures(line) {
        let sensor = match &caps[1] {
            "temperature" => Sensor::Temperature,
            _ => Sensor::Conductivity,
        };
        let date = caps.get(2).map_or("", |m| m.as_str());
        return Line::SensorDate(sensor, date);
    }

    if line.contains("pressure") {
        // the range field also contains '=', so this must win over KEY = VALUE
        let date = line.rsplit(PRESSURE_DATE_MARKER).next().unwrap_or(line);
        return Line::SensorDate(Sensor::Pressure, date.trim());
    }

    let mut parts = line.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) if !key.trim().is_empty() => {
            Line::Coefficient(key.trim(), value.trim())
        }
        _ => Line::Skip,
    }
}

/// Parse the text of one calibration certificate.
///
/// Date lines must parse; anything that is neither a date line nor a single
/// `KEY = VALUE` pair is skipped.
#[instrument(level = "debug", skip(text), fields(content_len = text.len()))]
pub fn parse_certificate(serial: &str, text: &str) -> Result<CertificateRecord, XmlconError> {
    let mut record = CertificateRecord::new(serial);

    for (idx, line) in text.lines().enumerate() {
        match classify_line(line) {
            Line::SensorDate(sensor, value) => {
                let date =
                    parse_certificate_date(value).map_err(|source| XmlconError::DateParse {
                        line: idx + 1,
                        value: value.to_string(),
                        source,
                    })?;
                trace!(%sensor, date = %display_date(date), "Parsed calibration date");
                record.record_date(sensor, date);
            }
            Line::Coefficient(key, value) => {
                trace!(key, value, "Parsed coefficient");
                record.coefficients.insert(key.to_string(), value.to_string());
            }
            Line::Skip => {
                trace!(line = idx + 1, "Skipping line");
            }
        }
    }

    debug!(
        coefficients = record.coefficients.len(),
        dates = record.dates.len(),
        "Finished certificate parsing"
    );
    Ok(record)
}

/// Read and parse a certificate file. Bytes that are not UTF-8 are replaced.
pub fn load_certificate(path: &Path, serial: &str) -> Result<CertificateRecord> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read certificate {:?}", path))?;
    let text = String::from_utf8_lossy(&bytes);
    let record = parse_certificate(serial, &text)
        .with_context(|| format!("Failed to parse certificate {:?}", path))?;
    Ok(record)
}
