//! Print what a run would take from each certificate, without touching any
//! configuration file: coefficients with their target tag, the calibration
//! dates as written into `<CalibrationDate>`, and the output filename date.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{env, path::Path, process::exit};
use xmlcon_updater::{
    certificate::{display_date, filename_date, load_certificate, CertificateRecord, Sensor},
    discover::serial_number,
    xmlcon::patch::target_tag,
};

#[derive(Serialize)]
struct CoefficientTarget<'a> {
    name: &'a str,
    tag: &'a str,
    value: &'a str,
}

#[derive(Serialize)]
struct Inspection<'a> {
    record: &'a CertificateRecord,
    targets: Vec<CoefficientTarget<'a>>,
    calibration_dates: Vec<(Sensor, String)>,
    output_date: Option<String>,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <CERTIFICATE_TXT>...", args[0]);
        exit(1);
    }

    let mut failed = false;
    for path in &args[1..] {
        if let Err(e) = inspect(Path::new(path)) {
            eprintln!("Error: {}: {:#}", path, e);
            failed = true;
        }
    }
    if failed {
        exit(1);
    }
}

fn inspect(path: &Path) -> Result<()> {
    let serial = serial_number(path).with_context(|| format!("no serial number in {:?}", path))?;
    let record = load_certificate(path, &serial)?;

    let targets = record
        .coefficients
        .iter()
        .map(|(name, value)| CoefficientTarget {
            name: name.as_str(),
            tag: target_tag(name),
            value: value.as_str(),
        })
        .collect();
    let calibration_dates = Sensor::ALL
        .into_iter()
        .filter_map(|s| record.calibration_dates.get(s).map(|d| (s, display_date(d))))
        .collect();
    let output_date = record.earliest_date().ok().map(filename_date);

    let inspection = Inspection {
        record: &record,
        targets,
        calibration_dates,
        output_date,
    };
    println!("{}", serde_json::to_string_pretty(&inspection)?);
    Ok(())
}
