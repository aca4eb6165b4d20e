// src/batch.rs

use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{error, info, instrument, warn};

use crate::{
    certificate::{display_date, load_certificate},
    config::Config,
    discover::{find_certificates, find_configuration, serial_number},
    output::{output_file_name, write_document},
    xmlcon::patch_document,
};

#[derive(Debug, Clone, Serialize)]
pub struct FailedCertificate {
    pub path: PathBuf,
    /// Full error chain, outermost context first.
    pub error: String,
}

/// Outcome of one run over the working directory.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<FailedCertificate>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Parse one certificate, patch its configuration file and write the result.
/// Returns the path of the written file.
#[instrument(level = "info", skip(config, path), fields(path = %path.display()))]
pub fn process_certificate(config: &Config, path: &Path) -> Result<PathBuf> {
    let serial =
        serial_number(path).with_context(|| format!("no serial number in {:?}", path))?;

    let record = load_certificate(path, &serial)?;
    let earliest = record
        .earliest_date()
        .with_context(|| format!("Failed to name output for {:?}", path))?;

    let config_path = find_configuration(&config.work_dir, &config.config_prefix, &serial)
        .with_context(|| format!("Failed to find configuration for serial {}", serial))?;
    let document = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read configuration {:?}", config_path))?;

    let patched = patch_document(&document, &record)
        .with_context(|| format!("Failed to patch {:?}", config_path))?;

    let file_name = output_file_name(
        &config.config_prefix,
        &serial,
        earliest,
        &config.output_extension,
    );
    let out = write_document(&config.output_dir, &file_name, &patched)?;

    info!(
        serial = %serial,
        source = %config_path.display(),
        output = %out.display(),
        earliest = %display_date(earliest),
        "Updated configuration"
    );
    Ok(out)
}

/// Process every certificate in `config.work_dir`.
///
/// A certificate that fails is logged and recorded in the report; the rest
/// are still processed. Only failing to list the directory aborts the run.
pub fn run(config: &Config) -> Result<BatchReport> {
    let start = Instant::now();
    let certificates = find_certificates(&config.work_dir, &config.certificate_extension)?;
    let mut report = BatchReport::default();

    if certificates.is_empty() {
        warn!(dir = %config.work_dir.display(), "no certificates found");
        return Ok(report);
    }
    info!("{} certificates to process", certificates.len());

    for path in certificates {
        match process_certificate(config, &path) {
            Ok(out) => report.written.push(out),
            Err(e) => {
                error!("{} failed: {:#}", path.display(), e);
                report.failed.push(FailedCertificate {
                    path,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    info!(
        written = report.written.len(),
        failed = report.failed.len(),
        elapsed = ?start.elapsed(),
        "run complete"
    );
    Ok(report)
}
