// src/discover.rs

use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::XmlconError;

/// Regular files directly in `dir` with the given extension, sorted by path.
pub fn find_certificates(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.display().to_string()),
        Pattern::escape(extension)
    );
    let mut paths: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    paths.sort();
    debug!(count = paths.len(), %pattern, "Found certificates");
    Ok(paths)
}

/// The serial number a certificate is named after: its filename stem.
pub fn serial_number(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// The single configuration file in `dir` named `<prefix><serial>*`.
#[instrument(level = "debug", skip(dir), fields(dir = %dir.display()))]
pub fn find_configuration(dir: &Path, prefix: &str, serial: &str) -> Result<PathBuf> {
    let pattern = format!(
        "{}/{}{}*",
        Pattern::escape(&dir.display().to_string()),
        Pattern::escape(prefix),
        Pattern::escape(serial)
    );
    let mut candidates: Vec<PathBuf> = glob(&pattern)
        .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(XmlconError::MissingConfiguration { pattern }.into()),
        1 => Ok(candidates.remove(0)),
        _ => Err(XmlconError::AmbiguousConfiguration {
            pattern,
            candidates,
        }
        .into()),
    }
}
