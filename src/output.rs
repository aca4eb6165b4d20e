// src/output.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    io::Write,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::certificate::filename_date;

/// `<prefix><serial>_<YYYY_MM_DD>.<extension>`, e.g.
/// `SBE37SM-RS232_03715895_2022_10_15.xmlcon`.
pub fn output_file_name(prefix: &str, serial: &str, earliest: NaiveDate, extension: &str) -> String {
    format!(
        "{}{}_{}.{}",
        prefix,
        serial,
        filename_date(earliest),
        extension
    )
}

/// Write `contents` to `dir/file_name` in one step.
///
/// The data goes to a hidden temp file in `dir` first and is renamed over the
/// target, so a failure never leaves a truncated configuration file behind.
/// The temp file is removed on every error path. `dir` must already exist.
pub fn write_document(dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);

    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("creating temp file in {:?}", dir))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {:?}", tmp.path()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("flushing {:?}", tmp.path()))?;

    tmp.persist(&path)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming temp file to {:?}", path))?;

    debug!(path = %path.display(), bytes = contents.len(), "Wrote document");
    Ok(path)
}
