// src/config.rs

use std::path::PathBuf;

/// Filename prefix of every SBE 37-SM RS-232 configuration file; the serial follows it.
pub const CONFIG_PREFIX: &str = "SBE37SM-RS232_037";

/// Where to look for inputs and where to put the patched files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Holds the `*.txt` certificates and the configuration files they refer to.
    pub work_dir: PathBuf,
    /// Must already exist; it is never created.
    pub output_dir: PathBuf,
    pub config_prefix: String,
    pub certificate_extension: String,
    pub output_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            output_dir: PathBuf::from("saida"),
            config_prefix: CONFIG_PREFIX.to_string(),
            certificate_extension: "txt".to_string(),
            output_extension: "xmlcon".to_string(),
        }
    }
}

impl Config {
    /// Default naming, rooted at the given directories.
    pub fn in_dir(work_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}
