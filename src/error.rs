// src/error.rs

use std::path::PathBuf;

use crate::xmlcon::Occurrence;

/// Failures that abort the processing of a single certificate.
#[derive(Debug, thiserror::Error)]
pub enum XmlconError {
    /// A date line whose date does not parse as `dd-mm-yy`.
    #[error("line {line}: invalid calibration date {value:?}")]
    DateParse {
        line: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The certificate carried no date lines, so the output cannot be named.
    #[error("certificate contains no calibration dates")]
    NoCalibrationDates,

    #[error("no configuration file matches {pattern}")]
    MissingConfiguration { pattern: String },

    /// More than one file matches the serial number.
    #[error("{} configuration files match {pattern}: {candidates:?}", .candidates.len())]
    AmbiguousConfiguration {
        pattern: String,
        candidates: Vec<PathBuf>,
    },

    /// A positional tag (`<Offset>`, `<CalibrationDate>`) is absent at the expected position.
    #[error("<{tag}> has no {occurrence} occurrence ({found} present)")]
    MissingOccurrence {
        tag: String,
        occurrence: Occurrence,
        found: usize,
    },
}
