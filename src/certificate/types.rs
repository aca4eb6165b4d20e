// src/certificate/types.rs

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::error::XmlconError;

/// The three sensors of an SBE 37 that carry their own calibration date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Temperature,
    Conductivity,
    Pressure,
}

impl Sensor {
    pub const ALL: [Sensor; 3] = [Sensor::Temperature, Sensor::Conductivity, Sensor::Pressure];

    pub fn label(self) -> &'static str {
        match self {
            Sensor::Temperature => "temperature",
            Sensor::Conductivity => "conductivity",
            Sensor::Pressure => "pressure",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coefficient name → raw value text, in the order the certificate lists them.
///
/// Values are kept as the certificate writes them, e.g. `2.210512e-05`. A
/// repeated name takes the new value but keeps its original position.
pub type Coefficients = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalibrationDates {
    pub temperature: Option<NaiveDate>,
    pub conductivity: Option<NaiveDate>,
    pub pressure: Option<NaiveDate>,
}

impl CalibrationDates {
    pub fn get(&self, sensor: Sensor) -> Option<NaiveDate> {
        match sensor {
            Sensor::Temperature => self.temperature,
            Sensor::Conductivity => self.conductivity,
            Sensor::Pressure => self.pressure,
        }
    }

    pub fn set(&mut self, sensor: Sensor, date: NaiveDate) {
        let slot = match sensor {
            Sensor::Temperature => &mut self.temperature,
            Sensor::Conductivity => &mut self.conductivity,
            Sensor::Pressure => &mut self.pressure,
        };
        *slot = Some(date);
    }
}

/// Everything pulled out of one certificate file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificateRecord {
    /// Taken from the certificate filename stem.
    pub serial: String,
    pub coefficients: Coefficients,
    pub calibration_dates: CalibrationDates,
    /// Every date parsed, in certificate order.
    pub dates: Vec<NaiveDate>,
}

impl CertificateRecord {
    pub fn new(serial: impl Into<String>) -> Self {
        Self {
            serial: serial.into(),
            coefficients: Coefficients::default(),
            calibration_dates: CalibrationDates::default(),
            dates: Vec::new(),
        }
    }

    pub fn record_date(&mut self, sensor: Sensor, date: NaiveDate) {
        self.calibration_dates.set(sensor, date);
        self.dates.push(date);
    }

    /// The date used to name the output file.
    pub fn earliest_date(&self) -> Result<NaiveDate, XmlconError> {
        self.dates
            .iter()
            .min()
            .copied()
            .ok_or(XmlconError::NoCalibrationDates)
    }
}
