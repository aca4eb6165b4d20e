use chrono::{Datelike, NaiveDate};

/// How dates are printed on the certificate, e.g. `15-10-22`.
pub const CERTIFICATE_DATE_FORMAT: &str = "%d-%m-%y";
/// How `<CalibrationDate>` stores them, e.g. `15Oct22`.
pub const DISPLAY_DATE_FORMAT: &str = "%d%b%y";
/// Date component of an output filename, e.g. `2022_10_15`.
pub const FILENAME_DATE_FORMAT: &str = "%Y_%m_%d";

/// First year that a two-digit `yy` maps into the 1900s (`69` → 1969).
const CENTURY_PIVOT: i32 = 2069;

/// Parse `"dd-mm-yy"`. Two-digit years 00–68 land in the 2000s, 69–99 in the 1900s.
pub fn parse_certificate_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(s.trim(), CERTIFICATE_DATE_FORMAT)?;
    // chrono only pivots at 70
    if date.year() >= CENTURY_PIVOT {
        if let Some(earlier) = date.with_year(date.year() - 100) {
            return Ok(earlier);
        }
    }
    Ok(date)
}

pub fn display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

pub fn filename_date(date: NaiveDate) -> String {
    date.format(FILENAME_DATE_FORMAT).to_string()
}
