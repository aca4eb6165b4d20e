// src/xmlcon/patch.rs

use anyhow::{Context, Result};
use tracing::{debug, instrument, trace};

use super::{mapping::xmlcon_tag, replace_element, Occurrence};
use crate::certificate::{display_date, CertificateRecord, Sensor};

/// Certificate key of the pressure offset; it lands in an `<Offset>` tag, not `<POFFSET>`.
pub const PRESSURE_OFFSET_KEY: &str = "POFFSET";
const OFFSET_TAG: &str = "Offset";
const CALIBRATION_DATE_TAG: &str = "CalibrationDate";

/// Tag a certificate coefficient is written to: `POFFSET` goes to `<Offset>`,
/// everything else through the name map.
pub fn target_tag(name: &str) -> &str {
    if name == PRESSURE_OFFSET_KEY {
        OFFSET_TAG
    } else {
        xmlcon_tag(name)
    }
}

/// `POFFSET` updates the last `<Offset>`, the pressure block's; the rest the first match.
fn coefficient_occurrence(name: &str) -> Occurrence {
    if name == PRESSURE_OFFSET_KEY {
        Occurrence::Last
    } else {
        Occurrence::First
    }
}

/// Position of each sensor's `<CalibrationDate>` in an SBE 37 `.xmlcon`:
/// temperature block first, conductivity second, pressure last.
fn calibration_date_occurrence(sensor: Sensor) -> Occurrence {
    match sensor {
        Sensor::Temperature => Occurrence::Nth(0),
        Sensor::Conductivity => Occurrence::Nth(1),
        Sensor::Pressure => Occurrence::Last,
    }
}

/// Return a copy of `document` with the record's coefficients and dates written in.
///
/// Coefficients go into the first `<TAG>` with the certificate name remapped.
/// `POFFSET` goes into the last `<Offset>`, the one the instrument's `ds`
/// command reports. Dates go into the `<CalibrationDate>` of their sensor block.
#[instrument(level = "debug", skip(document, record), fields(serial = %record.serial))]
pub fn patch_document(document: &str, record: &CertificateRecord) -> Result<String> {
    let mut patched = document.to_string();
    let mut missing = 0usize;

    for (name, value) in &record.coefficients {
        let tag = target_tag(name);
        let replaced = replace_element(&mut patched, tag, value, coefficient_occurrence(name))
            .with_context(|| format!("writing {} into <{}>", name, tag))?;
        if replaced {
            trace!(name = %name, tag, value = %value, "Replaced coefficient");
        } else {
            missing += 1;
            debug!(name = %name, tag, "Tag not present; coefficient left out");
        }
    }

    for sensor in Sensor::ALL {
        let Some(date) = record.calibration_dates.get(sensor) else {
            continue;
        };
        let value = display_date(date);
        replace_element(
            &mut patched,
            CALIBRATION_DATE_TAG,
            &value,
            calibration_date_occurrence(sensor),
        )
        .with_context(|| format!("writing {} calibration date", sensor))?;
        trace!(%sensor, date = %value, "Replaced calibration date");
    }

    debug!(
        coefficients = record.coefficients.len(),
        missing, "Finished patching document"
    );
    Ok(patched)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::certificate::{parse_certificate, tests::SAMPLE_CERTIFICATE};
    use crate::error::XmlconError;
    use chrono::NaiveDate;

    /// Trimmed-down SBE 37-SM RS-232 configuration as shipped with the instrument.
    pub(crate) const SAMPLE_XMLCON: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SBE_InstrumentConfiguration SB_ConfigCTD_FileVersion="7.26.7.0" >
   <Instrument>
      <Name>SBE 37 SM/SMP/IM/IMP/SI/SIP (RS-232)</Name>
      <SensorArray Size="3" >
         <Sensor index="0" SensorID="55" >
            <TemperatureSensor SensorID="55" >
               <SerialNumber>15895</SerialNumber>
               <CalibrationDate>07Aug22</CalibrationDate>
               <A0>1.0</A0>
               <A1>1.0</A1>
               <A2>1.0</A2>
               <A3>1.0</A3>
               <Slope>1.00000000</Slope>
               <Offset>0.0000</Offset>
            </TemperatureSensor>
         </Sensor>
         <Sensor index="1" SensorID="3" >
            <ConductivitySensor SensorID="3" >
               <SerialNumber>15895</SerialNumber>
               <CalibrationDate>07Aug22</CalibrationDate>
               <G>0.0</G>
               <H>0.0</H>
               <I>0.0</I>
               <J>0.0</J>
               <CPcor>0.0</CPcor>
               <CTcor>0.0</CTcor>
               <WBOTC>0.0</WBOTC>
               <Slope>1.00000000</Slope>
               <Offset>0.00000</Offset>
            </ConductivitySensor>
         </Sensor>
         <Sensor index="2" SensorID="46" >
            <PressureSensor SensorID="46" >
               <SerialNumber>10291624</SerialNumber>
               <CalibrationDate>07Aug22</CalibrationDate>
               <PA0>0.0</PA0>
               <PA1>0.0</PA1>
               <PA2>0.0</PA2>
               <PTCA0>0.0</PTCA0>
               <PTCA1>0.0</PTCA1>
               <PTCA2>0.0</PTCA2>
               <PTCB0>0.0</PTCB0>
               <PTCB1>0.0</PTCB1>
               <PTCB2>0.0</PTCB2>
               <PTEMPA0>0.0</PTEMPA0>
               <PTEMPA1>0.0</PTEMPA1>
               <PTEMPA2>0.0</PTEMPA2>
               <Offset>0.0000</Offset>
            </PressureSensor>
         </Sensor>
      </SensorArray>
   </Instrument>
</SBE_InstrumentConfiguration>
"#;

    fn values(document: &str, tag: &str) -> Vec<String> {
        let open = format!("<{}>", tag);
        document
            .match_indices(&open)
            .map(|(i, _)| {
                let rest = &document[i + open.len()..];
                rest[..rest.find('<').unwrap()].to_string()
            })
            .collect()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn renamed_coefficient_goes_to_the_xmlcon_tag() -> Result<()> {
        let mut r = CertificateRecord::new("1");
        r.coefficients.insert("TA0".into(), "2.21e-05".into());
        let out = patch_document("<A0>1.0</A0>\n<A0>5.0</A0>", &r)?;
        assert_eq!(out, "<A0>2.21e-05</A0>\n<A0>5.0</A0>");
        Ok(())
    }

    #[test]
    fn input_document_is_left_untouched() -> Result<()> {
        let mut r = CertificateRecord::new("1");
        r.coefficients.insert("G".into(), "2".into());
        let original = String::from("<G>1</G>");
        let out = patch_document(&original, &r)?;
        assert_eq!(original, "<G>1</G>");
        assert_eq!(out, "<G>2</G>");
        Ok(())
    }

    #[test]
    fn target_tag_covers_renames_and_pressure_offset() {
        assert_eq!(target_tag("POFFSET"), "Offset");
        assert_eq!(target_tag("TA2"), "A2");
        assert_eq!(target_tag("CTCOR"), "CTcor");
        assert_eq!(target_tag("PTCA1"), "PTCA1");
    }

    #[test]
    fn unknown_tags_are_ignored() -> Result<()> {
        let mut r = CertificateRecord::new("1");
        r.coefficients.insert("NOT_A_TAG".into(), "2".into());
        let out = patch_document(SAMPLE_XMLCON, &r)?;
        assert_eq!(out, SAMPLE_XMLCON);
        Ok(())
    }

    #[test]
    fn poffset_only_touches_the_last_offset() -> Result<()> {
        let mut r = CertificateRecord::new("1");
        r.coefficients.insert("POFFSET".into(), "8.720000e-02".into());
        let out = patch_document("<Offset>0.1</Offset><Offset>0.2</Offset>", &r)?;
        assert_eq!(out, "<Offset>0.1</Offset><Offset>8.720000e-02</Offset>");
        Ok(())
    }

    #[test]
    fn poffset_without_any_offset_is_an_error() {
        let mut r = CertificateRecord::new("1");
        r.coefficients.insert("POFFSET".into(), "1".into());
        let err = patch_document("<A0>1</A0>", &r).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<XmlconError>(),
            Some(XmlconError::MissingOccurrence { found: 0, .. })
        ));
    }

    #[test]
    fn calibration_dates_follow_sensor_block_order() -> Result<()> {
        let mut r = CertificateRecord::new("1");
        r.record_date(Sensor::Temperature, ymd(2022, 10, 15));
        r.record_date(Sensor::Conductivity, ymd(2022, 10, 16));
        r.record_date(Sensor::Pressure, ymd(2022, 10, 17));

        let doc = "<CalibrationDate>a</CalibrationDate>\
                   <CalibrationDate>b</CalibrationDate>\
                   <CalibrationDate>c</CalibrationDate>\
                   <CalibrationDate>d</CalibrationDate>";
        let out = patch_document(doc, &r)?;
        assert_eq!(
            values(&out, "CalibrationDate"),
            vec!["15Oct22", "16Oct22", "c", "17Oct22"]
        );
        Ok(())
    }

    #[test]
    fn conductivity_date_needs_a_second_block() {
        let mut r = CertificateRecord::new("1");
        r.record_date(Sensor::Conductivity, ymd(2022, 10, 16));
        let err = patch_document("<CalibrationDate>a</CalibrationDate>", &r).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<XmlconError>(),
            Some(XmlconError::MissingOccurrence {
                occurrence: Occurrence::Nth(1),
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn full_certificate_against_sample_xmlcon() -> Result<()> {
        let r = parse_certificate("15895", SAMPLE_CERTIFICATE)?;
        let out = patch_document(SAMPLE_XMLCON, &r)?;

        assert_eq!(values(&out, "A0"), vec!["2.210512e-05"]);
        assert_eq!(values(&out, "A3"), vec!["1.622164e-07"]);
        assert_eq!(values(&out, "CPcor"), vec!["-9.570000e-08"]);
        assert_eq!(values(&out, "CTcor"), vec!["3.250000e-06"]);
        assert_eq!(values(&out, "WBOTC"), vec!["-2.976251e-08"]);
        assert_eq!(values(&out, "PTEMPA2"), vec!["-5.776850e-07"]);
        assert_eq!(
            values(&out, "Offset"),
            vec!["0.0000", "0.00000", "8.720000e-02"]
        );
        assert_eq!(
            values(&out, "CalibrationDate"),
            vec!["15Oct22", "15Oct22", "15Oct22"]
        );
        // untouched parts of the document survive verbatim
        assert_eq!(values(&out, "Slope"), vec!["1.00000000", "1.00000000"]);
        assert_eq!(values(&out, "SerialNumber"), vec!["15895", "15895", "10291624"]);
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        Ok(())
    }
}
