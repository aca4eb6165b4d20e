// src/xmlcon/mapping.rs

/// Coefficients the certificate names differently from the `.xmlcon` tags.
static CERTIFICATE_TO_XMLCON: &[(&str, &str)] = &[
    ("TA0", "A0"),
    ("TA1", "A1"),
    ("TA2", "A2"),
    ("TA3", "A3"),
    ("CPCOR", "CPcor"),
    ("CTCOR", "CTcor"),
];

/// Tag a certificate coefficient is written to. Unlisted names map to themselves.
pub fn xmlcon_tag(name: &str) -> &str {
    CERTIFICATE_TO_XMLCON
        .iter()
        .find(|(cert, _)| *cert == name)
        .map_or(name, |&(_, tag)| tag)
}
