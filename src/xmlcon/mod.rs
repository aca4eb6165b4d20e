// src/xmlcon/mod.rs
pub mod mapping;
pub mod patch;

pub use mapping::xmlcon_tag;
pub use patch::patch_document;

use anyhow::{Context, Result};
use regex::Regex;
use std::{fmt, ops::Range};

use crate::error::XmlconError;

/// Which of several identical tags to rewrite, counted in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    First,
    Nth(usize),
    Last,
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurrence::First => f.write_str("first"),
            Occurrence::Nth(i) => write!(f, "#{}", i),
            Occurrence::Last => f.write_str("last"),
        }
    }
}

/// `<TAG>` up to the next `<`, i.e. the opening tag and its text value.
fn element_regex(tag: &str) -> Result<Regex> {
    Regex::new(&format!("<{}>[^<]*<", regex::escape(tag)))
        .with_context(|| format!("building pattern for <{}>", tag))
}

/// Byte ranges of every `<TAG>value<` span, in document order.
pub fn element_spans(document: &str, tag: &str) -> Result<Vec<Range<usize>>> {
    let re = element_regex(tag)?;
    Ok(re.find_iter(document).map(|m| m.range()).collect())
}

/// Rewrite the value of one `<TAG>` element in place.
///
/// `First` leaves the document alone when the tag is absent and returns
/// `false`. `Nth` and `Last` select a specific sensor block, so a missing
/// occurrence is an error.
pub fn replace_element(
    document: &mut String,
    tag: &str,
    value: &str,
    occurrence: Occurrence,
) -> Result<bool> {
    let span = match occurrence {
        Occurrence::First => match element_regex(tag)?.find(document.as_str()) {
            Some(m) => m.range(),
            None => return Ok(false),
        },
        Occurrence::Nth(_) | Occurrence::Last => {
            let spans = element_spans(document.as_str(), tag)?;
            let found = spans.len();
            let picked = match occurrence {
                Occurrence::Nth(i) => spans.into_iter().nth(i),
                _ => spans.into_iter().last(),
            };
            picked.ok_or_else(|| XmlconError::MissingOccurrence {
                tag: tag.to_string(),
                occurrence,
                found,
            })?
        }
    };

    document.replace_range(span, &format!("<{}>{}<", tag, value));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "<a><Offset>1.0</Offset><Offset>2.0</Offset><Offset>3.0</Offset></a>";

    #[test]
    fn spans_are_in_document_order() -> Result<()> {
        let spans = element_spans(DOC, "Offset")?;
        assert_eq!(spans.len(), 3);
        assert_eq!(&DOC[spans[0].clone()], "<Offset>1.0<");
        assert_eq!(&DOC[spans[2].clone()], "<Offset>3.0<");
        Ok(())
    }

    #[test]
    fn first_only_touches_the_first() -> Result<()> {
        let mut doc = DOC.to_string();
        assert!(replace_element(&mut doc, "Offset", "9", Occurrence::First)?);
        assert_eq!(
            doc,
            "<a><Offset>9</Offset><Offset>2.0</Offset><Offset>3.0</Offset></a>"
        );
        Ok(())
    }

    #[test]
    fn nth_and_last() -> Result<()> {
        let mut doc = DOC.to_string();
        replace_element(&mut doc, "Offset", "8", Occurrence::Nth(1))?;
        replace_element(&mut doc, "Offset", "7", Occurrence::Last)?;
        assert_eq!(
            doc,
            "<a><Offset>1.0</Offset><Offset>8</Offset><Offset>7</Offset></a>"
        );
        Ok(())
    }

    #[test]
    fn missing_first_is_a_no_op() -> Result<()> {
        let mut doc = DOC.to_string();
        assert!(!replace_element(&mut doc, "Slope", "1", Occurrence::First)?);
        assert_eq!(doc, DOC);
        Ok(())
    }

    #[test]
    fn missing_positional_is_an_error() {
        let mut doc = DOC.to_string();
        let err = replace_element(&mut doc, "Offset", "1", Occurrence::Nth(3)).unwrap_err();
        match err.downcast_ref::<XmlconError>() {
            Some(XmlconError::MissingOccurrence { tag, found, .. }) => {
                assert_eq!(tag, "Offset");
                assert_eq!(*found, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(replace_element(&mut doc, "Gain", "1", Occurrence::Last).is_err());
        assert_eq!(doc, DOC);
    }

    #[test]
    fn values_are_inserted_literally() -> Result<()> {
        let mut doc = "<G>0<".to_string();
        replace_element(&mut doc, "G", "$1 ${0}", Occurrence::First)?;
        assert_eq!(doc, "<G>$1 ${0}<");
        Ok(())
    }

    #[test]
    fn tag_names_are_not_patterns() -> Result<()> {
        let doc = "<A0>1</A0><AX>2</AX>";
        assert_eq!(element_spans(doc, "A.")?.len(), 0);
        assert_eq!(element_spans(doc, "A0")?.len(), 1);
        Ok(())
    }
}
