use log::debug;
use once_cell::sync::Lazy;
use regex::bytes::Regex;

use crate::errors::{RenumberError, Result};
use crate::metadata::DEFAULT_RECORD_TAG;

// @module: Label record extraction from metadata text

// @const: Parser for the standard `\newlabel` tag
static DEFAULT_PARSER: Lazy<RecordParser> = Lazy::new(|| {
    RecordParser::new(DEFAULT_RECORD_TAG).expect("default record tag is a valid pattern")
});

/// A label together with the number LaTeX rendered for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub label: String,
    pub rendered_number: String,
}

impl Record {
    pub fn new(label: impl Into<String>, rendered_number: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            rendered_number: rendered_number.into(),
        }
    }
}

/// Extracts `TAG{LABEL}{{NUMBER}{LOCATOR}...` entries from metadata text.
///
/// Anything that does not have this shape is skipped. Hyperref adds further
/// groups after the locator; those are ignored along with the locator.
/// The text may be in any byte encoding, but a record whose label or number
/// is not valid UTF-8 is dropped.
#[derive(Debug, Clone)]
pub struct RecordParser {
    pattern: Regex,
}

impl RecordParser {
    /// Create a parser for a record tag such as `newlabel`
    pub fn new(record_tag: &str) -> Result<Self> {
        let source = format!(
            r"\\{}\{{((?-u:[^{{}}])*)\}}\{{\{{((?-u:[^{{}}])*)\}}\{{((?-u:[^{{}}])*)\}}",
            regex::escape(record_tag)
        );
        let pattern = Regex::new(&source).map_err(|e| RenumberError::InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self { pattern })
    }

    /// Records in input order, duplicates included
    pub fn parse<T: AsRef<[u8]> + ?Sized>(&self, content: &T) -> Vec<Record> {
        self.pattern
            .captures_iter(content.as_ref())
            .filter_map(|caps| {
                match (std::str::from_utf8(&caps[1]), std::str::from_utf8(&caps[2])) {
                    (Ok(label), Ok(number)) => Some(Record::new(label, number)),
                    _ => {
                        debug!("Skipping record that is not valid UTF-8: {}", String::from_utf8_lossy(&caps[0]));
                        None
                    }
                }
            })
            .collect()
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}
