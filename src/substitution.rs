use once_cell::sync::Lazy;
use regex::bytes::{Captures, Regex};

use crate::errors::{RenumberError, Result};
use crate::translation_table::TranslationTable;

// @module: Label and reference rewriting in source text

/// Commands whose argument is rewritten by default
pub const DEFAULT_COMMANDS: &[&str] = &["label", "ref"];

// @const: Engine for `\label` and `\ref`
static DEFAULT_ENGINE: Lazy<SubstitutionEngine> = Lazy::new(|| {
    SubstitutionEngine::new(DEFAULT_COMMANDS).expect("default commands are valid")
});

/// Result of rewriting one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    /// The rewritten text, byte for byte identical outside replaced arguments
    pub text: Vec<u8>,
    /// Label/reference commands found
    pub occurrences: usize,
    /// Commands whose argument actually changed
    pub replaced: usize,
}

impl Substitution {
    pub fn is_changed(&self) -> bool {
        self.replaced > 0
    }
}

/// Rewrites `\COMMAND{ARG}` arguments through a translation table.
///
/// The scan is a single forward pass: replacement text is appended to the
/// output and never matched again. The command keyword and any whitespace
/// before the brace are kept as written. Text is matched as bytes, so
/// sources that are not UTF-8 pass through unchanged; only arguments that
/// are valid UTF-8 can be looked up.
#[derive(Debug, Clone)]
pub struct SubstitutionEngine {
    pattern: Regex,
}

impl SubstitutionEngine {
    pub fn new<S: AsRef<str>>(commands: &[S]) -> Result<Self> {
        let names: Vec<String> = commands
            .iter()
            .map(|c| c.as_ref().trim())
            .filter(|c| !c.is_empty())
            .map(regex::escape)
            .collect();
        if names.is_empty() {
            return Err(RenumberError::Config(
                "at least one label or reference command is required".to_string(),
            ));
        }

        let source = format!(r"(\\(?:{})\s*)\{{((?-u:[^}}])*)\}}", names.join("|"));
        let pattern = Regex::new(&source).map_err(|e| RenumberError::InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self { pattern })
    }

    /// Rewrite every known label in `text`. Unknown labels are copied verbatim.
    pub fn substitute<T: AsRef<[u8]> + ?Sized>(&self, text: &T, table: &TranslationTable) -> Substitution {
        let mut occurrences = 0;
        let mut replaced = 0;

        let rewritten = self.pattern.replace_all(text.as_ref(), |caps: &Captures| {
            occurrences += 1;
            let argument = std::str::from_utf8(&caps[2]).ok();
            match argument.and_then(|arg| table.get(arg).filter(|number| *number != arg)) {
                Some(number) => {
                    replaced += 1;
                    let mut out = caps[1].to_vec();
                    out.push(b'{');
                    out.extend_from_slice(number.as_bytes());
                    out.push(b'}');
                    out
                }
                None => caps[0].to_vec(),
            }
        });

        Substitution {
            text: rewritten.into_owned(),
            occurrences,
            replaced,
        }
    }
}

impl Default for SubstitutionEngine {
    fn default() -> Self {
        DEFAULT_ENGINE.clone()
    }
}
