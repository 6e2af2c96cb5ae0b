use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::errors::{RenumberError, Result};
use crate::metadata::Record;

// @module: Label to rendered-number table construction

/// Label prefixes that keep their text by default: chapters, sections,
/// figures, pictures, notes and pages
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["ch", "sec", "fig", "pic", "note", "page"];

// @const: Compiled rule for the default prefixes
static DEFAULT_RULE: Lazy<ExclusionRule> = Lazy::new(|| {
    ExclusionRule::from_prefixes(DEFAULT_EXCLUDED_PREFIXES).expect("default prefixes are valid")
});

/// Labels matching this rule never enter a translation table
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    pattern: Option<Regex>,
}

impl ExclusionRule {
    /// A rule that excludes nothing
    pub fn none() -> Self {
        Self { pattern: None }
    }

    /// Exclude labels starting with any of `prefixes`. An empty list excludes nothing.
    pub fn from_prefixes<S: AsRef<str>>(prefixes: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = prefixes
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();
        if alternatives.is_empty() {
            return Ok(Self::none());
        }
        Self::from_pattern(&format!("^(?:{})", alternatives.join("|")))
    }

    /// Exclude labels matching an arbitrary regular expression
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|e| RenumberError::InvalidPattern {
            pattern: pattern.to_string(),
            source: e,
        })?;
        Ok(Self { pattern: Some(regex) })
    }

    pub fn is_excluded(&self, label: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(label))
    }

    pub fn as_str(&self) -> Option<&str> {
        self.pattern.as_ref().map(|p| p.as_str())
    }
}

impl Default for ExclusionRule {
    fn default() -> Self {
        DEFAULT_RULE.clone()
    }
}

/// Immutable mapping from label to rendered number, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TranslationTable {
    /// Rendered number for `label`, if it has one
    pub fn get(&self, label: &str) -> Option<&str> {
        self.index.get(label).map(|&i| self.entries[i].1.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order their labels were first seen
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, n)| (l.as_str(), n.as_str()))
    }
}

/// Counters collected while building a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Records dropped by the exclusion rule
    pub excluded: usize,
    /// Records whose label was already in the table
    pub shadowed: usize,
}

/// Builds a `TranslationTable` from records, first seen wins.
///
/// A later record for a label already in the table is dropped even when its
/// number differs. Such conflicts are counted but not reported as errors.
#[derive(Debug)]
pub struct TranslationTableBuilder {
    rule: ExclusionRule,
    table: TranslationTable,
    stats: BuildStats,
}

impl TranslationTableBuilder {
    pub fn new(rule: ExclusionRule) -> Self {
        Self {
            rule,
            table: TranslationTable::default(),
            stats: BuildStats::default(),
        }
    }

    pub fn push(&mut self, record: Record) {
        if self.rule.is_excluded(&record.label) {
            self.stats.excluded += 1;
            return;
        }

        match self.table.index.entry(record.label) {
            Entry::Occupied(_) => self.stats.shadowed += 1,
            Entry::Vacant(slot) => {
                let label = slot.key().clone();
                slot.insert(self.table.entries.len());
                self.table.entries.push((label, record.rendered_number));
            }
        }
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn finish(self) -> TranslationTable {
        debug!(
            "Translation table: {} label(s), {} excluded, {} shadowed duplicate(s)",
            self.table.len(),
            self.stats.excluded,
            self.stats.shadowed
        );
        self.table
    }

    /// Build a table from records in one call
    pub fn build<I: IntoIterator<Item = Record>>(rule: ExclusionRule, records: I) -> TranslationTable {
        let mut builder = Self::new(rule);
        for record in records {
            builder.push(record);
        }
        builder.finish()
    }
}
