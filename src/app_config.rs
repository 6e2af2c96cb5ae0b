use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::metadata::{
    DEFAULT_INCLUDE_TAG, DEFAULT_METADATA_EXTENSION, DEFAULT_RECORD_TAG, DEFAULT_SOURCE_EXTENSION,
    IncludeResolver, RecordParser,
};
use crate::substitution::{DEFAULT_COMMANDS, SubstitutionEngine};
use crate::translation_table::{DEFAULT_EXCLUDED_PREFIXES, ExclusionRule};

/// Application configuration module
/// This module handles loading and validating the settings that shape
/// how metadata is read and which labels are renumbered.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Extension of the metadata files written by LaTeX
    #[serde(default = "default_metadata_extension")]
    pub metadata_extension: String,

    /// Extension of the source files to rewrite
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Tag of label records in metadata files
    #[serde(default = "default_record_tag")]
    pub record_tag: String,

    /// Tag of include declarations in the root metadata file
    #[serde(default = "default_include_tag")]
    pub include_tag: String,

    /// Commands whose brace argument is a label
    #[serde(default = "default_commands")]
    pub commands: Vec<String>,

    /// Which labels keep their original text
    #[serde(default)]
    pub exclusion: ExclusionConfig,

    /// Copy each source file to a `.bak` file before overwriting it
    #[serde(default)]
    pub backup: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Exclusion settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExclusionConfig {
    /// Label prefixes that are never renumbered
    #[serde(default = "default_excluded_prefixes")]
    pub prefixes: Vec<String>,

    /// Raw regular expression; replaces `prefixes` when set
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for ExclusionConfig {
    fn default() -> Self {
        Self {
            prefixes: default_excluded_prefixes(),
            pattern: None,
        }
    }
}

impl ExclusionConfig {
    /// Compile the configured rule
    pub fn rule(&self) -> crate::errors::Result<ExclusionRule> {
        match &self.pattern {
            Some(pattern) => ExclusionRule::from_pattern(pattern),
            None => ExclusionRule::from_prefixes(&self.prefixes),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Settings given on the command line, applied over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub log_level: Option<LogLevel>,
    /// Force backups on; never turns them off
    pub backup: bool,
    /// Replacement prefix list, ignored when empty
    pub exclude: Vec<String>,
    /// Renumber every label
    pub no_exclude: bool,
    /// Commands added to the configured ones
    pub commands: Vec<String>,
}

fn default_metadata_extension() -> String {
    DEFAULT_METADATA_EXTENSION.to_string()
}

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

fn default_record_tag() -> String {
    DEFAULT_RECORD_TAG.to_string()
}

fn default_include_tag() -> String {
    DEFAULT_INCLUDE_TAG.to_string()
}

fn default_commands() -> Vec<String> {
    DEFAULT_COMMANDS.iter().map(|c| c.to_string()).collect()
}

fn default_excluded_prefixes() -> Vec<String> {
    DEFAULT_EXCLUDED_PREFIXES.iter().map(|p| p.to_string()).collect()
}

impl Config {
    /// Load the configuration file if it exists, otherwise use defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Apply command-line settings on top of the loaded values
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if overrides.backup {
            self.backup = true;
        }
        if overrides.no_exclude {
            self.exclusion.prefixes.clear();
            self.exclusion.pattern = None;
        } else if !overrides.exclude.is_empty() {
            self.exclusion.prefixes = overrides.exclude;
            self.exclusion.pattern = None;
        }
        for command in overrides.commands {
            if !self.commands.contains(&command) {
                self.commands.push(command);
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("metadata_extension", &self.metadata_extension),
            ("source_extension", &self.source_extension),
            ("record_tag", &self.record_tag),
            ("include_tag", &self.include_tag),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("'{}' must not be empty", name));
            }
        }

        if self.metadata_extension == self.source_extension {
            return Err(anyhow!(
                "Metadata and source extensions must differ (both are '{}')",
                self.source_extension
            ));
        }

        if let Some(bad) = self
            .commands
            .iter()
            .find(|c| c.is_empty() || !c.chars().all(|ch| ch.is_ascii_alphabetic() || ch == '@'))
        {
            return Err(anyhow!("Invalid command name '{}'", bad));
        }

        self.exclusion.rule().context("Invalid exclusion rule")?;
        self.substitution_engine().context("Invalid command list")?;
        Ok(())
    }

    /// Parser for the configured record tag
    pub fn record_parser(&self) -> crate::errors::Result<RecordParser> {
        RecordParser::new(&self.record_tag)
    }

    /// Resolver for the configured include tag and extensions
    pub fn include_resolver(&self) -> crate::errors::Result<IncludeResolver> {
        IncludeResolver::new(&self.include_tag, &self.metadata_extension, &self.source_extension)
    }

    /// Engine for the configured commands
    pub fn substitution_engine(&self) -> crate::errors::Result<SubstitutionEngine> {
        SubstitutionEngine::new(&self.commands)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            metadata_extension: default_metadata_extension(),
            source_extension: default_source_extension(),
            record_tag: default_record_tag(),
            include_tag: default_include_tag(),
            commands: default_commands(),
            exclusion: ExclusionConfig::default(),
            backup: false,
            log_level: LogLevel::default(),
        }
    }
}
