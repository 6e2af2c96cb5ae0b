/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use renumtex::app_config::{CliOverrides, Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.metadata_extension, "aux");
    assert_eq!(config.source_extension, "tex");
    assert_eq!(config.record_tag, "newlabel");
    assert_eq!(config.include_tag, "@input");
    assert_eq!(config.commands, vec!["label", "ref"]);
    assert!(config.exclusion.prefixes.contains(&"sec".to_string()));
    assert!(config.exclusion.pattern.is_none());
    assert!(!config.backup);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.metadata_extension = " ".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.source_extension = "aux".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.commands = vec!["ref".to_string(), "bad name".to_string()];
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.commands.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.exclusion.pattern = Some("[".to_string());
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.commands.push("eqref".to_string());
    assert!(config.validate().is_ok());
}

/// Test that a missing config file falls back to defaults
#[test]
fn test_load_or_default_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load_or_default(temp_dir.path().join("renumtex.json"))?;

    assert_eq!(config.source_extension, "tex");
    Ok(())
}

/// Test that a partial config file keeps defaults for omitted fields
#[test]
fn test_load_or_default_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "renumtex.json",
        r#"{ "commands": ["label", "ref", "eqref"], "exclusion": { "prefixes": ["thm"] }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.commands, vec!["label", "ref", "eqref"]);
    assert_eq!(config.exclusion.prefixes, vec!["thm"]);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.metadata_extension, "aux");

    let rule = config.exclusion.rule()?;
    assert!(rule.is_excluded("thm:a"));
    assert!(!rule.is_excluded("sec:a"));
    Ok(())
}

/// Test that malformed JSON is an error
#[test]
fn test_load_or_default_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "renumtex.json", "{ not json")?;

    assert!(Config::load_or_default(&path).is_err());
    Ok(())
}

/// Test that a raw pattern overrides prefixes
#[test]
fn test_exclusion_rule_withPattern_shouldIgnorePrefixes() -> Result<()> {
    let mut config = Config::default();
    config.exclusion.pattern = Some("^tab".to_string());
    let rule = config.exclusion.rule()?;

    assert!(rule.is_excluded("tab:1"));
    assert!(!rule.is_excluded("sec:1"));
    Ok(())
}

/// Test that -x prefixes replace the list and drop a configured pattern
#[test]
fn test_apply_cli_overrides_withExclude_shouldReplacePrefixesAndClearPattern() -> Result<()> {
    let mut config = Config::default();
    config.exclusion.pattern = Some("^tab".to_string());

    config.apply_cli_overrides(CliOverrides {
        exclude: vec!["thm".to_string()],
        ..CliOverrides::default()
    });

    assert_eq!(config.exclusion.prefixes, vec!["thm"]);
    assert!(config.exclusion.pattern.is_none());
    let rule = config.exclusion.rule()?;
    assert!(rule.is_excluded("thm:1"));
    assert!(!rule.is_excluded("tab:1"));
    Ok(())
}

/// Test that --no-exclude clears both prefixes and pattern
#[test]
fn test_apply_cli_overrides_withNoExclude_shouldExcludeNothing() -> Result<()> {
    let mut config = Config::default();
    config.exclusion.pattern = Some("^tab".to_string());

    config.apply_cli_overrides(CliOverrides {
        no_exclude: true,
        ..CliOverrides::default()
    });

    assert!(config.exclusion.prefixes.is_empty());
    assert!(config.exclusion.pattern.is_none());
    assert!(!config.exclusion.rule()?.is_excluded("sec:intro"));
    Ok(())
}

/// Test that extra commands are appended once
#[test]
fn test_apply_cli_overrides_withCommands_shouldAddWithoutDuplicates() {
    let mut config = Config::default();

    config.apply_cli_overrides(CliOverrides {
        commands: vec!["eqref".to_string(), "ref".to_string(), "eqref".to_string()],
        ..CliOverrides::default()
    });

    assert_eq!(config.commands, vec!["label", "ref", "eqref"]);
}

/// Test that the backup flag and log level win over the file, and absent flags change nothing
#[test]
fn test_apply_cli_overrides_withBackupAndLevel_shouldForceThem() {
    let mut config = Config::default();
    config.apply_cli_overrides(CliOverrides::default());
    assert!(!config.backup);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.exclusion.prefixes.contains(&"sec".to_string()));

    config.apply_cli_overrides(CliOverrides {
        backup: true,
        log_level: Some(LogLevel::Trace),
        ..CliOverrides::default()
    });

    assert!(config.backup);
    assert_eq!(config.log_level, LogLevel::Trace);
}
