// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::Write;

use renumtex::app_config::{self, CliOverrides, Config};
use renumtex::app_controller::Controller;
use renumtex::file_utils::SaveOptions;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Renumber a standalone document (BASE.aux drives BASE.tex)
    #[command(alias = "s")]
    Single {
        /// Document name without extension
        #[arg(value_name = "BASE")]
        base_name: String,
    },

    /// Renumber the sub-documents a root document includes.
    ///
    /// Labels are taken from the included .aux files only, and only the
    /// included .tex files are rewritten. The root document is left as is.
    #[command(alias = "m")]
    Multi {
        /// Root document name without extension
        #[arg(value_name = "BASE")]
        base_name: String,
    },

    /// Generate shell completions for renumtex
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// renumtex - make LaTeX labels match their printed numbers
#[derive(Parser, Debug)]
#[command(name = "renumtex")]
#[command(version)]
#[command(about = "Rewrite \\label and \\ref arguments to the numbers LaTeX printed")]
#[command(long_about = "renumtex reads the .aux files of a previous LaTeX run and rewrites
\\label{...} and \\ref{...} arguments in the matching .tex files to the rendered numbers.

EXAMPLES:
    renumtex single paper                 # paper.aux -> paper.tex
    renumtex multi thesis                 # every file thesis.aux includes
    renumtex -n multi thesis              # report without writing
    renumtex -x sec -x fig single paper   # leave sec* and fig* labels unchanged
    renumtex --no-exclude single paper    # renumber every label
    renumtex completions bash > renumtex.bash

CONFIGURATION:
    Settings are read from renumtex.json when it exists. Use --config to
    point at another file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long = "config", value_name = "FILE", default_value = "renumtex.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,

    /// Report what would change without writing any file
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Keep a .bak copy of every rewritten file
    #[arg(short, long, global = true)]
    backup: bool,

    /// Label prefix to keep unchanged (repeatable, replaces the defaults)
    #[arg(short = 'x', long = "exclude", value_name = "PREFIX", global = true)]
    exclude: Vec<String>,

    /// Renumber every label, ignoring all exclusion prefixes
    #[arg(long, global = true, conflicts_with = "exclude")]
    no_exclude: bool,

    /// Extra command whose argument is a label, e.g. eqref (repeatable)
    #[arg(long = "command", value_name = "NAME", global = true)]
    commands: Vec<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() {
    // Info until the config is loaded
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: CommandLineOptions) -> Result<()> {
    let base_name = match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "renumtex", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Single { base_name } | Commands::Multi { base_name } => base_name.clone(),
    };

    let config = load_config(&cli)?;
    log::set_max_level((&config.log_level).into());

    let save_options = SaveOptions {
        backup: config.backup,
        dry_run: cli.dry_run,
    };
    let controller = Controller::with_config(config)
        .context("Failed to prepare renumbering")?
        .with_save_options(save_options);

    let summary = match cli.command {
        Commands::Multi { .. } => controller.renumber_multi(&base_name)?,
        _ => controller.renumber_single(&base_name)?,
    };

    if cli.dry_run {
        info!(
            "Dry run: {} reference(s) in {} file(s) would change",
            summary.total_replaced(),
            summary.files.iter().filter(|f| f.replaced > 0).count()
        );
    }

    Ok(())
}

// @loads: Configuration file, then command-line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_default(&cli.config_path)?;

    config.apply_cli_overrides(CliOverrides {
        log_level: cli.log_level.clone().map(Into::into),
        backup: cli.backup,
        exclude: cli.exclude.clone(),
        no_exclude: cli.no_exclude,
        commands: cli.commands.clone(),
    });

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}
