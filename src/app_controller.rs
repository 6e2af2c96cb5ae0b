use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::Result;
use crate::file_utils::{FileManager, SaveOptions, SaveOutcome, SourceDocument};
use crate::metadata::{FileSet, IncludeResolver, RecordParser};
use crate::substitution::SubstitutionEngine;
use crate::translation_table::{ExclusionRule, TranslationTable, TranslationTableBuilder};

// @module: Application controller for label renumbering

/// Outcome for one rewritten source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub source: PathBuf,
    pub occurrences: usize,
    pub replaced: usize,
    pub outcome: SaveOutcome,
}

impl FileReport {
    pub fn written(&self) -> bool {
        self.outcome == SaveOutcome::Written
    }
}

/// Everything a run did, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of labels in the translation table
    pub table_size: usize,
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn total_occurrences(&self) -> usize {
        self.files.iter().map(|f| f.occurrences).sum()
    }

    pub fn total_replaced(&self) -> usize {
        self.files.iter().map(|f| f.replaced).sum()
    }

    pub fn files_written(&self) -> usize {
        self.files.iter().filter(|f| f.written()).count()
    }
}

/// Main application controller: turns a base name into rewritten sources
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Directory all file names are resolved against
    work_dir: PathBuf,
    save_options: SaveOptions,
    show_progress: bool,
    parser: RecordParser,
    resolver: IncludeResolver,
    engine: SubstitutionEngine,
    rule: ExclusionRule,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let parser = config.record_parser()?;
        let resolver = config.include_resolver()?;
        let engine = config.substitution_engine()?;
        let rule = config.exclusion.rule()?;
        let save_options = SaveOptions {
            backup: config.backup,
            dry_run: false,
        };

        Ok(Self {
            config,
            work_dir: PathBuf::new(),
            save_options,
            show_progress: true,
            parser,
            resolver,
            engine,
            rule,
        })
    }

    /// Resolve file names against `dir` instead of the current directory
    pub fn with_work_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_save_options(mut self, options: SaveOptions) -> Self {
        self.save_options = options;
        self
    }

    /// Show a progress bar while rewriting multi-file documents
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Strip a trailing metadata or source extension from a user-supplied name
    pub fn normalize_base_name<'a>(&self, base_name: &'a str) -> &'a str {
        for ext in [&self.config.source_extension, &self.config.metadata_extension] {
            if let Some(stem) = base_name.strip_suffix(ext.as_str()).and_then(|s| s.strip_suffix('.')) {
                if !stem.is_empty() {
                    return stem;
                }
            }
        }
        base_name
    }

    /// Renumber a standalone document: `BASE.aux` drives the rewrite of `BASE.tex`
    pub fn renumber_single(&self, base_name: &str) -> Result<RunSummary> {
        let base_name = self.normalize_base_name(base_name);
        let file_set = FileSet::single(
            &self.work_dir,
            base_name,
            &self.config.metadata_extension,
            &self.config.source_extension,
        );

        let table = self.build_table(&file_set.metadata_files)?;
        self.rewrite_sources(&file_set.source_files, &table, false)
    }

    /// Renumber the sub-documents listed in `BASE.aux`.
    ///
    /// Only included files are rewritten, and only their labels enter the
    /// table. The root document keeps its labels.
    pub fn renumber_multi(&self, base_name: &str) -> Result<RunSummary> {
        let base_name = self.normalize_base_name(base_name);
        let root = self.work_dir.join(format!("{}.{}", base_name, self.config.metadata_extension));
        let file_set = self.resolver.resolve(&root, &self.work_dir)?;

        if file_set.is_empty() {
            warn!("{} does not include any sub-documents", root.display());
            return Ok(RunSummary::default());
        }
        debug!("Root document {} is not rewritten in multi-file mode", base_name);

        let table = self.build_table(&file_set.metadata_files)?;
        self.rewrite_sources(&file_set.source_files, &table, self.show_progress)
    }

    /// Read and concatenate metadata files in order, then build the table
    pub fn build_table<P: AsRef<Path>>(&self, metadata_files: &[P]) -> Result<TranslationTable> {
        let content = FileManager::read_concatenated(metadata_files)?;
        let records = self.parser.parse(&content);
        debug!("Parsed {} label record(s) from {} metadata file(s)", records.len(), metadata_files.len());
        Ok(TranslationTableBuilder::build(self.rule.clone(), records))
    }

    fn rewrite_sources(&self, sources: &[PathBuf], table: &TranslationTable, show_progress: bool) -> Result<RunSummary> {
        let mut summary = RunSummary {
            table_size: table.len(),
            files: Vec::with_capacity(sources.len()),
        };

        let progress_bar = if show_progress {
            let pb = ProgressBar::new(sources.len() as u64);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"))
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            pb.set_style(style);
            pb
        } else {
            ProgressBar::hidden()
        };

        for source in sources {
            progress_bar.set_message(source.display().to_string());
            let report = match self.rewrite_source(source, table) {
                Ok(report) => report,
                Err(e) => {
                    progress_bar.abandon();
                    return Err(e);
                }
            };
            summary.files.push(report);
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        info!(
            "Renumbered {} of {} reference(s) across {} file(s), {} written",
            summary.total_replaced(),
            summary.total_occurrences(),
            summary.files.len(),
            summary.files_written()
        );
        Ok(summary)
    }

    fn rewrite_source(&self, source: &Path, table: &TranslationTable) -> Result<FileReport> {
        let document = SourceDocument::load(source)?;
        let substitution = self.engine.substitute(&document.content, table);
        let outcome = FileManager::save(&document, &substitution.text, self.save_options)?;

        match outcome {
            SaveOutcome::Written => info!(
                "{}: {} of {} label(s) renumbered",
                source.display(),
                substitution.replaced,
                substitution.occurrences
            ),
            SaveOutcome::Skipped => info!(
                "{}: {} of {} label(s) would be renumbered (dry run)",
                source.display(),
                substitution.replaced,
                substitution.occurrences
            ),
            SaveOutcome::Unchanged => debug!("{}: nothing to renumber", source.display()),
        }

        Ok(FileReport {
            source: source.to_path_buf(),
            occurrences: substitution.occurrences,
            replaced: substitution.replaced,
            outcome,
        })
    }
}
