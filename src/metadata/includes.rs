use log::debug;
use regex::bytes::Regex;
use std::path::{Path, PathBuf};

use crate::errors::{RenumberError, Result};
use crate::file_utils::FileManager;
use crate::metadata::{DEFAULT_INCLUDE_TAG, DEFAULT_METADATA_EXTENSION, DEFAULT_SOURCE_EXTENSION};

// @module: Sub-document discovery for multi-file documents

/// Metadata files and their source files, paired by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet {
    pub metadata_files: Vec<PathBuf>,
    pub source_files: Vec<PathBuf>,
}

impl FileSet {
    /// The one-pair set for a standalone document
    pub fn single(work_dir: &Path, base_name: &str, metadata_extension: &str, source_extension: &str) -> Self {
        Self {
            metadata_files: vec![work_dir.join(format!("{}.{}", base_name, metadata_extension))],
            source_files: vec![work_dir.join(format!("{}.{}", base_name, source_extension))],
        }
    }

    pub fn len(&self) -> usize {
        self.source_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source_files.is_empty()
    }

    fn push(&mut self, metadata_file: PathBuf, source_file: PathBuf) {
        self.metadata_files.push(metadata_file);
        self.source_files.push(source_file);
    }
}

/// Finds `\@input{NAME.aux}` declarations in a root metadata file
#[derive(Debug, Clone)]
pub struct IncludeResolver {
    pattern: Regex,
    metadata_extension: String,
    source_extension: String,
}

impl IncludeResolver {
    pub fn new(include_tag: &str, metadata_extension: &str, source_extension: &str) -> Result<Self> {
        let source = format!(
            r"\\{}\{{((?-u:[^{{}}])+)\.{}\}}",
            regex::escape(include_tag),
            regex::escape(metadata_extension)
        );
        let pattern = Regex::new(&source).map_err(|e| RenumberError::InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;

        Ok(Self {
            pattern,
            metadata_extension: metadata_extension.to_string(),
            source_extension: source_extension.to_string(),
        })
    }

    /// Read the root metadata file and list its included sub-documents.
    ///
    /// The root document itself is not part of the result.
    pub fn resolve<P: AsRef<Path>>(&self, root_metadata: P, work_dir: &Path) -> Result<FileSet> {
        let root_metadata = root_metadata.as_ref();
        let content = FileManager::read_bytes(root_metadata)?;
        let file_set = self.resolve_content(&content, work_dir);
        debug!(
            "{} lists {} included file(s)",
            root_metadata.display(),
            file_set.len()
        );
        Ok(file_set)
    }

    /// Same as `resolve`, on text already in memory.
    ///
    /// Names that are absolute or not valid UTF-8 are skipped, so every
    /// entry stays inside `work_dir`.
    pub fn resolve_content<T: AsRef<[u8]> + ?Sized>(&self, content: &T, work_dir: &Path) -> FileSet {
        let mut file_set = FileSet::default();
        for caps in self.pattern.captures_iter(content.as_ref()) {
            let Ok(name) = std::str::from_utf8(&caps[1]) else {
                debug!("Skipping include with a non UTF-8 name: {}", String::from_utf8_lossy(&caps[0]));
                continue;
            };
            if Path::new(name).has_root() || Path::new(name).is_absolute() {
                debug!("Skipping include outside the working directory: {}", name);
                continue;
            }
            file_set.push(
                work_dir.join(format!("{}.{}", name, self.metadata_extension)),
                work_dir.join(format!("{}.{}", name, self.source_extension)),
            );
        }
        file_set
    }
}

impl Default for IncludeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_INCLUDE_TAG, DEFAULT_METADATA_EXTENSION, DEFAULT_SOURCE_EXTENSION)
            .expect("default include tag is a valid pattern")
    }
}
