use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::errors::{RenumberError, Result};

// @module: File reading and safe saving for metadata and source files

// @const: Suffix appended to backup copies
pub const BACKUP_SUFFIX: &str = "bak";

/// Options controlling how rewritten sources are persisted
#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Copy the original to `NAME.ext.bak` before overwriting
    pub backup: bool,
    /// Compute everything but never touch the disk
    pub dry_run: bool,
}

/// What happened when a source document was saved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New content was written in place
    Written,
    /// Content did not change, nothing was written
    Unchanged,
    /// Content changed but the run was a dry run
    Skipped,
}

/// A source file as read from disk, with a checksum of what was read.
///
/// Content is kept as raw bytes so text in any encoding is written back
/// exactly as it was read.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub content: Vec<u8>,
    digest: String,
}

impl SourceDocument {
    /// Read a source document and remember its checksum
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_bytes(path)?;
        let digest = FileManager::checksum(&content);
        Ok(Self {
            path: path.to_path_buf(),
            content,
            digest,
        })
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    /// Read a whole file without assuming any text encoding
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        fs::read(&path).map_err(|e| RenumberError::missing_file(&path, e))
    }

    /// Read several files and join their contents in the given order
    pub fn read_concatenated<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<u8>> {
        let mut combined = Vec::new();
        for path in paths {
            let content = Self::read_bytes(path)?;
            combined.extend_from_slice(&content);
            if !content.ends_with(b"\n") {
                combined.push(b'\n');
            }
        }
        Ok(combined)
    }

    /// Hex SHA-256 of a byte buffer
    pub fn checksum(content: &[u8]) -> String {
        format!("{:x}", Sha256::digest(content))
    }

    /// Path of the backup copy for a source file
    pub fn backup_path<P: AsRef<Path>>(path: P) -> PathBuf {
        let path = path.as_ref();
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(BACKUP_SUFFIX);
        path.with_file_name(name)
    }

    /// Copy a file from one location to another
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        fs::copy(&from, &to).map_err(|e| RenumberError::missing_file(&to, e))?;
        Ok(())
    }

    /// Persist rewritten content over a previously loaded document.
    ///
    /// Unchanged content is never written. If the file on disk no longer matches
    /// the checksum taken at load time the save is refused.
    pub fn save(document: &SourceDocument, new_content: &[u8], options: SaveOptions) -> Result<SaveOutcome> {
        if Self::checksum(new_content) == document.digest {
            return Ok(SaveOutcome::Unchanged);
        }
        if options.dry_run {
            return Ok(SaveOutcome::Skipped);
        }

        let on_disk = Self::read_bytes(&document.path)?;
        if Self::checksum(&on_disk) != document.digest {
            return Err(RenumberError::ChangedOnDisk {
                path: document.path.clone(),
            });
        }

        if options.backup {
            let backup = Self::backup_path(&document.path);
            debug!("Backing up {} to {}", document.path.display(), backup.display());
            Self::copy_file(&document.path, &backup)?;
        }

        Self::replace_in_place(&document.path, new_content)?;
        Ok(SaveOutcome::Written)
    }

    /// Replace an existing file through a temporary file next to it.
    ///
    /// Symlinks are followed so the file they point at is the one replaced,
    /// and the original permissions carry over to the new content.
    fn replace_in_place(path: &Path, content: &[u8]) -> Result<()> {
        let io_error = |e: std::io::Error| RenumberError::missing_file(path, e);

        let target = fs::canonicalize(path).map_err(io_error)?;
        let permissions = fs::metadata(&target).map_err(io_error)?.permissions();
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        if target.as_path() != path {
            debug!("{} resolves to {}", path.display(), target.display());
        }

        let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
        temp.write_all(content).map_err(io_error)?;
        temp.as_file().set_permissions(permissions).map_err(io_error)?;
        temp.persist(&target).map_err(|e| io_error(e.error))?;
        Ok(())
    }
}
