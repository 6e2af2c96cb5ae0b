/*!
 * Tests for include declaration resolution
 */

use anyhow::Result;
use std::path::{Path, PathBuf};
use renumtex::RenumberError;
use renumtex::metadata::IncludeResolver;
use crate::common;

/// Test that includes come back in declaration order with paired source names
#[test]
fn test_resolve_content_withTwoIncludes_shouldKeepDeclarationOrder() {
    let root = "\\relax\n\\@input{chapter1.aux}\n\\@input{chapter2.aux}\n";
    let file_set = IncludeResolver::default().resolve_content(root, Path::new(""));

    assert_eq!(
        file_set.metadata_files,
        vec![PathBuf::from("chapter1.aux"), PathBuf::from("chapter2.aux")]
    );
    assert_eq!(
        file_set.source_files,
        vec![PathBuf::from("chapter1.tex"), PathBuf::from("chapter2.tex")]
    );
}

/// Test that inputs with another extension are not includes
#[test]
fn test_resolve_content_withForeignExtension_shouldSkipIt() {
    let root = "\\@input{notes.toc}\n\\@input{appendix.aux}\n";
    let file_set = IncludeResolver::default().resolve_content(root, Path::new(""));

    assert_eq!(file_set.metadata_files, vec![PathBuf::from("appendix.aux")]);
    assert_eq!(file_set.source_files, vec![PathBuf::from("appendix.tex")]);
}

/// Test that the root's own records do not produce entries
#[test]
fn test_resolve_content_withOnlyLabels_shouldReturnEmptySet() {
    let root = "\\newlabel{eq:a}{{1}{1}}\n";
    assert!(IncludeResolver::default().resolve_content(root, Path::new("")).is_empty());
}

/// Test that file names are resolved inside the working directory
#[test]
fn test_resolve_withRootOnDisk_shouldJoinWorkDir() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = common::create_test_file(temp_dir.path(), "book.aux", "\\@input{part.aux}\n")?;

    let file_set = IncludeResolver::default().resolve(&root, temp_dir.path())?;

    assert_eq!(file_set.metadata_files, vec![temp_dir.path().join("part.aux")]);
    assert_eq!(file_set.source_files, vec![temp_dir.path().join("part.tex")]);
    Ok(())
}

/// Test that a missing root file is reported with its path
#[test]
fn test_resolve_withMissingRoot_shouldFailWithMissingFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().join("absent.aux");

    let err = IncludeResolver::default().resolve(&root, temp_dir.path()).unwrap_err();

    assert!(matches!(err, RenumberError::MissingFile { .. }));
    assert_eq!(err.missing_path(), Some(root.as_path()));
    Ok(())
}

/// Test custom tags and extensions
#[test]
fn test_resolve_content_withCustomExtensions_shouldDeriveBothNames() {
    let resolver = IncludeResolver::new("include", "meta", "ltx").unwrap();
    let file_set = resolver.resolve_content("\\include{a.meta}\\@input{b.aux}", Path::new(""));

    assert_eq!(file_set.metadata_files, vec![PathBuf::from("a.meta")]);
    assert_eq!(file_set.source_files, vec![PathBuf::from("a.ltx")]);
}

/// Test that absolute include names never leave the working directory
#[test]
fn test_resolve_content_withAbsoluteName_shouldSkipIt() {
    let root = "\\@input{/etc/outside.aux}\n\\@input{inside.aux}\n";
    let file_set = IncludeResolver::default().resolve_content(root, Path::new("thesis"));

    assert_eq!(file_set.metadata_files, vec![PathBuf::from("thesis/inside.aux")]);
    assert_eq!(file_set.source_files, vec![PathBuf::from("thesis/inside.tex")]);
}
