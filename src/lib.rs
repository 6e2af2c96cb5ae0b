/*!
 * # renumtex - Renumber LaTeX labels after their printed numbers
 *
 * A Rust library that rewrites `\label{...}` and `\ref{...}` arguments in LaTeX
 * sources so that each label reads the same as the number LaTeX printed for it.
 *
 * ## Features
 *
 * - Read `\newlabel` records from the `.aux` files of a previous LaTeX run
 * - Keep chapter, section, figure and similar labels via prefix exclusion
 * - Follow `\@input` declarations to renumber multi-file documents
 * - Single forward pass substitution that never rewrites its own output
 * - Safe in-place saving with optional backups and dry runs
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `metadata`: `.aux` readers
 *   - `metadata::records`: label records
 *   - `metadata::includes`: sub-document discovery
 * - `translation_table`: label to number table with exclusion rules
 * - `substitution`: source text rewriting
 * - `app_controller`: single-file and multi-file runs
 * - `app_config`: Configuration management
 * - `file_utils`: File reading and safe saving
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod metadata;
pub mod substitution;
pub mod translation_table;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileReport, RunSummary};
pub use errors::{AppError, RenumberError};
pub use metadata::{FileSet, IncludeResolver, Record, RecordParser};
pub use substitution::{Substitution, SubstitutionEngine};
pub use translation_table::{ExclusionRule, TranslationTable, TranslationTableBuilder};
