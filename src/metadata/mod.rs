/*!
 * Readers for the `.aux` metadata files written by a previous LaTeX run.
 *
 * - `records`: `\newlabel` entries giving each label its rendered number
 * - `includes`: `\@input` declarations listing the sub-documents of a root file
 */

pub mod includes;
pub mod records;

pub use includes::{FileSet, IncludeResolver};
pub use records::{Record, RecordParser};

// @const: Default metadata and source extensions
pub const DEFAULT_METADATA_EXTENSION: &str = "aux";
pub const DEFAULT_SOURCE_EXTENSION: &str = "tex";

// @const: Default record and include tags
pub const DEFAULT_RECORD_TAG: &str = "newlabel";
pub const DEFAULT_INCLUDE_TAG: &str = "@input";
