//! # Error Types
//!
//! - [`CatalogError`]: the catalog document could not be read or violates
//!   an integrity rule. Fatal at load time; the application must not start.
//! - [`DpdpError::Parse`]: a key, risk level, or timestamp given as text is
//!   malformed.
//!
//! References to keys absent from the catalog are reported by the state
//! crate, which owns the per-session flags.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared by the checklist crates.
#[derive(Error, Debug)]
pub enum DpdpError {
    /// The catalog failed to load or violated an integrity rule.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Input that is not a well-formed identifier, level, or timestamp.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Catalog load and integrity failures.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two chapters share the same id.
    #[error("duplicate chapter id {chapter_id:?}")]
    DuplicateChapter {
        /// The repeated chapter id.
        chapter_id: String,
    },

    /// A section number appears more than once in the catalog.
    #[error("duplicate section number {number:?} in chapter {chapter_id:?} (first defined in chapter {first_chapter_id:?})")]
    DuplicateSection {
        /// Chapter holding the repeated definition.
        chapter_id: String,
        /// The repeated section number.
        number: String,
        /// Chapter holding the first definition.
        first_chapter_id: String,
    },

    /// A chapter with no sections.
    #[error("chapter {chapter_id:?} has no sections")]
    EmptyChapter {
        /// The empty chapter.
        chapter_id: String,
    },

    /// A section without any audit step.
    #[error("section {number:?} in chapter {chapter_id:?} has no audit steps")]
    MissingAuditSteps {
        /// Owning chapter.
        chapter_id: String,
        /// Section number.
        number: String,
    },

    /// A chapter id or section number that cannot form a section key.
    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// The offending identifier.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A title that would not fit on one report line.
    #[error("invalid title {value:?}: {reason}")]
    InvalidTitle {
        /// The offending title.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The catalog file was not found.
    #[error("catalog file not found: {path}")]
    FileNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// YAML parsing failed for a catalog file.
    #[error("failed to parse catalog at {path}: {source}")]
    YamlParse {
        /// File being parsed.
        path: PathBuf,
        /// Underlying parser error.
        source: serde_yaml::Error,
    },

    /// YAML parsing failed for an in-memory document.
    #[error("failed to parse catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO error while reading a catalog file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
