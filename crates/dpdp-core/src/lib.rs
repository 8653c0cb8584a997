//! # dpdp-core — Foundational Types for the DPDP Audit Checklist
//!
//! Defines the immutable checklist catalog for the Digital Personal Data
//! Protection Act, 2023: an ordered list of chapters, each holding an ordered
//! list of statutory sections with a fixed risk classification, an overview,
//! and an ordered audit procedure. Every other crate in the workspace depends
//! on `dpdp-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **A `Catalog` cannot exist without passing integrity validation.**
//!    Deserialization routes through a validating `TryFrom` conversion, so a
//!    catalog with a duplicate section key or an empty chapter is rejected at
//!    load time rather than discovered by a handler.
//!
//! 2. **`SectionKey` is the canonical identifier.** The `(chapter_id, number)`
//!    pair is a newtype with a stable textual form (`ch2-6`). No bare string
//!    pairs are passed between crates.
//!
//! 3. **Counts are derived.** The reference edition has 44 sections in
//!    9 chapters, but nothing outside the embedded data file knows that.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `dpdp-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod catalog;
pub mod error;
pub mod key;
pub mod risk;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use catalog::{Catalog, CatalogMetadata, Chapter, Section, REFERENCE_CATALOG_YAML};
pub use error::{CatalogError, DpdpError};
pub use key::SectionKey;
pub use risk::RiskLevel;
pub use temporal::Timestamp;
