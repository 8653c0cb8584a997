//! # API Route Modules
//!
//! - `catalog` — read-only catalog browsing and per-section audit guidance.
//! - `sessions` — audit session lifecycle, the three interaction intents,
//!   progress statistics, and report export.

pub mod catalog;
pub mod sessions;
