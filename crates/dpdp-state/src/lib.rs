//! # dpdp-state — Session Completion State
//!
//! Everything that changes while a user works through the checklist lives
//! here. The catalog is shared and immutable; each session owns exactly one
//! [`CompletionState`].
//!
//! ## Components
//!
//! - **Completion State** (`completion.rs`): a map from every
//!   [`SectionKey`](dpdp_core::SectionKey) in the catalog to an "audited"
//!   flag. Always total over the catalog keys, never holding stray keys.
//!
//! - **Aggregator** (`stats.rs`): pure functions deriving overall,
//!   per-chapter, and per-risk counts and percentages, plus the per-chapter
//!   summary table.
//!
//! - **Interaction Handlers** (`handlers.rs`): the three user intents
//!   (toggle one section, set a whole chapter, reset everything). Each
//!   returns an [`Outcome`] naming what the presentation layer must refresh.
//!
//! ## Design
//!
//! State is an explicit value passed to every operation; there is no global
//! slot. Mutations validate before they write, so a rejected call never
//! leaves a partially updated map.

pub mod completion;
pub mod handlers;
pub mod stats;

pub use completion::{CompletionState, StateError};
pub use handlers::{apply, Intent, Outcome, Refresh};
pub use stats::{
    chapter_stats, chapter_summary, overall_stats, risk_breakdown, ChapterStats, ChapterSummary,
    OverallStats, RiskBreakdown,
};
