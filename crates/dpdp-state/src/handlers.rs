//! # Interaction Handlers
//!
//! The three user intents and what each one obliges the presentation layer
//! to recompute.
//!
//! | Intent          | Mutation                         | Refresh                  |
//! |-----------------|----------------------------------|--------------------------|
//! | `ToggleSection` | flip one flag                    | overall + owning chapter |
//! | `SetChapter`    | `set_all(chapter, value)`, gated | overall + that chapter   |
//! | `ResetAll`      | every flag to `false`            | everything               |
//!
//! ## Chapter Control Semantics
//!
//! `SetChapter` carries the new value of the chapter's "mark all complete"
//! control, whose displayed value is the chapter's `all_done`. The mutation
//! runs only when the new value differs from the current `all_done`; moving
//! the control to the value it already shows is a no-op with nothing to
//! refresh. A partially complete chapter shows `false`, so checking it marks
//! every section and unchecking it (re-confirming `false`) does nothing.
//! This gate compares against `all_done`, not against individual flags.

use serde::{Deserialize, Serialize};

use dpdp_core::{Catalog, SectionKey};

use crate::completion::{CompletionState, StateError};
use crate::stats::chapter_stats;

/// A user action forwarded by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    /// Flip one section's flag.
    ToggleSection {
        /// Section to flip.
        key: SectionKey,
    },
    /// The chapter's "mark all complete" control was moved to `value`.
    SetChapter {
        /// Chapter whose control changed.
        chapter_id: String,
        /// New control value.
        value: bool,
    },
    /// Clear every flag.
    ResetAll,
}

/// What the presentation layer must recompute after a handler ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", content = "chapter_id", rename_all = "snake_case")]
pub enum Refresh {
    /// Nothing changed.
    Nothing,
    /// Overall stats and the named chapter's stats.
    Chapter(String),
    /// Every stat.
    Everything,
}

/// Result of applying an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether any flag changed.
    pub changed: bool,
    /// Recompute scope for the presentation layer.
    pub refresh: Refresh,
}

/// Apply one intent to a session's state.
///
/// On error the state is untouched and the failure is logged: a missing key
/// means the caller holds a stale or mistyped reference.
pub fn apply(
    catalog: &Catalog,
    state: &mut CompletionState,
    intent: Intent,
) -> Result<Outcome, StateError> {
    let result = match &intent {
        Intent::ToggleSection { key } => toggle_section(state, key),
        Intent::SetChapter { chapter_id, value } => set_chapter(catalog, state, chapter_id, *value),
        Intent::ResetAll => Ok(reset_all(state)),
    };
    match &result {
        Ok(outcome) => tracing::debug!(?intent, changed = outcome.changed, "intent applied"),
        Err(e) => tracing::warn!(?intent, error = %e, "intent rejected"),
    }
    result
}

/// Flip one section's flag.
pub fn toggle_section(state: &mut CompletionState, key: &SectionKey) -> Result<Outcome, StateError> {
    let current = state.get(key)?;
    state.set(key, !current)?;
    Ok(Outcome {
        changed: true,
        refresh: Refresh::Chapter(key.chapter_id().to_string()),
    })
}

/// Apply the chapter control's new value, gated on the chapter's `all_done`.
pub fn set_chapter(
    catalog: &Catalog,
    state: &mut CompletionState,
    chapter_id: &str,
    value: bool,
) -> Result<Outcome, StateError> {
    let stats = chapter_stats(catalog, state, chapter_id)?;
    if value == stats.all_done {
        return Ok(Outcome {
            changed: false,
            refresh: Refresh::Nothing,
        });
    }
    let changed = state.set_all(chapter_id, value)?;
    Ok(Outcome {
        changed: changed > 0,
        refresh: Refresh::Chapter(chapter_id.to_string()),
    })
}

/// Clear every flag. Always refreshes everything.
pub fn reset_all(state: &mut CompletionState) -> Outcome {
    let changed = state.reset();
    Outcome {
        changed: changed > 0,
        refresh: Refresh::Everything,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
