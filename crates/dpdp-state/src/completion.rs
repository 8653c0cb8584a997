//! # Completion State Store
//!
//! The per-session map from section key to "audited" flag.
//!
//! ## Invariant
//!
//! The key set equals the catalog's key set at all times. It is established
//! by [`CompletionState::initialize()`] (or re-checked by
//! [`CompletionState::restore()`]) and preserved by every mutation: `set`,
//! `set_all`, and `reset` only overwrite values of existing keys.
//!
//! ## Lifecycle
//!
//! Created all-`false` when a session begins, mutated only through the
//! methods below (normally via [`crate::handlers::apply`]), dropped when the
//! session ends. There is no backing store.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use dpdp_core::{Catalog, SectionKey};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by completion-state operations.
///
/// All of them indicate a caller referencing something the catalog does not
/// contain. None is recoverable by retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The section key is not in the catalog.
    #[error("key not found: section {key} is not in the catalog")]
    KeyNotFound {
        /// The missing key.
        key: SectionKey,
    },

    /// The chapter id is not in the catalog.
    #[error("key not found: chapter {chapter_id:?} is not in the catalog")]
    UnknownChapter {
        /// The missing chapter id.
        chapter_id: String,
    },

    /// A restored flag map does not cover exactly the catalog's keys.
    #[error("completion state does not match the catalog: {missing} key(s) missing, stray keys {stray:?}")]
    KeySetMismatch {
        /// Number of catalog keys absent from the map.
        missing: usize,
        /// Keys present in the map but not in the catalog.
        stray: Vec<String>,
    },
}

// ─── Completion State ────────────────────────────────────────────────

/// Audited flags for every section of one catalog.
///
/// Serializes as a JSON object keyed by the textual section key
/// (`{"ch1-1": false, ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletionState {
    flags: BTreeMap<SectionKey, bool>,
}

impl CompletionState {
    /// A state with one `false` entry per catalog key.
    ///
    /// Infallible: a [`Catalog`] value has already passed the uniqueness
    /// checks, so every key is distinct.
    pub fn initialize(catalog: &Catalog) -> Self {
        let flags: BTreeMap<SectionKey, bool> = catalog.keys().map(|k| (k, false)).collect();
        tracing::debug!(sections = flags.len(), "completion state initialized");
        Self { flags }
    }

    /// A fresh state with the given keys marked audited.
    ///
    /// Every key is checked before any flag is set.
    pub fn from_completed<'a, I>(catalog: &Catalog, completed: I) -> Result<Self, StateError>
    where
        I: IntoIterator<Item = &'a SectionKey>,
    {
        let completed: Vec<&SectionKey> = completed.into_iter().collect();
        if let Some(stray) = completed.iter().find(|k| !catalog.contains(k)) {
            return Err(StateError::KeyNotFound {
                key: (*stray).clone(),
            });
        }
        let mut state = Self::initialize(catalog);
        for key in completed {
            state.flags.insert(key.clone(), true);
        }
        Ok(state)
    }

    /// Rebuild a state from a flag map, re-checking totality against the catalog.
    pub fn restore(catalog: &Catalog, flags: BTreeMap<SectionKey, bool>) -> Result<Self, StateError> {
        let missing = catalog.keys().filter(|k| !flags.contains_key(k)).count();
        let stray: Vec<String> = flags
            .keys()
            .filter(|k| !catalog.contains(k))
            .map(ToString::to_string)
            .collect();
        if missing > 0 || !stray.is_empty() {
            return Err(StateError::KeySetMismatch { missing, stray });
        }
        Ok(Self { flags })
    }

    /// The audited flag of one section.
    pub fn get(&self, key: &SectionKey) -> Result<bool, StateError> {
        self.flags
            .get(key)
            .copied()
            .ok_or_else(|| StateError::KeyNotFound { key: key.clone() })
    }

    /// Set one section's flag. Returns whether the value changed.
    ///
    /// Setting the current value again is valid and changes nothing.
    pub fn set(&mut self, key: &SectionKey, value: bool) -> Result<bool, StateError> {
        let flag = self
            .flags
            .get_mut(key)
            .ok_or_else(|| StateError::KeyNotFound { key: key.clone() })?;
        let changed = *flag != value;
        *flag = value;
        Ok(changed)
    }

    /// Set every section of one chapter. Returns how many flags changed.
    ///
    /// Other chapters are untouched. An unknown chapter is rejected before
    /// anything is written.
    pub fn set_all(&mut self, chapter_id: &str, value: bool) -> Result<usize, StateError> {
        if !self.flags.keys().any(|k| k.chapter_id() == chapter_id) {
            return Err(StateError::UnknownChapter {
                chapter_id: chapter_id.to_string(),
            });
        }
        let mut changed = 0;
        for (_, flag) in self
            .flags
            .iter_mut()
            .filter(|(k, _)| k.chapter_id() == chapter_id)
        {
            if *flag != value {
                *flag = value;
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// Clear every flag in every chapter. Returns how many flags changed.
    pub fn reset(&mut self) -> usize {
        let mut changed = 0;
        for flag in self.flags.values_mut() {
            if *flag {
                *flag = false;
                changed += 1;
            }
        }
        changed
    }

    /// Number of tracked sections.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no section is tracked (empty catalog).
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of audited sections.
    pub fn completed_count(&self) -> usize {
        self.flags.values().filter(|v| **v).count()
    }

    /// Tracked keys, in key order (not catalog order).
    pub fn keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.flags.keys()
    }

    /// Keys currently marked audited, in key order.
    pub fn completed_keys(&self) -> impl Iterator<Item = &SectionKey> {
        self.flags.iter().filter(|(_, v)| **v).map(|(k, _)| k)
    }

    /// The raw flag map.
    pub fn flags(&self) -> &BTreeMap<SectionKey, bool> {
        &self.flags
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
