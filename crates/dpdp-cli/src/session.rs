//! One-shot session construction from command-line flags.

use anyhow::{Context, Result};
use clap::Args;

use dpdp_core::{Catalog, SectionKey};
use dpdp_state::{apply, CompletionState, Intent};

/// Completion flags for a session that lives for one invocation.
#[derive(Args, Debug, Default, Clone)]
pub struct SessionArgs {
    /// Mark a section audited, as `chapterId-number` (e.g. `ch2-4`). Repeatable.
    #[arg(long = "done", value_name = "KEY")]
    pub done: Vec<String>,

    /// Mark every section of a chapter audited. Repeatable.
    #[arg(long = "chapter-complete", value_name = "ID")]
    pub chapter_complete: Vec<String>,
}

impl SessionArgs {
    /// Build the session state: individual keys first, then whole chapters.
    ///
    /// An unknown key or chapter is an error; nothing is silently skipped.
    pub fn build_state(&self, catalog: &Catalog) -> Result<CompletionState> {
        let keys = self
            .done
            .iter()
            .map(|raw| raw.parse::<SectionKey>().with_context(|| format!("--done {raw}")))
            .collect::<Result<Vec<_>>>()?;
        let mut state = CompletionState::from_completed(catalog, &keys).context("--done")?;

        for chapter_id in &self.chapter_complete {
            apply(
                catalog,
                &mut state,
                Intent::SetChapter {
                    chapter_id: chapter_id.clone(),
                    value: true,
                },
            )
            .with_context(|| format!("--chapter-complete {chapter_id}"))?;
        }

        tracing::debug!(
            completed = state.completed_count(),
            total = state.len(),
            "session state built"
        );
        Ok(state)
    }
}
