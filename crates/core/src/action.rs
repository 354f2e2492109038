//! The result records the engine emits to the host.
//!
//! An [`Action`] is the only shape that crosses the boundary to the result
//! emitter: title, subtitle, icon path, autocomplete text, an integer score
//! (higher = higher in the list) and an [`Effect`] describing what invoking
//! it does.

use chrono::{DateTime, Utc};

use crate::ports::{EntryDraft, EntryPatch};
use crate::session::SessionUpdate;

/// Icon paths handed to the host as-is.
pub mod icons {
    pub const START: &str = "icons/start.png";
    pub const STOP: &str = "icons/stop.png";
    pub const EDIT: &str = "icons/edit.png";
    pub const DELETE: &str = "icons/delete.png";
    pub const CONTINUE: &str = "icons/continue.png";
    pub const REPORTS: &str = "icons/reports.png";
    pub const BROWSER: &str = "icons/browser.png";
    pub const REFRESH: &str = "icons/refresh.png";
    pub const TIP: &str = "icons/tip.png";
    pub const WARNING: &str = "icons/warning.png";
}

/// A remote mutation requested by a terminal action.
///
/// Mutations are dispatched as detached background tasks; the invoking
/// evaluation never waits for them.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create and start a new entry.
    Start(EntryDraft),
    /// Stop the running entry at the given instant.
    Stop { id: i64, stop: DateTime<Utc> },
    /// Apply a partial update to an entry.
    Edit { id: i64, patch: EntryPatch },
    /// Delete an entry.
    Delete { id: i64, description: String },
    /// Drop all caches and refetch on next read.
    Refresh,
}

/// What invoking an action does.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Selector: replace the visible query and persist the recorded
    /// selection, re-triggering evaluation.
    Rewrite { query: String, update: SessionUpdate },
    /// Terminal: fire a remote mutation in the background and hide.
    Mutate(Mutation),
    /// Open a URL in the system browser and hide.
    OpenUrl(String),
    /// Informational entry; invoking it does nothing.
    Nothing,
}

/// One selectable result row.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub title: String,
    pub subtitle: String,
    pub icon: String,
    /// Text the host fills into the query box on tab-completion.
    pub autocomplete: String,
    pub score: i32,
    pub effect: Effect,
}

impl Action {
    /// A selector row that rewrites the query and persists a selection.
    pub fn selector(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon: &str,
        score: i32,
        query: String,
        update: SessionUpdate,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon: icon.to_string(),
            autocomplete: query.clone(),
            score,
            effect: Effect::Rewrite { query, update },
        }
    }

    /// A terminal row performing a remote mutation.
    pub fn terminal(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        icon: &str,
        score: i32,
        mutation: Mutation,
    ) -> Self {
        let title = title.into();
        Self {
            autocomplete: title.clone(),
            title,
            subtitle: subtitle.into(),
            icon: icon.to_string(),
            score,
            effect: Effect::Mutate(mutation),
        }
    }

    /// A non-actionable informational row (notices, usage examples).
    pub fn notice(title: impl Into<String>, subtitle: impl Into<String>, icon: &str) -> Self {
        let title = title.into();
        Self {
            autocomplete: title.clone(),
            title,
            subtitle: subtitle.into(),
            icon: icon.to_string(),
            score: 0,
            effect: Effect::Nothing,
        }
    }

    /// Adjust the score, builder-style.
    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }
}
