//! The `continue` resolver: restart the most recent stopped entry.

use chrono::{DateTime, Utc};

use super::ResolverContext;
use crate::action::{icons, Action, Mutation};
use crate::ports::EntryDraft;
use crate::query::Query;

pub(crate) async fn resolve(ctx: &mut ResolverContext<'_>, query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    let entries = ctx.store.time_entries(false).await;
    if ctx.cancelled() {
        return Vec::new();
    }

    let Some(latest) = entries.iter().find(|e| !e.is_running()) else {
        return vec![Action::notice(
            "No past time entries",
            "Nothing to continue from",
            icons::CONTINUE,
        )];
    };

    // A typed description overrides the entry's own.
    let override_text = query.text_from(0);
    let description = if override_text.is_empty() {
        latest.description_or_empty().to_string()
    } else {
        override_text
    };

    vec![Action::terminal(
        format!("Continue \"{description}\""),
        last_stopped_subtitle(latest.stop),
        icons::CONTINUE,
        100,
        Mutation::Start(EntryDraft {
            workspace_id: latest.workspace_id,
            description,
            project_id: latest.project_id,
            start: ctx.now,
            billable: latest.billable.unwrap_or(false),
            tags: latest.tags.clone(),
        }),
    )]
}

fn last_stopped_subtitle(stop: Option<DateTime<Utc>>) -> String {
    stop.map_or_else(
        || "Start again now".to_string(),
        |at| format!("Last stopped at {}", at.format("%Y-%m-%d %H:%M")),
    )
}
