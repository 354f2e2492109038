//! The `start` resolver.
//!
//! Two states: while no project is chosen the project selector shows (and a
//! background prefetch of the entry list is kicked off, so the "start at
//! previous stop time" suggestion is ready without extra latency); once a
//! project is chosen the remaining tokens form the description and the
//! resolver emits terminal start actions.

use chrono::Duration;
use tally_domain::display::format_clock;

use super::{match_project_token, project_selector, ResolverContext};
use crate::action::{icons, Action, Mutation};
use crate::ports::EntryDraft;
use crate::query::Query;

const USAGE_SPAN: &str = "start writing docs -t 5 mins";

pub(crate) async fn resolve(ctx: &mut ResolverContext<'_>, query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    // Adopt a project typed (or replayed) directly as the first argument.
    if ctx.session.project.is_unset() {
        if let Some(selection) = query.arg(0).and_then(|t| match_project_token(ctx.profile, t)) {
            ctx.session.project = selection;
        }
    }

    if ctx.session.project.is_unset() {
        ctx.store.prefetch_time_entries();
        return project_selector(ctx, "start", None, &query.text_from(0));
    }

    let description = query.text_from(1);

    if let Some(span_text) = query.span_text() {
        return match ctx.spans.parse(&span_text) {
            Ok(span) => vec![scheduled_start(ctx, &description, span)],
            Err(_) => vec![Action::notice(
                "Couldn't parse the time offset",
                format!("Usage: {USAGE_SPAN}"),
                icons::TIP,
            )],
        };
    }

    let mut actions = vec![Action::terminal(
        start_title(&description),
        "Start now".to_string(),
        icons::START,
        100,
        Mutation::Start(draft(ctx, &description, Duration::zero())),
    )];

    // Only offered once the prefetched list confirms the latest entry is
    // stopped; a running entry has no stop time to chain from.
    if let Some(stop) = previous_stop(ctx) {
        let offset = stop - ctx.now;
        actions.push(Action::terminal(
            format!("{} at previous stop time", start_title(&description)),
            format!("Start at {}", stop.format("%H:%M")),
            icons::START,
            90,
            Mutation::Start(draft(ctx, &description, offset)),
        ));
    }

    actions
}

fn scheduled_start(
    ctx: &ResolverContext<'_>,
    description: &str,
    span: Duration,
) -> Action {
    let subtitle = if span < Duration::zero() {
        format!("Start {} ago", format_clock(-span))
    } else {
        format!("Start in {}", format_clock(span))
    };
    Action::terminal(
        start_title(description),
        subtitle,
        icons::START,
        100,
        Mutation::Start(draft(ctx, description, span)),
    )
}

fn draft(ctx: &ResolverContext<'_>, description: &str, offset: Duration) -> EntryDraft {
    EntryDraft {
        workspace_id: ctx.profile.default_workspace_id,
        description: description.to_string(),
        project_id: ctx.session.project.as_project_id(),
        start: ctx.now + offset,
        billable: false,
        tags: Vec::new(),
    }
}

fn start_title(description: &str) -> String {
    if description.is_empty() {
        "Start time entry".to_string()
    } else {
        format!("Start \"{description}\"")
    }
}

fn previous_stop(ctx: &ResolverContext<'_>) -> Option<chrono::DateTime<chrono::Utc>> {
    let entries = ctx.store.cached_time_entries()?;
    let latest = entries.first()?;
    if latest.is_running() {
        return None;
    }
    latest.stop
}
