//! Per-command resolvers.
//!
//! Each resolver turns the current token sequence plus the session
//! selection state into either selector actions (rewrite the query, persist
//! a choice) or terminal actions (remote mutation). All of them check the
//! cancellation signal at entry and before any remote read, and convert
//! every remote or parse failure into a result list; nothing propagates
//! past the router.

pub mod cont;
pub mod delete;
pub mod edit;
pub mod misc;
pub mod start;
pub mod stop;
pub mod view;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tally_domain::display::{format_hours, kebab_case};
use tally_domain::{Profile, Project};
use tokio_util::sync::CancellationToken;

use crate::action::{icons, Action};
use crate::ports::{Matcher, SpanParser};
use crate::query;
use crate::selector::{self, SelectorEntry};
use crate::session::{EditStage, ProjectSelection, SessionState, SessionUpdate};
use crate::store::TrackerStore;

/// Everything a resolver needs for one evaluation.
pub struct ResolverContext<'a> {
    pub store: &'a Arc<TrackerStore>,
    pub profile: &'a Profile,
    pub session: &'a mut SessionState,
    pub matcher: &'a dyn Matcher,
    pub spans: &'a dyn SpanParser,
    pub cancel: &'a CancellationToken,
    pub now: DateTime<Utc>,
}

impl ResolverContext<'_> {
    /// Cancellation check used at resolver entry and before long branches.
    ///
    /// A superseded evaluation must never show stale results: selection
    /// state owned by the resolvers is reset and the caller returns an
    /// empty list.
    pub(crate) fn cancelled(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            self.session.reset();
            return true;
        }
        false
    }
}

/// Build the shared project picker for `start`/`edit`.
///
/// Active projects only, sorted by tracked hours descending, plus the
/// synthesized "No Project" entry on top.
pub(crate) fn project_selector(
    ctx: &ResolverContext<'_>,
    command: &str,
    stage: Option<EditStage>,
    filter: &str,
) -> Vec<Action> {
    let mut projects: Vec<&Project> = ctx.profile.active_projects().collect();
    projects.sort_by(|a, b| {
        let hours_a = a.actual_hours.unwrap_or(0.0);
        let hours_b = b.actual_hours.unwrap_or(0.0);
        hours_b.total_cmp(&hours_a).then_with(|| a.name.cmp(&b.name))
    });

    let entries = projects
        .into_iter()
        .map(|project| {
            let subtitle = match ctx.profile.client_for(project) {
                Some(client) => {
                    format!("{} · {}", client.name, format_hours(project.actual_hours.unwrap_or(0.0)))
                }
                None => format_hours(project.actual_hours.unwrap_or(0.0)),
            };
            SelectorEntry::new(
                project.name.clone(),
                query::rewrite(&[command, &kebab_case(&project.name)]),
                update_for(ProjectSelection::Chosen(project.id), stage),
            )
            .with_subtitle(subtitle)
        })
        .collect();

    let none = SelectorEntry::new(
        "No Project",
        query::rewrite(&[command, "no-project"]),
        update_for(ProjectSelection::None, stage),
    )
    .with_subtitle("Track time without a project");

    selector::build(icons::START, none, entries, filter, ctx.matcher)
}

/// Resolve a query token back to a project choice.
///
/// Selector invocations persist their choice through the session, but the
/// same token sequence must evaluate identically when typed by hand (or
/// replayed by the host), so the kebab-cased token is also recognised
/// directly.
pub(crate) fn match_project_token(profile: &Profile, token: &str) -> Option<ProjectSelection> {
    if token == "no-project" {
        return Some(ProjectSelection::None);
    }
    profile
        .projects
        .values()
        .find(|p| kebab_case(&p.name) == token)
        .map(|p| ProjectSelection::Chosen(p.id))
}

fn update_for(selection: ProjectSelection, stage: Option<EditStage>) -> SessionUpdate {
    match stage {
        Some(stage) => SessionUpdate::project_and_stage(selection, stage),
        None => SessionUpdate::project(selection),
    }
}
