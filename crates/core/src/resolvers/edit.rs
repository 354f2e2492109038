//! The `edit` resolver.
//!
//! Edits the currently running entry. By default the project is left alone
//! (the selection is seeded from the running entry, no picker shown); the
//! `-p` flag forces a reselection, which shifts the description tokens by
//! one. Returning the query to the bare command after a reselection resets
//! the interaction.

use tally_domain::display::format_clock;
use tally_domain::TimeEntry;

use super::{match_project_token, project_selector, ResolverContext};
use crate::action::{icons, Action, Mutation};
use crate::ports::EntryPatch;
use crate::query::{flags, Query};
use crate::session::{EditStage, ProjectSelection, SessionUpdate};

const USAGE_SPAN: &str = "edit new description -t -5 mins";

pub(crate) async fn resolve(ctx: &mut ResolverContext<'_>, query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    let Some(running) = ctx.store.running_entry(false).await else {
        return vec![Action::notice(
            "No running time entry",
            "Start one first to edit it",
            icons::EDIT,
        )];
    };
    if ctx.cancelled() {
        return Vec::new();
    }

    // Stage transitions driven by the query shape.
    if query.is_bare_command() && ctx.session.edit_stage == EditStage::ProjectSelected {
        ctx.session.edit_stage = EditStage::NoProjectChange;
        ctx.session.project = ProjectSelection::Unset;
    }
    if query.has_flag(flags::PROJECT) && ctx.session.edit_stage == EditStage::NoProjectChange {
        // Forces the picker even when the entry's current project is null.
        ctx.session.edit_stage = EditStage::NoProjectSelected;
        ctx.session.project = ProjectSelection::Unset;
    }
    if ctx.session.edit_stage == EditStage::NoProjectSelected {
        if let Some(selection) = query.arg(0).and_then(|t| match_project_token(ctx.profile, t)) {
            ctx.session.project = selection;
            ctx.session.edit_stage = EditStage::ProjectSelected;
        }
    }

    match ctx.session.edit_stage {
        EditStage::NoProjectSelected => {
            project_selector(ctx, "edit", Some(EditStage::ProjectSelected), &query.text_from(0))
        }
        EditStage::NoProjectChange => {
            // Seed the selection from the running entry; no picker.
            if ctx.session.project.is_unset() {
                ctx.session.project =
                    running.project_id.map_or(ProjectSelection::None, ProjectSelection::Chosen);
            }
            let mut actions = edit_actions(ctx, query, &running, 0, false);
            actions.push(project_flag_tip());
            actions
        }
        EditStage::ProjectSelected => edit_actions(ctx, query, &running, 1, true),
    }
}

/// Build the terminal edit action (or the usage example when the span text
/// does not parse).
fn edit_actions(
    ctx: &ResolverContext<'_>,
    query: &Query,
    running: &TimeEntry,
    description_offset: usize,
    include_project: bool,
) -> Vec<Action> {
    let description = query.text_from(description_offset);

    let mut patch = EntryPatch::default();
    if !description.is_empty() {
        patch.description = Some(description.clone());
    }
    if include_project {
        patch.project_id = Some(ctx.session.project.as_project_id());
    }

    if let Some(span_text) = query.span_text() {
        match ctx.spans.parse(&span_text) {
            // Elapsed becomes `old elapsed - span`, i.e. the start moves by
            // the span.
            Ok(span) => patch.start = Some(running.start + span),
            Err(_) => {
                return vec![Action::notice(
                    "Couldn't parse the time offset",
                    format!("Usage: {USAGE_SPAN}"),
                    icons::TIP,
                )];
            }
        }
    }

    let shown = if description.is_empty() {
        running.description_or_empty().to_string()
    } else {
        description
    };
    let elapsed = running.elapsed(ctx.now);
    vec![Action::terminal(
        format!("Edit \"{shown}\""),
        format!("{} elapsed", format_clock(elapsed)),
        icons::EDIT,
        100,
        Mutation::Edit { id: running.id, patch },
    )]
}

fn project_flag_tip() -> Action {
    Action::selector(
        "Change the project",
        format!("Add {} to reselect the project", flags::PROJECT),
        icons::TIP,
        1,
        format!("edit {} ", flags::PROJECT),
        SessionUpdate::none(),
    )
}
