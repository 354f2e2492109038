//! The `view` resolver: drill into tracked-time reports.
//!
//! Four positional levels, each an independent selector when its token is
//! absent or invalid: span, grouping, group name, sub-group name. A running
//! entry's in-progress seconds are merged into a clone of the cached
//! aggregate before anything is displayed; the cached copy is never
//! touched. Selecting a leaf rewrites into a seeded `start` command, so
//! reports and start compose into one flow.

use tally_domain::display::{format_clock, kebab_case};
use tally_domain::{Group, GroupKey, Summary};

use super::ResolverContext;
use crate::action::{icons, Action};
use crate::query::{self, Query};
use crate::reports::{merge_running, Grouping, Span, SummaryQuery};
use crate::selector::{self, SelectorEntry};
use crate::session::{ProjectSelection, SessionUpdate};

pub(crate) async fn resolve(ctx: &mut ResolverContext<'_>, query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    let span_token = query.arg(0).map(str::to_string);
    let Some(span) = span_token.as_deref().and_then(Span::from_token) else {
        return span_selector(ctx, span_token.as_deref().unwrap_or(""));
    };

    let grouping_token = query.arg(1).map(str::to_string);
    let Some(grouping) = grouping_token.as_deref().and_then(Grouping::from_token) else {
        return grouping_selector(ctx, span, grouping_token.as_deref().unwrap_or(""));
    };

    let request = SummaryQuery::for_span(ctx.profile, grouping, span, ctx.now);
    let Some(cached) = ctx.store.summary(&request, false).await else {
        return vec![Action::notice(
            "Something went wrong",
            "Couldn't load the report",
            icons::WARNING,
        )];
    };
    if ctx.cancelled() {
        return Vec::new();
    }

    // Merge the live entry into a clone; the cached aggregate stays as
    // other in-flight evaluations may be reading it.
    let running = ctx.store.running_entry(false).await;
    if ctx.cancelled() {
        return Vec::new();
    }
    let summary = running.as_ref().map_or_else(
        || cached.clone(),
        |entry| merge_running(&cached, entry, ctx.profile, grouping, ctx.now),
    );

    let name_token = query.arg(2).map(str::to_string);
    let chosen = name_token
        .as_deref()
        .and_then(|token| find_group(&summary, grouping, ctx, token));
    match chosen {
        Some((key, group)) => {
            // Descriptions are multi-word; the filter is everything typed
            // after the group name, not just the next token.
            let filter = query.text_from(3);
            sub_group_selector(ctx, span, grouping, key, &group, &filter)
        }
        None => group_selector(ctx, span, grouping, &summary, name_token.as_deref().unwrap_or("")),
    }
}

/// Level 1: pick the span. Fixed ranking, most common first; the default
/// entry is today's report.
fn span_selector(ctx: &ResolverContext<'_>, filter: &str) -> Vec<Action> {
    let default = Span::ALL[0];
    let none = span_entry(default).with_subtitle("Tracked time today (default)");
    let entries = Span::ALL[1..].iter().copied().map(span_entry).collect();
    selector::build(icons::REPORTS, none, entries, filter, ctx.matcher)
}

fn span_entry(span: Span) -> SelectorEntry {
    SelectorEntry::new(
        capitalise(span.keyword()),
        query::rewrite(&["view", span.keyword()]),
        SessionUpdate::none(),
    )
    .with_subtitle(format!("Tracked time {}", span.label()))
}

/// Level 2: pick the grouping. Projects is the default.
fn grouping_selector(ctx: &ResolverContext<'_>, span: Span, filter: &str) -> Vec<Action> {
    let default = Grouping::ALL[0];
    let none = grouping_entry(span, default).with_subtitle("Grouped by project (default)");
    let entries = Grouping::ALL[1..]
        .iter()
        .map(|grouping| grouping_entry(span, *grouping))
        .collect();
    selector::build(icons::REPORTS, none, entries, filter, ctx.matcher)
}

fn grouping_entry(span: Span, grouping: Grouping) -> SelectorEntry {
    SelectorEntry::new(
        capitalise(grouping.keyword()),
        query::rewrite(&["view", span.keyword(), grouping.keyword()]),
        SessionUpdate::none(),
    )
    .with_subtitle(format!("Grouped by {}", grouping.keyword().trim_end_matches('s')))
}

/// Level 3: one entry per group, sorted by tracked seconds descending,
/// behind the non-actionable total line.
fn group_selector(
    ctx: &ResolverContext<'_>,
    span: Span,
    grouping: Grouping,
    summary: &Summary,
    filter: &str,
) -> Vec<Action> {
    let total = Action::notice(
        format!("{} tracked {}", format_clock_seconds(summary.seconds()), span.label()),
        String::new(),
        icons::REPORTS,
    );

    let mut groups: Vec<(GroupKey, &Group)> =
        summary.groups().iter().map(|(k, g)| (*k, g)).collect();
    groups.sort_by_key(|(_, g)| std::cmp::Reverse(g.seconds()));

    let entries = groups
        .into_iter()
        .map(|(key, group)| {
            let title = grouping.group_title(key, ctx.profile);
            let clock = format_clock_seconds(group.seconds());
            let subtitle = match (grouping, key) {
                // Client prefix keeps a client's projects findable when a
                // clients drill-down re-enters as `projects <client>`.
                (Grouping::Projects, GroupKey::Id(id)) => ctx
                    .profile
                    .project(id)
                    .and_then(|p| ctx.profile.client_for(p))
                    .map_or_else(|| clock.clone(), |c| format!("{} · {clock}", c.name)),
                _ => clock.clone(),
            };
            SelectorEntry::new(
                title.clone(),
                query::rewrite(&[
                    "view",
                    span.keyword(),
                    grouping.sub_argument(),
                    &kebab_case(&title),
                ]),
                SessionUpdate::none(),
            )
            .with_subtitle(subtitle)
        })
        .collect();

    selector::build_with_top(icons::REPORTS, total, entries, filter, ctx.matcher)
}

/// Level 4: the chosen group's breakdown. Leaves rewrite into a seeded
/// `start`, except under the clients grouping where the sub-groups are
/// projects and drill one level further.
fn sub_group_selector(
    ctx: &ResolverContext<'_>,
    span: Span,
    grouping: Grouping,
    key: GroupKey,
    group: &Group,
    filter: &str,
) -> Vec<Action> {
    let total = Action::notice(
        format!("{} tracked {}", format_clock_seconds(group.seconds()), span.label()),
        grouping.group_title(key, ctx.profile),
        icons::REPORTS,
    );

    let mut subs: Vec<_> = group.sub_groups.values().collect();
    subs.sort_by_key(|s| std::cmp::Reverse(s.seconds));

    let entries = subs
        .into_iter()
        .map(|sub| {
            let title = sub.title.clone().unwrap_or_else(|| "(no description)".to_string());
            let (rewrite, update) = match grouping {
                Grouping::Clients => (
                    query::rewrite(&[
                        "view",
                        span.keyword(),
                        grouping.sub_argument(),
                        &kebab_case(&title),
                    ]),
                    SessionUpdate::none(),
                ),
                Grouping::Projects | Grouping::Entries => {
                    let (token, selection) = match key {
                        GroupKey::Id(id) => (
                            ctx.profile
                                .project(id)
                                .map_or_else(|| id.to_string(), |p| kebab_case(&p.name)),
                            ProjectSelection::Chosen(id),
                        ),
                        GroupKey::None => ("no-project".to_string(), ProjectSelection::None),
                    };
                    (
                        query::rewrite(&["start", &token, &title]),
                        SessionUpdate::project(selection),
                    )
                }
            };
            SelectorEntry::new(title, rewrite, update)
                .with_subtitle(format_clock_seconds(sub.seconds))
        })
        .collect();

    selector::build_with_top(icons::REPORTS, total, entries, filter, ctx.matcher)
}

fn find_group(
    summary: &Summary,
    grouping: Grouping,
    ctx: &ResolverContext<'_>,
    token: &str,
) -> Option<(GroupKey, Group)> {
    summary
        .groups()
        .iter()
        .find(|(key, _)| kebab_case(&grouping.group_title(**key, ctx.profile)) == token)
        .map(|(key, group)| (*key, group.clone()))
}

fn format_clock_seconds(seconds: i64) -> String {
    format_clock(chrono::Duration::seconds(seconds))
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
