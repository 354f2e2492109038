//! Browser, refresh and help/default resolvers.

use super::ResolverContext;
use crate::action::{icons, Action, Effect, Mutation};
use crate::query;
use crate::session::SessionUpdate;

/// Web UI opened by the `browser` command.
const REPORTS_URL: &str = "https://track.tally.app/reports";

pub(crate) fn browser() -> Vec<Action> {
    vec![Action {
        title: "Open tracked time in the browser".to_string(),
        subtitle: REPORTS_URL.to_string(),
        icon: icons::BROWSER.to_string(),
        autocomplete: "browser".to_string(),
        score: 100,
        effect: Effect::OpenUrl(REPORTS_URL.to_string()),
    }]
}

pub(crate) fn refresh() -> Vec<Action> {
    vec![Action::terminal(
        "Refresh cached data",
        "Drop every cache and refetch on next use",
        icons::REFRESH,
        100,
        Mutation::Refresh,
    )]
}

/// Default/help resolver: one selector per command, filtered by whatever
/// was typed.
pub(crate) fn help(ctx: &ResolverContext<'_>, typed: &str) -> Vec<Action> {
    let commands: [(&str, &str, &str); 8] = [
        ("start", "Start a new time entry", icons::START),
        ("stop", "Stop the running time entry", icons::STOP),
        ("edit", "Edit the running time entry", icons::EDIT),
        ("delete", "Delete the running time entry", icons::DELETE),
        ("continue", "Continue the most recent entry", icons::CONTINUE),
        ("view", "Browse tracked-time reports", icons::REPORTS),
        ("browser", "Open tracked time in the browser", icons::BROWSER),
        ("refresh", "Refresh cached data", icons::REFRESH),
    ];

    let count = i32::try_from(commands.len()).unwrap_or(i32::MAX);
    commands
        .into_iter()
        .enumerate()
        .map(|(index, (command, subtitle, icon))| {
            let index = i32::try_from(index).unwrap_or(i32::MAX);
            Action::selector(
                command,
                subtitle,
                icon,
                count - index,
                query::rewrite(&[command]),
                SessionUpdate::none(),
            )
        })
        .filter(|action| {
            typed.is_empty() || ctx.matcher.score(&action.title, typed) > 0
        })
        .collect()
}
