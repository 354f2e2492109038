//! The `delete` resolver.

use tally_domain::display::format_clock;

use super::ResolverContext;
use crate::action::{icons, Action, Mutation};
use crate::query::Query;

pub(crate) async fn resolve(ctx: &mut ResolverContext<'_>, _query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    let Some(running) = ctx.store.running_entry(false).await else {
        return vec![Action::notice(
            "No running time entry",
            "There is nothing to delete",
            icons::DELETE,
        )];
    };

    let description = running.description_or_empty().to_string();
    vec![Action::terminal(
        format!("Delete \"{description}\""),
        format!("{} elapsed", format_clock(running.elapsed(ctx.now))),
        icons::DELETE,
        100,
        Mutation::Delete { id: running.id, description },
    )]
}
