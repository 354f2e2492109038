//! The `stop` resolver.

use tally_domain::display::format_clock;

use super::ResolverContext;
use crate::action::{icons, Action, Mutation};
use crate::query::Query;

const USAGE_SPAN: &str = "stop -t -5 mins";

pub(crate) async fn resolve(ctx: &mut ResolverContext<'_>, query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    let Some(running) = ctx.store.running_entry(false).await else {
        return vec![Action::notice(
            "No running time entry",
            "There is nothing to stop",
            icons::STOP,
        )];
    };

    let mut stop_at = ctx.now;
    if let Some(span_text) = query.span_text() {
        match ctx.spans.parse(&span_text) {
            Ok(span) => stop_at = ctx.now + span,
            Err(_) => {
                return vec![Action::notice(
                    "Couldn't parse the time offset",
                    format!("Usage: {USAGE_SPAN}"),
                    icons::TIP,
                )];
            }
        }
    }

    let elapsed = running.elapsed(stop_at);
    vec![Action::terminal(
        format!("Stop \"{}\"", running.description_or_empty()),
        format!("{} elapsed", format_clock(elapsed)),
        icons::STOP,
        100,
        Mutation::Stop { id: running.id, stop: stop_at },
    )]
}
