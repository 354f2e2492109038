//! First-token command dispatch.
//!
//! Evaluation runs on every keystroke; a superseded invocation returns an
//! empty list immediately and resets resolver-owned selection state so
//! stale results are never shown.

use tracing::debug;

use crate::action::Action;
use crate::query::Query;
use crate::resolvers::{self, ResolverContext};

/// Dispatch the query to the resolver selected by its first token.
pub async fn route(ctx: &mut ResolverContext<'_>, query: &Query) -> Vec<Action> {
    if ctx.cancelled() {
        return Vec::new();
    }

    let Some(command) = query.command() else {
        return resolvers::misc::help(ctx, "");
    };
    debug!(command, "routing query");

    // Switching commands abandons the previous interaction's selections.
    ctx.session.note_command(&command);

    match command.as_str() {
        "start" => resolvers::start::resolve(ctx, query).await,
        "stop" => resolvers::stop::resolve(ctx, query).await,
        "edit" => resolvers::edit::resolve(ctx, query).await,
        "delete" => resolvers::delete::resolve(ctx, query).await,
        "continue" => resolvers::cont::resolve(ctx, query).await,
        "view" | "reports" => resolvers::view::resolve(ctx, query).await,
        "browser" => resolvers::misc::browser(),
        "refresh" => resolvers::misc::refresh(),
        "help" => resolvers::misc::help(ctx, ""),
        other => resolvers::misc::help(ctx, other),
    }
}
