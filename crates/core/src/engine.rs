//! Engine wiring: evaluation entry point and detached mutation dispatch.

use std::sync::Arc;

use tally_domain::TallyError;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::action::{icons, Action, Effect, Mutation};
use crate::ports::{Matcher, Notifier, SpanParser, TrackerApi};
use crate::query::Query;
use crate::resolvers::ResolverContext;
use crate::router;
use crate::session::SessionState;
use crate::store::TrackerStore;

/// Outcome of invoking an action, for the host to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invoked {
    /// Replace the visible query with this text and re-evaluate.
    Requery(String),
    /// A mutation was dispatched in the background; hide the palette.
    Hide,
    /// Open this URL and hide the palette.
    OpenUrl(String),
    /// Informational action; keep the palette open.
    Stay,
}

/// The query engine behind the command palette.
///
/// One instance lives as long as the host session; it owns the read-through
/// store, the per-interaction selection state and the collaborator ports.
pub struct PaletteEngine {
    store: Arc<TrackerStore>,
    session: Mutex<SessionState>,
    matcher: Arc<dyn Matcher>,
    spans: Arc<dyn SpanParser>,
    notifier: Arc<dyn Notifier>,
}

impl PaletteEngine {
    /// Create an engine over the given tracker adapter.
    pub fn new(
        api: Arc<dyn TrackerApi>,
        matcher: Arc<dyn Matcher>,
        spans: Arc<dyn SpanParser>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_store(Arc::new(TrackerStore::new(api)), matcher, spans, notifier)
    }

    /// Create an engine over a pre-built store (tests inject a mock clock
    /// this way).
    pub fn with_store(
        store: Arc<TrackerStore>,
        matcher: Arc<dyn Matcher>,
        spans: Arc<dyn SpanParser>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self { store, session: Mutex::new(SessionState::new()), matcher, spans, notifier }
    }

    /// The underlying store, for hosts that want cache statistics.
    pub fn store(&self) -> &Arc<TrackerStore> {
        &self.store
    }

    /// Evaluate one query into a ranked action list.
    ///
    /// Called on every keystroke; the host cancels the previous token as
    /// soon as a new one arrives. Cancellation yields an empty list and
    /// resets the selection state, never an error. Connectivity,
    /// authentication and remote failures degrade to notice rows here;
    /// nothing propagates to the caller.
    pub async fn evaluate(&self, raw: &str, cancel: &CancellationToken) -> Vec<Action> {
        let mut session = self.session.lock().await;
        if cancel.is_cancelled() {
            session.reset();
            return Vec::new();
        }

        let query = Query::parse(raw);

        let profile = match self.store.profile(false).await {
            Ok(profile) => profile,
            Err(TallyError::Auth(_)) => {
                return vec![Action::notice(
                    "Not logged in",
                    "Add your API token in the settings",
                    icons::WARNING,
                )];
            }
            Err(TallyError::Network(_)) => {
                return vec![Action::notice(
                    "No network connection",
                    "Tally needs a working connection to your tracker",
                    icons::WARNING,
                )];
            }
            Err(err) => {
                error!(error = %err, "profile fetch failed");
                return vec![Action::notice(
                    "Something went wrong",
                    "Try again, or refresh",
                    icons::WARNING,
                )];
            }
        };

        let mut ctx = ResolverContext {
            store: &self.store,
            profile: &profile,
            session: &mut session,
            matcher: self.matcher.as_ref(),
            spans: self.spans.as_ref(),
            cancel,
            now: self.store.now(),
        };
        router::route(&mut ctx, &query).await
    }

    /// Invoke an action on behalf of the host.
    ///
    /// Selector actions persist their selection and hand back the rewritten
    /// query; terminal actions dispatch detached and return immediately.
    pub async fn invoke(&self, action: &Action) -> Invoked {
        match &action.effect {
            Effect::Rewrite { query, update } => {
                self.session.lock().await.apply(update);
                Invoked::Requery(query.clone())
            }
            Effect::Mutate(mutation) => {
                self.dispatch(mutation.clone());
                Invoked::Hide
            }
            Effect::OpenUrl(url) => Invoked::OpenUrl(url.clone()),
            Effect::Nothing => Invoked::Stay,
        }
    }

    /// Fire a mutation as a detached background task.
    ///
    /// The outcome is reported through the notifier, and dependent caches
    /// are force-refreshed afterwards win or lose: a failed mutation must
    /// re-derive state from a fresh fetch rather than guessing.
    fn dispatch(&self, mutation: Mutation) {
        let store = Arc::clone(&self.store);
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            match store.execute(mutation).await {
                Ok(message) => {
                    info!(message, "mutation completed");
                    notifier.notify("Tally", &message);
                }
                Err(err) => {
                    error!(error = %err, "mutation failed");
                    notifier.notify("Tally", &format!("Something went wrong: {err}"));
                }
            }
            store.refresh_after_mutation().await;
        });
    }
}
