//! Port interfaces for the query engine
//!
//! These traits define the boundaries between core logic and the outside
//! world: the remote tracker, the free-text span parser, the host's fuzzy
//! matcher and the notification surface. Infrastructure implements them;
//! the core only ever sees `Arc<dyn …>`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tally_domain::{Profile, Result, Summary, TimeEntry};

use crate::reports::SummaryQuery;

/// Fields for creating a new time entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub workspace_id: i64,
    pub description: String,
    pub project_id: Option<i64>,
    pub start: DateTime<Utc>,
    pub billable: bool,
    pub tags: Vec<String>,
}

/// Partial update applied to an existing entry.
///
/// `project_id` is doubly optional: `None` leaves the project untouched,
/// `Some(None)` clears it, `Some(Some(id))` reassigns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub description: Option<String>,
    pub project_id: Option<Option<i64>>,
    pub start: Option<DateTime<Utc>>,
}

impl EntryPatch {
    /// Whether the patch changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.project_id.is_none() && self.start.is_none()
    }
}

/// Boundary to the remote time-tracking service.
///
/// All calls are fallible; the store above this port maps failures to
/// "no value" and never panics. Timeouts and retries are the adapter's
/// responsibility, pagination is consumed inside `fetch_summary` until the
/// cursor is exhausted.
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// Fetch the authenticated user with their project/client universe.
    async fn fetch_profile(&self) -> Result<Profile>;

    /// Fetch the currently running entry, if any.
    async fn fetch_running_entry(&self) -> Result<Option<TimeEntry>>;

    /// Fetch recent time entries, most recent first.
    async fn fetch_time_entries(&self) -> Result<Vec<TimeEntry>>;

    /// Create (and start) a time entry.
    async fn create_entry(&self, draft: EntryDraft) -> Result<TimeEntry>;

    /// Apply a partial update to an entry.
    async fn update_entry(&self, id: i64, patch: EntryPatch) -> Result<TimeEntry>;

    /// Stop a running entry at the given instant.
    async fn stop_entry(&self, id: i64, stop: DateTime<Utc>) -> Result<TimeEntry>;

    /// Delete an entry.
    async fn delete_entry(&self, id: i64) -> Result<()>;

    /// Fetch a summary report, fully paginated.
    async fn fetch_summary(&self, query: &SummaryQuery) -> Result<Summary>;
}

/// Parser for free-text relative time spans such as `"-5 mins"` or `"1h30m"`.
///
/// The returned duration is signed; callers add it to "now" (or to a stored
/// start time). A parse failure is an ordinary [`TallyError::Parse`]
/// (degraded to a usage example at the resolver, never surfaced as an
/// error).
///
/// [`TallyError::Parse`]: tally_domain::TallyError::Parse
pub trait SpanParser: Send + Sync {
    /// Parse the span text into a signed duration.
    fn parse(&self, text: &str) -> Result<Duration>;
}

/// The host launcher's text-relevance scorer.
///
/// The engine only uses the score as a `> 0` filter; ranking comes from the
/// selector construction rule, never from this score.
pub trait Matcher: Send + Sync {
    /// Relevance of `needle` within `haystack`; `<= 0` means no match.
    fn score(&self, haystack: &str, needle: &str) -> i32;
}

/// Out-of-band notification surface (toasts).
///
/// Terminal mutations run detached from the evaluation that produced them;
/// their outcome is reported here.
pub trait Notifier: Send + Sync {
    /// Show a notification to the user.
    fn notify(&self, title: &str, message: &str);
}
