//! Read-through TTL cache over the tracker API.
//!
//! Every remote read goes through here. Each request kind has its own typed
//! cache and fixed TTL: the profile barely changes (days), while the
//! running entry, the entry list and summaries go stale in seconds. A
//! `force` flag on every getter bypasses the cache and refreshes it
//! unconditionally; mutations use it to re-derive state instead of guessing.
//!
//! There is no locking beyond the caches' own: correctness relies on TTL
//! semantics tolerating staleness, on every mutation forcing a fresh fetch
//! afterwards, and on summaries being cloned before a live merge.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tally_common::cache::TtlCache;
use tally_common::time::{Clock, SystemClock};
use tally_domain::{Profile, Result, Summary, TimeEntry};
use tracing::{debug, warn};

use crate::action::Mutation;
use crate::ports::TrackerApi;
use crate::reports::SummaryQuery;

const PROFILE_KEY: &str = "profile";
const RUNNING_KEY: &str = "entries/running";
const ENTRIES_KEY: &str = "entries/recent";

const PROFILE_TTL_DAYS: i64 = 3;
const RUNNING_TTL_SECS: i64 = 30;
const ENTRIES_TTL_SECS: i64 = 30;
const SUMMARY_TTL_SECS: i64 = 30;

type SharedClock = Arc<dyn Clock>;

/// Typed read-through facade over the remote tracker.
///
/// Remote failures on degradable reads surface as "no value" (logged),
/// never as a crash; only the profile fetch propagates its error so the
/// engine can distinguish connectivity from authentication.
pub struct TrackerStore {
    api: Arc<dyn TrackerApi>,
    clock: SharedClock,
    profile: TtlCache<Profile, SharedClock>,
    running: TtlCache<Option<TimeEntry>, SharedClock>,
    entries: TtlCache<Vec<TimeEntry>, SharedClock>,
    summaries: TtlCache<Summary, SharedClock>,
    /// Keys of every summary cached so far, so mutations can bulk-invalidate
    /// without enumerating cache contents.
    summary_keys: Mutex<Vec<String>>,
}

impl TrackerStore {
    /// Create a store over the given adapter with the system clock.
    pub fn new(api: Arc<dyn TrackerApi>) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    /// Create a store with an injected clock (expiry tests).
    pub fn with_clock(api: Arc<dyn TrackerApi>, clock: SharedClock) -> Self {
        Self {
            api,
            profile: TtlCache::with_clock(Arc::clone(&clock)),
            running: TtlCache::with_clock(Arc::clone(&clock)),
            entries: TtlCache::with_clock(Arc::clone(&clock)),
            summaries: TtlCache::with_clock(Arc::clone(&clock)),
            clock,
            summary_keys: Mutex::new(Vec::new()),
        }
    }

    /// Current wall-clock time, per the injected clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The authenticated user's profile.
    ///
    /// # Errors
    /// Propagates the adapter error untouched so the caller can tell an
    /// auth failure from a connectivity failure.
    pub async fn profile(&self, force: bool) -> Result<Profile> {
        if !force {
            if let Some(profile) = self.profile.get(PROFILE_KEY) {
                return Ok(profile);
            }
        }
        let profile = self.api.fetch_profile().await?;
        self.profile.insert_for(
            PROFILE_KEY.to_string(),
            profile.clone(),
            Duration::days(PROFILE_TTL_DAYS),
        );
        Ok(profile)
    }

    /// The currently running entry; `None` both for "nothing running" and
    /// for a failed fetch (logged). A confirmed "nothing running" is cached,
    /// a failure is not.
    pub async fn running_entry(&self, force: bool) -> Option<TimeEntry> {
        if !force {
            if let Some(cached) = self.running.get(RUNNING_KEY) {
                return cached;
            }
        }
        match self.api.fetch_running_entry().await {
            Ok(entry) => {
                self.running.insert_for(
                    RUNNING_KEY.to_string(),
                    entry.clone(),
                    Duration::seconds(RUNNING_TTL_SECS),
                );
                entry
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch running entry");
                None
            }
        }
    }

    /// Recent entries, most recent first; empty on failure (logged, not
    /// cached).
    pub async fn time_entries(&self, force: bool) -> Vec<TimeEntry> {
        if !force {
            if let Some(cached) = self.entries.get(ENTRIES_KEY) {
                return cached;
            }
        }
        match self.api.fetch_time_entries().await {
            Ok(list) => {
                self.entries.insert_for(
                    ENTRIES_KEY.to_string(),
                    list.clone(),
                    Duration::seconds(ENTRIES_TTL_SECS),
                );
                list
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch time entries");
                Vec::new()
            }
        }
    }

    /// Peek at the cached entry list without fetching.
    ///
    /// Used by suggestions that must not add latency: a background prefetch
    /// fills the cache, and whoever renders later simply looks.
    pub fn cached_time_entries(&self) -> Option<Vec<TimeEntry>> {
        self.entries.get(ENTRIES_KEY)
    }

    /// Fire a detached, best-effort warm-up of the entry list.
    pub fn prefetch_time_entries(self: &Arc<Self>) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let _ = store.time_entries(false).await;
        });
    }

    /// A summary aggregate; `None` on failure (logged, not cached).
    pub async fn summary(&self, query: &SummaryQuery, force: bool) -> Option<Summary> {
        let key = query.cache_key();
        if !force {
            if let Some(cached) = self.summaries.get(&key) {
                return Some(cached);
            }
        }
        match self.api.fetch_summary(query).await {
            Ok(summary) => {
                self.summaries.insert_for(
                    key.clone(),
                    summary.clone(),
                    Duration::seconds(SUMMARY_TTL_SECS),
                );
                let mut keys = self.summary_keys.lock();
                if !keys.contains(&key) {
                    keys.push(key);
                }
                Some(summary)
            }
            Err(err) => {
                warn!(error = %err, key, "failed to fetch summary");
                None
            }
        }
    }

    /// Drop every cached summary.
    ///
    /// Any mutation may have changed historical aggregates, so all of them
    /// go at once, via the side list rather than by inspecting cache
    /// contents.
    pub fn invalidate_summaries(&self) {
        let keys: Vec<String> = std::mem::take(&mut *self.summary_keys.lock());
        debug!(count = keys.len(), "invalidating cached summaries");
        for key in &keys {
            self.summaries.invalidate(key);
        }
    }

    /// Force-refresh everything a mutation can have changed.
    pub async fn refresh_after_mutation(&self) {
        self.invalidate_summaries();
        let _ = self.running_entry(true).await;
        let _ = self.time_entries(true).await;
    }

    /// Execute a terminal mutation against the remote service.
    ///
    /// Returns the human-readable success message for the notification
    /// toast.
    ///
    /// # Errors
    /// Propagates the adapter error; the dispatcher reports it out-of-band
    /// and still force-refreshes.
    pub async fn execute(&self, mutation: Mutation) -> Result<String> {
        match mutation {
            Mutation::Start(draft) => {
                let description = draft.description.clone();
                self.api.create_entry(draft).await?;
                Ok(if description.is_empty() {
                    "Started time entry".to_string()
                } else {
                    format!("Started \"{description}\"")
                })
            }
            Mutation::Stop { id, stop } => {
                let entry = self.api.stop_entry(id, stop).await?;
                Ok(format!("Stopped \"{}\"", entry.description_or_empty()))
            }
            Mutation::Edit { id, patch } => {
                let entry = self.api.update_entry(id, patch).await?;
                Ok(format!("Updated \"{}\"", entry.description_or_empty()))
            }
            Mutation::Delete { id, description } => {
                self.api.delete_entry(id).await?;
                Ok(format!("Deleted \"{description}\""))
            }
            Mutation::Refresh => {
                self.profile.invalidate(PROFILE_KEY);
                self.running.invalidate(RUNNING_KEY);
                self.entries.invalidate(ENTRIES_KEY);
                self.invalidate_summaries();
                Ok("Refreshed".to_string())
            }
        }
    }
}
