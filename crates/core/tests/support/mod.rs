//! Shared test doubles for the engine tests.

#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use tally_core::{
    EntryDraft, EntryPatch, Matcher, Notifier, PaletteEngine, SpanParser, SummaryQuery,
    TrackerApi, TrackerStore,
};
use tally_domain::{Client, Profile, Project, Result, Summary, TallyError, TimeEntry};

/// Fixed "now" used across the tests: Wednesday 2024-06-05 12:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).single().unwrap()
}

pub fn project(id: i64, name: &str, hours: f64, client_id: Option<i64>) -> Project {
    Project {
        id,
        name: name.to_string(),
        workspace_id: 1,
        client_id,
        active: true,
        actual_hours: Some(hours),
        colour: None,
    }
}

/// Profile with projects A "Website" (10h) and B "Backend" (2h), both under
/// client "Acme".
pub fn test_profile() -> Profile {
    let mut projects = HashMap::new();
    projects.insert(100, project(100, "Website", 10.0, Some(50)));
    projects.insert(200, project(200, "Backend", 2.0, Some(50)));
    let mut clients = HashMap::new();
    clients.insert(50, Client { id: 50, name: "Acme".to_string() });
    Profile {
        id: 2,
        default_workspace_id: 1,
        api_token: "token".to_string(),
        clients,
        projects,
    }
}

pub fn running_entry(project_id: Option<i64>, description: &str, start: DateTime<Utc>) -> TimeEntry {
    TimeEntry {
        id: 900,
        description: Some(description.to_string()),
        workspace_id: 1,
        project_id,
        billable: None,
        duration_seconds: -1,
        start,
        stop: None,
        tags: Vec::new(),
    }
}

pub fn stopped_entry(
    project_id: Option<i64>,
    description: &str,
    start: DateTime<Utc>,
    minutes: i64,
) -> TimeEntry {
    TimeEntry {
        id: 800,
        description: Some(description.to_string()),
        workspace_id: 1,
        project_id,
        billable: Some(false),
        duration_seconds: minutes * 60,
        start,
        stop: Some(start + Duration::minutes(minutes)),
        tags: Vec::new(),
    }
}

/// Configurable in-memory tracker with fetch counters.
#[derive(Default)]
pub struct MockTracker {
    pub profile: Mutex<Option<Profile>>,
    pub profile_error: Mutex<Option<TallyError>>,
    pub running: Mutex<Option<TimeEntry>>,
    pub running_error: Mutex<bool>,
    pub entries: Mutex<Vec<TimeEntry>>,
    pub summaries: Mutex<HashMap<String, Summary>>,

    pub profile_fetches: AtomicUsize,
    pub running_fetches: AtomicUsize,
    pub entry_fetches: AtomicUsize,
    pub summary_fetches: AtomicUsize,

    pub created: Mutex<Vec<EntryDraft>>,
    pub patched: Mutex<Vec<(i64, EntryPatch)>>,
    pub stopped: Mutex<Vec<(i64, DateTime<Utc>)>>,
    pub deleted: Mutex<Vec<i64>>,
}

impl MockTracker {
    pub fn with_profile() -> Arc<Self> {
        let tracker = Self::default();
        *tracker.profile.lock() = Some(test_profile());
        Arc::new(tracker)
    }
}

#[async_trait]
impl TrackerApi for MockTracker {
    async fn fetch_profile(&self) -> Result<Profile> {
        self.profile_fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.profile_error.lock().clone() {
            return Err(err);
        }
        self.profile
            .lock()
            .clone()
            .ok_or_else(|| TallyError::Internal("no profile configured".to_string()))
    }

    async fn fetch_running_entry(&self) -> Result<Option<TimeEntry>> {
        self.running_fetches.fetch_add(1, Ordering::SeqCst);
        if *self.running_error.lock() {
            return Err(TallyError::Api("boom".to_string()));
        }
        Ok(self.running.lock().clone())
    }

    async fn fetch_time_entries(&self) -> Result<Vec<TimeEntry>> {
        self.entry_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().clone())
    }

    async fn create_entry(&self, draft: EntryDraft) -> Result<TimeEntry> {
        let entry = TimeEntry {
            id: 901,
            description: Some(draft.description.clone()),
            workspace_id: draft.workspace_id,
            project_id: draft.project_id,
            billable: Some(draft.billable),
            duration_seconds: -1,
            start: draft.start,
            stop: None,
            tags: draft.tags.clone(),
        };
        self.created.lock().push(draft);
        Ok(entry)
    }

    async fn update_entry(&self, id: i64, patch: EntryPatch) -> Result<TimeEntry> {
        self.patched.lock().push((id, patch));
        self.running
            .lock()
            .clone()
            .ok_or_else(|| TallyError::NotFound(format!("entry {id}")))
    }

    async fn stop_entry(&self, id: i64, stop: DateTime<Utc>) -> Result<TimeEntry> {
        self.stopped.lock().push((id, stop));
        let mut entry = self
            .running
            .lock()
            .clone()
            .ok_or_else(|| TallyError::NotFound(format!("entry {id}")))?;
        entry.duration_seconds = (stop - entry.start).num_seconds();
        entry.stop = Some(stop);
        Ok(entry)
    }

    async fn delete_entry(&self, id: i64) -> Result<()> {
        self.deleted.lock().push(id);
        Ok(())
    }

    async fn fetch_summary(&self, query: &SummaryQuery) -> Result<Summary> {
        self.summary_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.summaries.lock().get(&query.cache_key()).cloned().unwrap_or_default())
    }
}

/// Case-insensitive substring matcher standing in for the host's fuzzy
/// scorer.
pub struct SubstringMatcher;

impl Matcher for SubstringMatcher {
    fn score(&self, haystack: &str, needle: &str) -> i32 {
        if haystack.to_lowercase().contains(&needle.to_lowercase()) {
            10
        } else {
            0
        }
    }
}

/// Span parser accepting only `[-]N mins` style input.
pub struct MinutesSpanParser;

impl SpanParser for MinutesSpanParser {
    fn parse(&self, text: &str) -> Result<chrono::Duration> {
        let trimmed = text.trim();
        let (negative, rest) =
            trimmed.strip_prefix('-').map_or((false, trimmed), |r| (true, r));
        let mut parts = rest.split_whitespace();
        let amount: i64 = parts
            .next()
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| TallyError::Parse(text.to_string()))?;
        let unit = parts.next().unwrap_or("mins");
        if !["m", "min", "mins", "minute", "minutes"].contains(&unit) {
            return Err(TallyError::Parse(text.to_string()));
        }
        let minutes = if negative { -amount } else { amount };
        Ok(chrono::Duration::minutes(minutes))
    }
}

/// Notifier collecting every toast.
#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, _title: &str, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Engine over the mock tracker with a clock frozen at [`test_now`].
pub fn engine_over(tracker: Arc<MockTracker>) -> PaletteEngine {
    let clock = Arc::new(tally_common::time::MockClock::new(test_now()));
    let store = Arc::new(TrackerStore::with_clock(tracker, clock));
    PaletteEngine::with_store(
        store,
        Arc::new(SubstringMatcher),
        Arc::new(MinutesSpanParser),
        Arc::new(RecordingNotifier::default()),
    )
}
