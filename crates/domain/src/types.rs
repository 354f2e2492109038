//! Workspace-scoped entities fetched from the remote tracker.
//!
//! All of these are immutable once constructed from a fetch; mutation goes
//! through the remote API and comes back as a fresh fetch.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A project inside a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub workspace_id: i64,
    pub client_id: Option<i64>,
    /// Archived projects stay in the profile but are never offered for
    /// selection.
    pub active: bool,
    /// Total tracked hours, as reported by the remote service.
    pub actual_hours: Option<f64>,
    pub colour: Option<String>,
}

/// A client a project may belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
}

/// A tracked interval, possibly still running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub description: Option<String>,
    pub workspace_id: i64,
    pub project_id: Option<i64>,
    pub billable: Option<bool>,
    /// Negative while the entry is running; see [`TimeEntry::elapsed`].
    pub duration_seconds: i64,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TimeEntry {
    /// Whether this entry is currently running.
    pub fn is_running(&self) -> bool {
        self.duration_seconds < 0
    }

    /// Elapsed tracked time.
    ///
    /// For a running entry the stored duration is meaningless (the remote
    /// service stores a negative epoch offset); elapsed time is always
    /// `now - start`. For a stopped entry the stored duration is
    /// authoritative.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        if self.is_running() {
            (now - self.start).max(Duration::zero())
        } else {
            Duration::seconds(self.duration_seconds)
        }
    }

    /// Description, or the empty string for an untitled entry.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// The authenticated user: workspace defaults plus the project/client
/// universe every resolver works against.
///
/// Projects and clients are owned here; everything else refers to them by id
/// and resolves through the lookup methods, never by duplicating ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub default_workspace_id: i64,
    pub api_token: String,
    pub clients: HashMap<i64, Client>,
    pub projects: HashMap<i64, Project>,
}

impl Profile {
    /// Look up a project by id.
    pub fn project(&self, id: i64) -> Option<&Project> {
        self.projects.get(&id)
    }

    /// Look up a client by id.
    pub fn client(&self, id: i64) -> Option<&Client> {
        self.clients.get(&id)
    }

    /// Resolve the client a project belongs to, if any.
    pub fn client_for(&self, project: &Project) -> Option<&Client> {
        project.client_id.and_then(|id| self.clients.get(&id))
    }

    /// Projects that are selectable, i.e. not archived.
    pub fn active_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values().filter(|p| p.active)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(duration_seconds: i64) -> TimeEntry {
        TimeEntry {
            id: 1,
            description: Some("writing docs".to_string()),
            workspace_id: 10,
            project_id: Some(100),
            billable: None,
            duration_seconds,
            start: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).single().unwrap_or_default(),
            stop: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn negative_duration_means_running() {
        assert!(entry(-1_717_232_400).is_running());
        assert!(!entry(3600).is_running());
    }

    #[test]
    fn running_elapsed_is_now_minus_start() {
        let e = entry(-1_717_232_400);
        let now = e.start + Duration::minutes(25);
        assert_eq!(e.elapsed(now), Duration::minutes(25));
    }

    #[test]
    fn stopped_elapsed_comes_from_stored_duration() {
        let e = entry(3600);
        // `now` is irrelevant for a stopped entry.
        let now = e.start + Duration::days(2);
        assert_eq!(e.elapsed(now), Duration::hours(1));
    }

    #[test]
    fn running_elapsed_never_goes_negative() {
        let e = entry(-1);
        let now = e.start - Duration::seconds(5);
        assert_eq!(e.elapsed(now), Duration::zero());
    }
}
