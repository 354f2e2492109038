//! Report dimensions: spans, groupings and the live-entry merge.
//!
//! A report is bucketed along two dimensions: the date span and the
//! grouping. The three groupings behave identically except for three
//! points of variation, so they live on one enum instead of three copies
//! of the merge code: how a time entry maps to a group key, how it maps to
//! a sub-group key, and which grouping token a drill-down re-enters the
//! query with.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tally_domain::{GroupKey, Profile, SubKey, Summary, TimeEntry};

/// Date span of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Day,
    Week,
    Month,
    Year,
}

impl Span {
    /// All spans, most commonly used first (this is also the selector
    /// ranking order).
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    /// The query token for this span.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Human label used in titles ("tracked this week").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "today",
            Self::Week => "this week",
            Self::Month => "this month",
            Self::Year => "this year",
        }
    }

    /// Parse a span token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.keyword() == token.to_lowercase())
    }

    /// Inclusive date range covered by this span, relative to `now`.
    pub fn date_range(&self, now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
        let today = now.date_naive();
        match self {
            Self::Day => (today, today),
            Self::Week => {
                let monday = today
                    - Duration::days(i64::from(today.weekday().num_days_from_monday()));
                (monday, monday + Duration::days(6))
            }
            Self::Month => {
                let first = today.with_day(1).unwrap_or(today);
                let next_month = if first.month() == 12 {
                    first.with_year(first.year() + 1).and_then(|d| d.with_month(1))
                } else {
                    first.with_month(first.month() + 1)
                };
                let last = next_month.map_or(today, |d| d - Duration::days(1));
                (first, last)
            }
            Self::Year => {
                let first = today.with_ordinal(1).unwrap_or(today);
                let last = NaiveDate::from_ymd_opt(first.year(), 12, 31).unwrap_or(today);
                (first, last)
            }
        }
    }
}

/// Grouping dimension of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Projects,
    Clients,
    Entries,
}

impl Grouping {
    /// All groupings, most commonly used first (selector ranking order).
    pub const ALL: [Self; 3] = [Self::Projects, Self::Clients, Self::Entries];

    /// The query token for this grouping.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Clients => "clients",
            Self::Entries => "entries",
        }
    }

    /// Parse a grouping token.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.keyword() == token.to_lowercase())
    }

    /// The grouping token a drill-down into one group re-enters the query
    /// with.
    ///
    /// A client's breakdown is always shown by project, so drilling into a
    /// client rewrites with `projects` rather than re-entering `clients`.
    pub fn sub_argument(&self) -> &'static str {
        match self {
            Self::Projects | Self::Entries => self.keyword(),
            Self::Clients => Self::Projects.keyword(),
        }
    }

    /// Group key a running entry merges into under this grouping.
    pub fn group_key(&self, entry: &TimeEntry, profile: &Profile) -> GroupKey {
        match self {
            Self::Projects | Self::Entries => {
                entry.project_id.map_or(GroupKey::None, GroupKey::Id)
            }
            Self::Clients => entry
                .project_id
                .and_then(|pid| profile.project(pid))
                .and_then(|p| p.client_id)
                .map_or(GroupKey::None, GroupKey::Id),
        }
    }

    /// Sub-group key and display title a running entry merges into.
    ///
    /// Under the clients grouping the sub-group is the entry's project
    /// (matching the drill-down-by-project behaviour); under the other two
    /// it is the description bucket.
    pub fn sub_key(&self, entry: &TimeEntry, profile: &Profile) -> (SubKey, Option<String>) {
        match self {
            Self::Projects | Self::Entries => {
                (SubKey::Title(entry.description_or_empty().to_string()), None)
            }
            Self::Clients => match entry.project_id {
                Some(pid) => {
                    let title = profile.project(pid).map(|p| p.name.clone());
                    (SubKey::Id(pid), title)
                }
                None => (SubKey::Title(entry.description_or_empty().to_string()), None),
            },
        }
    }

    /// Display title of a group under this grouping.
    pub fn group_title(&self, key: GroupKey, profile: &Profile) -> String {
        match (self, key) {
            (Self::Projects | Self::Entries, GroupKey::Id(id)) => profile
                .project(id)
                .map_or_else(|| format!("Project {id}"), |p| p.name.clone()),
            (Self::Clients, GroupKey::Id(id)) => profile
                .client(id)
                .map_or_else(|| format!("Client {id}"), |c| c.name.clone()),
            (Self::Projects | Self::Entries, GroupKey::None) => "No Project".to_string(),
            (Self::Clients, GroupKey::None) => "No Client".to_string(),
        }
    }
}

/// The logical summary request; doubles as the cache-key source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryQuery {
    pub workspace_id: i64,
    pub user_id: i64,
    pub grouping: Grouping,
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl SummaryQuery {
    /// Build the request for a span relative to `now`.
    pub fn for_span(profile: &Profile, grouping: Grouping, span: Span, now: DateTime<Utc>) -> Self {
        let (since, until) = span.date_range(now);
        Self {
            workspace_id: profile.default_workspace_id,
            user_id: profile.id,
            grouping,
            since,
            until,
        }
    }

    /// Deterministic cache key for this request.
    pub fn cache_key(&self) -> String {
        format!(
            "summary/{}/{}/{}/{}/{}",
            self.workspace_id,
            self.user_id,
            self.grouping.keyword(),
            self.since,
            self.until
        )
    }
}

/// Merge a running entry's in-progress elapsed seconds into a clone of the
/// cached aggregate.
///
/// The cached value is never touched; only the returned clone carries the
/// live seconds, so concurrent readers of the cache cannot observe a
/// partially merged aggregate.
pub fn merge_running(
    cached: &Summary,
    entry: &TimeEntry,
    profile: &Profile,
    grouping: Grouping,
    now: DateTime<Utc>,
) -> Summary {
    let mut merged = cached.clone();
    let group_key = grouping.group_key(entry, profile);
    let (sub_key, sub_title) = grouping.sub_key(entry, profile);
    merged.add_seconds(group_key, sub_key, sub_title.as_deref(), entry.elapsed(now).num_seconds());
    merged
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::TimeZone;
    use tally_domain::{Client, Project};

    use super::*;

    fn profile() -> Profile {
        let mut projects = HashMap::new();
        projects.insert(
            100,
            Project {
                id: 100,
                name: "Website".to_string(),
                workspace_id: 1,
                client_id: Some(50),
                active: true,
                actual_hours: Some(10.0),
                colour: None,
            },
        );
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

    fn running() -> TimeEntry {
        TimeEntry {
            id: 9,
            description: Some("docs".to_string()),
            workspace_id: 1,
            project_id: Some(100),
            billable: None,
            duration_seconds: -1,
            start: Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).single().unwrap_or_default(),
            stop: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn week_range_runs_monday_to_sunday() {
        // 2024-06-05 is a Wednesday.
        let now = Utc.with_ymd_and_hms(2024, 6, 5, 12, 0, 0).single().unwrap_or_default();
        let (since, until) = Span::Week.date_range(now);
        assert_eq!(since, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default());
        assert_eq!(until, NaiveDate::from_ymd_opt(2024, 6, 9).unwrap_or_default());
    }

    #[test]
    fn month_range_handles_december() {
        let now = Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).single().unwrap_or_default();
        let (since, until) = Span::Month.date_range(now);
        assert_eq!(since, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default());
        assert_eq!(until, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default());
    }

    #[test]
    fn clients_grouping_keys_by_client_and_sub_keys_by_project() {
        let profile = profile();
        let entry = running();

        assert_eq!(Grouping::Clients.group_key(&entry, &profile), GroupKey::Id(50));
        let (sub, title) = Grouping::Clients.sub_key(&entry, &profile);
        assert_eq!(sub, SubKey::Id(100));
        assert_eq!(title.as_deref(), Some("Website"));
    }

    #[test]
    fn clients_drill_down_re_enters_as_projects() {
        assert_eq!(Grouping::Clients.sub_argument(), "projects");
        assert_eq!(Grouping::Projects.sub_argument(), "projects");
        assert_eq!(Grouping::Entries.sub_argument(), "entries");
    }

    #[test]
    fn merge_running_adds_live_seconds_without_touching_the_source() {
        let profile = profile();
        let entry = running();
        let now = entry.start + Duration::minutes(10);

        let cached = Summary::new();
        let merged = merge_running(&cached, &entry, &profile, Grouping::Projects, now);

        assert_eq!(cached.seconds(), 0);
        assert_eq!(merged.seconds(), 600);
    }

    #[test]
    fn projectless_entry_merges_into_the_none_bucket() {
        let profile = profile();
        let mut entry = running();
        entry.project_id = None;
        let now = entry.start + Duration::minutes(1);

        let merged = merge_running(&Summary::new(), &entry, &profile, Grouping::Clients, now);
        assert!(merged.group(&GroupKey::None).is_some());
    }

    #[test]
    fn summary_cache_key_is_fully_qualified() {
        let q = SummaryQuery {
            workspace_id: 1,
            user_id: 2,
            grouping: Grouping::Clients,
            since: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            until: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap_or_default(),
        };
        assert_eq!(q.cache_key(), "summary/1/2/clients/2024-01-01/2024-01-07");
    }
}
