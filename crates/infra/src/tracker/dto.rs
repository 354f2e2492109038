//! Wire representations of the remote service's JSON bodies.
//!
//! DTOs stay private to the adapter; conversion into domain types happens
//! immediately after decoding so nothing wire-shaped leaks upward. The
//! remote reports negative durations for running entries; that convention
//! is carried into [`TimeEntry`] unchanged and interpreted there.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::{EntryDraft, EntryPatch};
use tally_domain::{Client, GroupKey, Profile, Project, SubKey, Summary, TimeEntry};

#[derive(Debug, Deserialize)]
pub(super) struct ProfileDto {
    pub id: i64,
    pub default_workspace_id: i64,
    pub api_token: String,
    #[serde(default)]
    pub clients: Vec<ClientDto>,
    #[serde(default)]
    pub projects: Vec<ProjectDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ClientDto {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProjectDto {
    pub id: i64,
    pub name: String,
    pub workspace_id: i64,
    pub client_id: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
    pub actual_hours: Option<f64>,
    pub color: Option<String>,
}

const fn default_true() -> bool {
    true
}

impl From<ProfileDto> for Profile {
    fn from(dto: ProfileDto) -> Self {
        let clients: HashMap<i64, Client> = dto
            .clients
            .into_iter()
            .map(|c| (c.id, Client { id: c.id, name: c.name }))
            .collect();
        let projects: HashMap<i64, Project> = dto
            .projects
            .into_iter()
            .map(|p| {
                (
                    p.id,
                    Project {
                        id: p.id,
                        name: p.name,
                        workspace_id: p.workspace_id,
                        client_id: p.client_id,
                        active: p.active,
                        actual_hours: p.actual_hours,
                        colour: p.color,
                    },
                )
            })
            .collect();
        Self {
            id: dto.id,
            default_workspace_id: dto.default_workspace_id,
            api_token: dto.api_token,
            clients,
            projects,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TimeEntryDto {
    pub id: i64,
    pub description: Option<String>,
    pub workspace_id: i64,
    pub project_id: Option<i64>,
    pub billable: Option<bool>,
    pub duration: i64,
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<TimeEntryDto> for TimeEntry {
    fn from(dto: TimeEntryDto) -> Self {
        Self {
            id: dto.id,
            description: dto.description,
            workspace_id: dto.workspace_id,
            project_id: dto.project_id,
            billable: dto.billable,
            duration_seconds: dto.duration,
            start: dto.start,
            stop: dto.stop,
            tags: dto.tags,
        }
    }
}

/// Body for creating (and starting) an entry. The remote marks a running
/// entry with `duration: -1`.
#[derive(Debug, Serialize)]
pub(super) struct CreateEntryBody<'a> {
    pub description: &'a str,
    pub project_id: Option<i64>,
    pub start: DateTime<Utc>,
    pub duration: i64,
    pub billable: bool,
    pub tags: &'a [String],
    pub workspace_id: i64,
    pub created_with: &'static str,
}

impl<'a> CreateEntryBody<'a> {
    pub fn from_draft(draft: &'a EntryDraft) -> Self {
        Self {
            description: &draft.description,
            project_id: draft.project_id,
            start: draft.start,
            duration: -1,
            billable: draft.billable,
            tags: &draft.tags,
            workspace_id: draft.workspace_id,
            created_with: "tally",
        }
    }
}

/// Partial-update body. Omitted fields are left untouched by the remote;
/// `project_id` serialises as an explicit `null` to clear the project.
#[derive(Debug, Serialize)]
pub(super) struct UpdateEntryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
}

impl<'a> UpdateEntryBody<'a> {
    pub fn from_patch(patch: &'a EntryPatch) -> Self {
        Self {
            description: patch.description.as_deref(),
            project_id: patch.project_id,
            start: patch.start,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct StopEntryBody {
    pub stop: DateTime<Utc>,
}

/// One page of the summary report endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct SummaryPageDto {
    #[serde(default)]
    pub groups: Vec<SummaryGroupDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SummaryGroupDto {
    pub id: Option<i64>,
    #[serde(default)]
    pub sub_groups: Vec<SummarySubGroupDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SummarySubGroupDto {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub seconds: i64,
}

impl SummaryPageDto {
    /// Fold this page into the aggregate.
    ///
    /// `add_seconds` accumulates, so the same bucket appearing on two pages
    /// merges instead of overwriting.
    pub fn merge_into(self, summary: &mut Summary) {
        for group in self.groups {
            let group_key = group.id.map_or(GroupKey::None, GroupKey::Id);
            for sub in group.sub_groups {
                let (sub_key, title) = match sub.id {
                    Some(id) => (SubKey::Id(id), sub.title),
                    None => (SubKey::Title(sub.title.unwrap_or_default()), None),
                };
                summary.add_seconds(group_key, sub_key, title.as_deref(), sub.seconds);
            }
        }
    }
}
