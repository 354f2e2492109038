//! The REST implementation of the `TrackerApi` port.
//!
//! Every request authenticates with HTTP basic auth, token as the username
//! and the literal `api_token` as the password. Status mapping is uniform:
//! 401/403 become [`TallyError::Auth`], any other non-success becomes
//! [`TallyError::Api`]; transport failures arrive from the HTTP layer as
//! [`TallyError::Network`] already. The summary endpoint is paginated with
//! an opaque cursor header and consumed here until exhausted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tally_core::{EntryDraft, EntryPatch, SummaryQuery, TrackerApi};
use tally_domain::{Profile, Result, Summary, TallyError, TimeEntry};
use tracing::debug;
use url::Url;

use super::dto::{
    CreateEntryBody, ProfileDto, StopEntryBody, SummaryPageDto, TimeEntryDto, UpdateEntryBody,
};
use crate::http::HttpClient;

/// Header carrying the cursor of the next summary page, absent on the last
/// page.
const NEXT_CURSOR_HEADER: &str = "x-next-cursor";

const BASIC_AUTH_PASSWORD: &str = "api_token";

/// Remote tracker client over HTTP.
pub struct RestTrackerClient {
    http: HttpClient,
    base: Url,
    api_token: String,
}

impl RestTrackerClient {
    /// Create a client for the service at `base_url`.
    ///
    /// # Errors
    /// Returns [`TallyError::Auth`] for an empty token and
    /// [`TallyError::Config`] for an unparseable base URL.
    pub fn new(base_url: &str, api_token: impl Into<String>) -> Result<Self> {
        Self::with_http(HttpClient::new()?, base_url, api_token)
    }

    /// Create a client over a pre-built HTTP transport (tests tune retry
    /// behaviour this way).
    ///
    /// # Errors
    /// Same as [`RestTrackerClient::new`].
    pub fn with_http(http: HttpClient, base_url: &str, api_token: impl Into<String>) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(TallyError::Auth("API token is not set".to_string()));
        }
        // Url::join treats a base without a trailing slash as a file, which
        // would drop the last path segment.
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base = Url::parse(&base_url)
            .map_err(|err| TallyError::Config(format!("invalid base URL: {err}")))?;
        Ok(Self { http, base, api_token })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|err| TallyError::Internal(format!("invalid endpoint {path}: {err}")))
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url).basic_auth(&self.api_token, Some(BASIC_AUTH_PASSWORD))
    }

    async fn send(&self, method: Method, url: Url) -> Result<Response> {
        let response = self.http.send(self.request(method, url)).await?;
        check_status(response).await
    }

    async fn send_json<B: serde::Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<Response> {
        let response = self.http.send(self.request(method, url).json(body)).await?;
        check_status(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.send(Method::GET, url).await?;
        decode(response).await
    }
}

#[async_trait]
impl TrackerApi for RestTrackerClient {
    async fn fetch_profile(&self) -> Result<Profile> {
        let dto: ProfileDto = self.get_json("me?with_related_data=true").await?;
        Ok(dto.into())
    }

    async fn fetch_running_entry(&self) -> Result<Option<TimeEntry>> {
        // The remote answers `null` when nothing is running.
        let dto: Option<TimeEntryDto> = self.get_json("me/time_entries/current").await?;
        Ok(dto.map(TimeEntry::from))
    }

    async fn fetch_time_entries(&self) -> Result<Vec<TimeEntry>> {
        let dtos: Vec<TimeEntryDto> = self.get_json("me/time_entries").await?;
        Ok(dtos.into_iter().map(TimeEntry::from).collect())
    }

    async fn create_entry(&self, draft: EntryDraft) -> Result<TimeEntry> {
        let url = self.endpoint(&format!("workspaces/{}/time_entries", draft.workspace_id))?;
        let body = CreateEntryBody::from_draft(&draft);
        let response = self.send_json(Method::POST, url, &body).await?;
        let dto: TimeEntryDto = decode(response).await?;
        Ok(dto.into())
    }

    async fn update_entry(&self, id: i64, patch: EntryPatch) -> Result<TimeEntry> {
        let url = self.endpoint(&format!("time_entries/{id}"))?;
        let body = UpdateEntryBody::from_patch(&patch);
        let response = self.send_json(Method::PUT, url, &body).await?;
        let dto: TimeEntryDto = decode(response).await?;
        Ok(dto.into())
    }

    async fn stop_entry(&self, id: i64, stop: DateTime<Utc>) -> Result<TimeEntry> {
        let url = self.endpoint(&format!("time_entries/{id}/stop"))?;
        let response = self.send_json(Method::PATCH, url, &StopEntryBody { stop }).await?;
        let dto: TimeEntryDto = decode(response).await?;
        Ok(dto.into())
    }

    async fn delete_entry(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("time_entries/{id}"))?;
        self.send(Method::DELETE, url).await?;
        Ok(())
    }

    async fn fetch_summary(&self, query: &SummaryQuery) -> Result<Summary> {
        let mut summary = Summary::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            let mut url = self.endpoint(&format!("workspaces/{}/summary", query.workspace_id))?;
            url.query_pairs_mut()
                .append_pair("user_id", &query.user_id.to_string())
                .append_pair("since", &query.since.to_string())
                .append_pair("until", &query.until.to_string())
                .append_pair("grouping", query.grouping.keyword());
            if let Some(cursor) = &cursor {
                url.query_pairs_mut().append_pair("cursor", cursor);
            }

            let response = self.send(Method::GET, url).await?;
            let next = response
                .headers()
                .get(NEXT_CURSOR_HEADER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(str::to_string);

            let page: SummaryPageDto = decode(response).await?;
            page.merge_into(&mut summary);
            pages += 1;

            match next {
                Some(value) => cursor = Some(value),
                None => break,
            }
        }

        debug!(pages, key = %query.cache_key(), "summary fetched");
        Ok(summary)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(TallyError::Auth("API token rejected by the remote service".to_string()));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let body = body.trim();
        return Err(if body.is_empty() {
            TallyError::Api(format!("remote answered {status}"))
        } else {
            TallyError::Api(format!("remote answered {status}: {body}"))
        });
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| TallyError::Api(format!("malformed response body: {err}")))
}
