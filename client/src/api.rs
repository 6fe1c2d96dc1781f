//! `reqwest` implementation of the project backend.
//!
//! All paths live under `/api`. District labels are percent-encoded as a
//! single path segment, so `"Lima, Callao"` travels as `Lima,%20Callao` and
//! the backend splits it.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use mapcore::api::{ApiError, ProjectApi};
use mapcore::doc::{Project, ProjectDraft, ProjectId};
use mapcore::persistence::DrawingBatch;
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};

pub struct HttpProjectApi {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpProjectApi {
    /// Build a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the base URL is unusable or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let base = parse_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base, token: config.token.clone() })
    }

    async fn send(&self, method: Method, segments: &[&str], body: Option<&impl Serialize>) -> Result<String, ApiError> {
        let url = endpoint(&self.base, segments);
        tracing::debug!(%method, %url, "request");

        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "request failed");
            return Err(ApiError::from_status(status.as_u16(), text));
        }
        Ok(text)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        let text = self.send(Method::GET, segments, None::<&()>).await?;
        decode(&text)
    }
}

#[async_trait::async_trait(?Send)]
impl ProjectApi for HttpProjectApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get(&["api", "projects"]).await
    }

    async fn fetch_project(&self, id: ProjectId) -> Result<Project, ApiError> {
        self.get(&["api", "projects", &id.to_string()]).await
    }

    async fn fetch_district_projects(&self, label: &str) -> Result<Vec<Project>, ApiError> {
        self.get(&["api", "districts", label, "projects"]).await
    }

    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError> {
        let text = self.send(Method::POST, &["api", "projects"], Some(draft)).await?;
        decode(&text)
    }

    async fn update_project(&self, id: ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError> {
        let text = self
            .send(Method::PUT, &["api", "projects", &id.to_string()], Some(draft))
            .await?;
        decode(&text)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<(), ApiError> {
        self.send(Method::DELETE, &["api", "projects", &id.to_string()], None::<&()>)
            .await?;
        Ok(())
    }

    async fn save_drawings(&self, id: ProjectId, batch: &DrawingBatch) -> Result<(), ApiError> {
        self.send(Method::POST, &["api", "projects", &id.to_string(), "drawings", "batch"], Some(batch))
            .await?;
        tracing::info!(project_id = id, drawings = batch.len(), "drawings replaced");
        Ok(())
    }

    async fn fetch_district_catalog(&self) -> Result<Value, ApiError> {
        self.get(&["api", "districts-geojson"]).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl { url: raw.to_owned(), reason };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_owned()));
    }
    Ok(url)
}

/// Append percent-encoded `segments` to the base URL's path.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
