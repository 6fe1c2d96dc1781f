//! The backend as seen by the core: an async project API and its errors.
//!
//! The concrete transport (HTTP, bearer tokens, base URL) lives outside this
//! crate. Futures are not required to be `Send` so a browser `fetch` binding
//! can implement the trait directly.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::Value;

use crate::doc::{Project, ProjectDraft, ProjectId};
use crate::persistence::DrawingBatch;

/// Failure of a backend call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// 401 or 403: the session must re-authenticate.
    #[error("not authorized (status {status})")]
    Unauthorized { status: u16 },

    /// Any other non-success status.
    #[error("request failed with status {status}: {}", detail_or_body(.body))]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body was not what the call expects.
    #[error("response parse failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success HTTP status.
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status },
            _ => Self::Status { status, body },
        }
    }

    /// Whether the failure calls for a login prompt instead of an error notice.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// The backend's `{"detail": "..."}` message if present, else the raw body.
fn detail_or_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(v) => v
            .get("detail")
            .and_then(Value::as_str)
            .map_or_else(|| body.to_owned(), str::to_owned),
        Err(_) => body.to_owned(),
    }
}

/// Project endpoints the core consumes.
#[async_trait::async_trait(?Send)]
pub trait ProjectApi {
    /// `GET projects`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// `GET projects/{id}`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn fetch_project(&self, id: ProjectId) -> Result<Project, ApiError>;

    /// `GET districts/{label}/projects`. The label may name several districts.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn fetch_district_projects(&self, label: &str) -> Result<Vec<Project>, ApiError>;

    /// `POST projects`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ApiError>;

    /// `PUT projects/{id}`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn update_project(&self, id: ProjectId, draft: &ProjectDraft) -> Result<Project, ApiError>;

    /// `DELETE projects/{id}`
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn delete_project(&self, id: ProjectId) -> Result<(), ApiError>;

    /// `POST projects/{id}/drawings/batch`, replacing every stored drawing.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn save_drawings(&self, id: ProjectId, batch: &DrawingBatch) -> Result<(), ApiError>;

    /// `GET districts-geojson`: the district boundary FeatureCollection.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] when the call fails.
    async fn fetch_district_catalog(&self) -> Result<Value, ApiError>;
}
