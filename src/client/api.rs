//! HTTP API Client
//!
//! Async access to the server's CRUD surface. The `ListApi` trait is the
//! seam between the reconciliation layer and the network, so tests can
//! substitute a scripted in-memory implementation and simulate failures.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::shared::list::ListSnapshot;
use crate::shared::task::{NewTask, Task, TaskOrder, TaskPatch};

/// Errors surfaced by the CRUD client.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The referenced list or task does not exist. No retry.
    #[error("not found")]
    NotFound,
    /// The server rejected the input. The caller must correct it; no retry.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Any other non-2xx response.
    #[error("request failed with status {0}")]
    Status(u16),
    /// Network failure or unreachable store. The reconciliation layer
    /// reacts by discarding optimistic state and reloading.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

/// The Data Store contract as seen by a client.
#[async_trait]
pub trait ListApi: Send + Sync {
    /// Load a list and its full flat task set by slug.
    async fn fetch_list(&self, slug: &str) -> Result<ListSnapshot, ApiError>;
    async fn create_task(&self, new: &NewTask) -> Result<Task, ApiError>;
    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError>;
    async fn delete_task(&self, id: i64) -> Result<Task, ApiError>;
    async fn reorder_tasks(
        &self,
        list_id: i64,
        orders: &[TaskOrder],
    ) -> Result<Vec<Task>, ApiError>;
}

/// `ListApi` over HTTP, talking to the colist server.
pub struct HttpListApi {
    base_url: String,
    client: Client,
}

impl HttpListApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Decode a response, mapping the error statuses onto the taxonomy.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::BAD_REQUEST => Err(ApiError::Validation(body)),
        _ => Err(ApiError::Status(status.as_u16())),
    }
}

#[async_trait]
impl ListApi for HttpListApi {
    async fn fetch_list(&self, slug: &str) -> Result<ListSnapshot, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/lists/slug/{}", slug)))
            .send()
            .await?;
        decode(response).await
    }

    async fn create_task(&self, new: &NewTask) -> Result<Task, ApiError> {
        let response = self
            .client
            .post(self.url("/api/tasks"))
            .json(new)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError> {
        let response = self
            .client
            .patch(self.url(&format!("/api/tasks/{}", id)))
            .json(patch)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_task(&self, id: i64) -> Result<Task, ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/tasks/{}", id)))
            .send()
            .await?;
        decode(response).await
    }

    async fn reorder_tasks(
        &self,
        list_id: i64,
        orders: &[TaskOrder],
    ) -> Result<Vec<Task>, ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/lists/{}/tasks/reorder", list_id)))
            .json(&orders)
            .send()
            .await?;
        decode(response).await
    }
}
