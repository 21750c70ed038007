//! HTTP client for the task server.
//!
//! Wraps the list, cancel and create endpoints using [`reqwest`]. The
//! [`Backend`] trait is the seam the view-models and the polling layer
//! depend on, so they can run against a fake in unit tests.

use std::future::Future;
use std::time::Duration;

use gsdash_proto::{
    AddResourceRequest, AddTaskRequest, ErrorBody, ErrorMessage, ResourceList, ResourceQuery,
    TaskList, TaskQuery,
};
use url::Url;

/// Paths of the server endpoints, relative to the base URL.
///
/// The task listing and task creation paths were renamed between server
/// releases (`/info` → `/task_info`, `/add` → `/add_task`); both are
/// accepted here through configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub task_info: String,
    /// Prefix of the cancel path; the task id is appended as a segment.
    pub cancel: String,
    pub resource_info: String,
    pub add_task: String,
    pub add_resource: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            task_info: "/task_info".to_string(),
            cancel: "/cancel".to_string(),
            resource_info: "/resource_info".to_string(),
            add_task: "/add_task".to_string(),
            add_resource: "/add_resource".to_string(),
        }
    }
}

impl Endpoints {
    /// Paths used by the first server release.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            task_info: "/info".to_string(),
            add_task: "/add".to_string(),
            ..Self::default()
        }
    }
}

/// Errors from the HTTP API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured base URL or an endpoint path is not a valid URL.
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("server URL cannot be a base: {0}")]
    NotABase(String),

    /// The server answered with a non-2xx status.
    #[error("server rejected request ({status}): {body}")]
    Rejected {
        status: u16,
        /// Decoded `{message}` body, when the server sent one.
        message: Option<ErrorMessage>,
        /// Raw response body for logging.
        body: String,
    },
}

impl ApiError {
    /// The server-reported message, if this is a rejection that carried one.
    #[must_use]
    pub const fn server_message(&self) -> Option<&ErrorMessage> {
        match self {
            Self::Rejected { message, .. } => message.as_ref(),
            _ => None,
        }
    }
}

/// Operations the dashboard performs against a task server.
pub trait Backend: Send + Sync + 'static {
    /// Fetch one page of tasks.
    fn list_tasks(
        &self,
        query: &TaskQuery,
    ) -> impl Future<Output = Result<TaskList, ApiError>> + Send;

    /// Fetch one page of resources.
    fn list_resources(
        &self,
        query: &ResourceQuery,
    ) -> impl Future<Output = Result<ResourceList, ApiError>> + Send;

    /// Ask the server to cancel a task.
    fn cancel_task(&self, task_id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Create a task from a script.
    fn add_task(
        &self,
        request: &AddTaskRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Upload a resource file.
    fn add_resource(
        &self,
        request: &AddResourceRequest,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// HTTP client for a single task server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: Url,
    endpoints: Endpoints,
}

impl ApiClient {
    /// Create a client for `base_url` with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// [`ApiError::Url`] if `base_url` does not parse,
    /// [`ApiError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, endpoints: Endpoints, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url, endpoints)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// # Errors
    ///
    /// [`ApiError::Url`] if `base_url` does not parse.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        endpoints: Endpoints,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::NotABase(base_url.to_string()));
        }
        Ok(Self {
            client,
            base,
            endpoints,
        })
    }

    /// The server base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    // ---- private helpers ----

    /// Returns the response unchanged on success, or
    /// [`ApiError::Rejected`] with the decoded error body on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = ErrorBody::decode(body.as_bytes()).ok().map(|b| b.message);
        Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
            body,
        })
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

impl Backend for ApiClient {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskList, ApiError> {
        let url = self.endpoint(&self.endpoints.task_info)?;
        let response = self.client.get(url).query(query).send().await?;
        Self::parse_response(response).await
    }

    async fn list_resources(&self, query: &ResourceQuery) -> Result<ResourceList, ApiError> {
        let url = self.endpoint(&self.endpoints.resource_info)?;
        let response = self.client.get(url).query(query).send().await?;
        Self::parse_response(response).await
    }

    async fn cancel_task(&self, task_id: &str) -> Result<(), ApiError> {
        let mut url = self.endpoint(&self.endpoints.cancel)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::NotABase(self.base.to_string()))?
            .pop_if_empty()
            .push(task_id);
        let response = self.client.get(url).send().await?;
        Self::check_status(response).await
    }

    async fn add_task(&self, request: &AddTaskRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&self.endpoints.add_task)?;
        let response = self.client.post(url).json(request).send().await?;
        Self::check_status(response).await
    }

    async fn add_resource(&self, request: &AddResourceRequest) -> Result<(), ApiError> {
        let url = self.endpoint(&self.endpoints.add_resource)?;
        let response = self.client.post(url).json(request).send().await?;
        Self::check_status(response).await
    }
}
