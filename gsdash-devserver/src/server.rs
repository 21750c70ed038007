//! HTTP surface of the development server.
//!
//! Serves the task server API from an in-memory [`Store`], including the
//! legacy `/info` and `/add` paths used by older dashboards.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gsdash_proto::{AddResourceRequest, AddTaskRequest, Created, ErrorBody, ResourceList, TaskList};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::store::{ResourceFilter, Store, StoreError, TaskFilter};

/// Default page size when a list request has no `count`.
const DEFAULT_PAGE_SIZE: usize = 5;

/// Shared server state.
pub struct ServerState {
    pub store: Store,
    default_page_size: usize,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    /// Empty store, default page size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Empty store with a custom default page size.
    #[must_use]
    pub fn with_page_size(default_page_size: usize) -> Self {
        Self {
            store: Store::new(),
            default_page_size,
        }
    }
}

/// Query string of the task listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TaskInfoParams {
    status: Option<String>,
    sort: Option<String>,
    q: Option<String>,
    offset: Option<usize>,
    count: Option<usize>,
}

/// Query string of the resource listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResourceInfoParams {
    is_locked: Option<bool>,
    q: Option<String>,
    offset: Option<usize>,
    count: Option<usize>,
}

/// A failed request, rendered as `{ "message": ... }`.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    body: ErrorBody,
}

impl From<StoreError> for ApiFailure {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            StoreError::NotCancellable(_) => StatusCode::CONFLICT,
            StoreError::ResourceNotFound(_) | StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        };
        let body = match err {
            StoreError::Invalid(fields) => ErrorBody::fields(fields),
            other => ErrorBody::text(other.to_string()),
        };
        Self { status, body }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Build the router for the given state.
pub fn router(state: Arc<ServerState>) -> axum::Router {
    axum::Router::new()
        .route("/task_info", axum::routing::get(task_info))
        .route("/info", axum::routing::get(task_info))
        .route("/cancel/{task_id}", axum::routing::get(cancel_task))
        .route("/resource_info", axum::routing::get(resource_info))
        .route("/add_task", axum::routing::post(add_task))
        .route("/add", axum::routing::post(add_task))
        .route("/add_resource", axum::routing::post(add_resource))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the server on `addr` with an empty store.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::new())).await
}

/// Starts the server with a pre-built [`ServerState`].
///
/// Binding to port 0 picks a free port; the bound address is returned.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<ServerState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "devserver error");
        }
    });

    Ok((bound_addr, handle))
}

async fn task_info(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<TaskInfoParams>,
) -> Json<TaskList> {
    if let Some(sort) = params.sort.as_deref()
        && !sort.eq_ignore_ascii_case("date")
    {
        tracing::debug!(sort, "unsupported sort key, using date");
    }
    let filter = TaskFilter {
        status: params.status,
        q: params.q,
        offset: params.offset.unwrap_or(0),
        count: params.count.unwrap_or(state.default_page_size),
    };
    Json(state.store.list_tasks(&filter).await)
}

async fn resource_info(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ResourceInfoParams>,
) -> Json<ResourceList> {
    let filter = ResourceFilter {
        is_locked: params.is_locked,
        q: params.q,
        offset: params.offset.unwrap_or(0),
        count: params.count.unwrap_or(state.default_page_size),
    };
    Json(state.store.list_resources(&filter).await)
}

async fn cancel_task(
    State(state): State<Arc<ServerState>>,
    Path(task_id): Path<String>,
) -> Result<Json<Created>, ApiFailure> {
    if let Err(e) = state.store.cancel_task(&task_id).await {
        tracing::warn!(task_id = %task_id, error = %e, "cancel rejected");
        return Err(e.into());
    }
    Ok(Json(Created {
        task_id: Some(task_id),
        resource_id: None,
    }))
}

async fn add_task(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<AddTaskRequest>,
) -> Result<Json<Created>, ApiFailure> {
    match state.store.add_task(request).await {
        Ok(task_id) => Ok(Json(Created {
            task_id: Some(task_id),
            resource_id: None,
        })),
        Err(e) => {
            tracing::warn!(error = %e, "task rejected");
            Err(e.into())
        }
    }
}

async fn add_resource(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<AddResourceRequest>,
) -> Result<Json<Created>, ApiFailure> {
    match state.store.add_resource(request).await {
        Ok(resource_id) => Ok(Json(Created {
            task_id: None,
            resource_id: Some(resource_id),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "resource rejected");
            Err(e.into())
        }
    }
}
