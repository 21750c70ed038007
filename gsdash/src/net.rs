//! Networking coordinator between the TUI loop and the task server.
//!
//! The TUI loop is synchronous (crossterm poll-based). All HTTP work runs on
//! tokio tasks spawned here; the two sides talk over [`NetCommand`] /
//! [`NetEvent`] channels.
//!
//! ```text
//! TUI (main thread)  <-- NetEvent ---  coordinator + pollers
//!                    --- NetCommand -->
//! ```
//!
//! The coordinator keeps at most one [`Subscription`] alive: activating a
//! route drops (and so cancels) the previous poller before starting the
//! next one.

use std::sync::Arc;
use std::time::Duration;

use gsdash_proto::{ResourceList, ResourceQuery, TaskList, TaskQuery};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{ApiError, Backend};
use crate::notice::Notice;
use crate::poll::Subscription;
use crate::route::Route;
use crate::view::submit::{self, ResourceSubmission, TaskSubmission};
use crate::view::tasks;

/// Committed filter of the screen being activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListQuery {
    Tasks(TaskQuery),
    Resources(ResourceQuery),
}

impl ListQuery {
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::Tasks(_) => Route::Tasks,
            Self::Resources(_) => Route::Resources,
        }
    }
}

/// Commands sent from the TUI main loop to the networking tasks.
#[derive(Debug)]
pub enum NetCommand {
    /// Start polling a screen, replacing whatever was polled before.
    Activate { generation: u64, query: ListQuery },
    /// New committed task filter; fetches immediately.
    SetTaskQuery(TaskQuery),
    /// New committed resource filter; fetches immediately.
    SetResourceQuery(ResourceQuery),
    /// Fetch the active list now.
    Refresh,
    CancelTask { task_id: String },
    AddTask(TaskSubmission),
    AddResource(ResourceSubmission),
    /// Stop polling and exit.
    Shutdown,
}

/// Events sent from the networking tasks to the TUI main loop.
#[derive(Debug)]
pub enum NetEvent {
    /// A task list fetch completed for the given activation.
    TasksLoaded {
        generation: u64,
        result: Result<TaskList, ApiError>,
    },
    /// A resource list fetch completed for the given activation.
    ResourcesLoaded {
        generation: u64,
        result: Result<ResourceList, ApiError>,
    },
    /// Outcome of a write action.
    Notice(Notice),
}

/// Configuration for the networking layer.
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub task_interval: Duration,
    pub resource_interval: Duration,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Default poll interval for both lists.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            task_interval: DEFAULT_POLL_INTERVAL,
            resource_interval: DEFAULT_POLL_INTERVAL,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// The poller currently running, if any.
enum Active {
    Idle,
    Tasks(Subscription<TaskQuery>),
    Resources(Subscription<ResourceQuery>),
}

impl Active {
    fn refresh(&self) {
        match self {
            Self::Idle => {}
            Self::Tasks(sub) => sub.refresh(),
            Self::Resources(sub) => sub.refresh(),
        }
    }
}

/// Spawn the coordinator task and return channel handles.
///
/// Must be called from within a tokio runtime. The returned handle
/// completes after [`NetCommand::Shutdown`] or when the command sender is
/// dropped.
pub fn spawn_net<B: Backend>(
    backend: Arc<B>,
    config: NetConfig,
) -> (
    mpsc::Sender<NetCommand>,
    mpsc::Receiver<NetEvent>,
    JoinHandle<()>,
) {
    let capacity = config.channel_capacity.max(1);
    let (cmd_tx, cmd_rx) = mpsc::channel::<NetCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<NetEvent>(capacity);
    let handle = tokio::spawn(command_handler(backend, config, cmd_rx, evt_tx));
    (cmd_tx, evt_rx, handle)
}

fn tasks_loaded(generation: u64, result: Result<TaskList, ApiError>) -> NetEvent {
    NetEvent::TasksLoaded { generation, result }
}

fn resources_loaded(generation: u64, result: Result<ResourceList, ApiError>) -> NetEvent {
    NetEvent::ResourcesLoaded { generation, result }
}

/// Background task: handle commands from the TUI main loop.
///
/// Polling runs in the active [`Subscription`]; write actions run on their
/// own tasks so a slow upload never delays list updates.
async fn command_handler<B: Backend>(
    backend: Arc<B>,
    config: NetConfig,
    mut cmd_rx: mpsc::Receiver<NetCommand>,
    evt_tx: mpsc::Sender<NetEvent>,
) {
    let mut active = Active::Idle;

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            NetCommand::Activate { generation, query } => {
                tracing::info!(route = %query.route(), generation, "activating route");
                // Cancel the old poller before the new one issues its first fetch.
                drop(std::mem::replace(&mut active, Active::Idle));
                active = match query {
                    ListQuery::Tasks(q) => Active::Tasks(Subscription::spawn(
                        Arc::clone(&backend),
                        q,
                        config.task_interval,
                        generation,
                        evt_tx.clone(),
                        tasks_loaded,
                    )),
                    ListQuery::Resources(q) => Active::Resources(Subscription::spawn(
                        Arc::clone(&backend),
                        q,
                        config.resource_interval,
                        generation,
                        evt_tx.clone(),
                        resources_loaded,
                    )),
                };
            }
            NetCommand::SetTaskQuery(q) => {
                if let Active::Tasks(sub) = &active {
                    sub.set_query(q);
                } else {
                    tracing::debug!("task query ignored, task list not active");
                }
            }
            NetCommand::SetResourceQuery(q) => {
                if let Active::Resources(sub) = &active {
                    sub.set_query(q);
                } else {
                    tracing::debug!("resource query ignored, resource list not active");
                }
            }
            NetCommand::Refresh => active.refresh(),
            NetCommand::CancelTask { task_id } => {
                let backend = Arc::clone(&backend);
                let evt_tx = evt_tx.clone();
                tokio::spawn(async move {
                    let notice = tasks::cancel(backend.as_ref(), &task_id).await;
                    let _ = evt_tx.send(NetEvent::Notice(notice)).await;
                });
            }
            NetCommand::AddTask(form) => {
                let backend = Arc::clone(&backend);
                let evt_tx = evt_tx.clone();
                tokio::spawn(async move {
                    let notice = submit::submit_task(backend.as_ref(), &form).await;
                    let _ = evt_tx.send(NetEvent::Notice(notice)).await;
                });
            }
            NetCommand::AddResource(form) => {
                let backend = Arc::clone(&backend);
                let evt_tx = evt_tx.clone();
                tokio::spawn(async move {
                    let notice = submit::submit_resource(backend.as_ref(), &form).await;
                    let _ = evt_tx.send(NetEvent::Notice(notice)).await;
                });
            }
            NetCommand::Shutdown => {
                tracing::info!("net command handler shutting down");
                break;
            }
        }
    }

    drop(active);
}
