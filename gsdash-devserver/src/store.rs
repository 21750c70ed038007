//! In-memory task and resource store.
//!
//! Holds the same records the real task server keeps in its database and
//! applies the same rules: only idle, pending or running tasks can be
//! cancelled, a task locks the resources it references until it finishes,
//! and submitted scripts must define the grid-search inputs.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use gsdash_proto::{
    AddResourceRequest, AddTaskRequest, FieldError, ResourceList, ResourceRecord, TaskList,
    TaskRecord, TaskState,
};
use tokio::sync::RwLock;

/// Names a task script must define, with the message reported when absent.
const REQUIRED_SCRIPT_NAMES: [&str; 4] = ["Estimator", "X", "y", "param_grid"];

/// Label reported for a task without a usable state.
const UNKNOWN_STATE: &str = "UNKNOWN";

fn state_label(state: &TaskState) -> &str {
    let label = state.wire_label();
    if label.trim().is_empty() {
        UNKNOWN_STATE
    } else {
        label
    }
}

/// Errors produced by store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No task with the given id.
    #[error("Task {0} not found")]
    TaskNotFound(String),

    /// The task's current state does not allow cancelling.
    #[error("Cannot cancel task with {} state", state_label(.0))]
    NotCancellable(TaskState),

    /// A submitted task references a resource that does not exist.
    #[error("Resource {0} not found")]
    ResourceNotFound(String),

    /// The submitted file failed validation; keyed by field.
    #[error("invalid submission")]
    Invalid(BTreeMap<String, FieldError>),
}

/// Filters for the task listing, as received on the query string.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub q: Option<String>,
    pub offset: usize,
    pub count: usize,
}

/// Filters for the resource listing.
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub is_locked: Option<bool>,
    pub q: Option<String>,
    pub offset: usize,
    pub count: usize,
}

#[derive(Debug, Clone)]
struct StoredTask {
    record: TaskRecord,
    /// Alias to resource id.
    resources: BTreeMap<String, String>,
    /// Insertion order; higher is newer.
    seq: u64,
}

#[derive(Debug, Clone)]
struct StoredResource {
    record: ResourceRecord,
    /// Ids of unfinished tasks holding this resource.
    holders: BTreeSet<String>,
    seq: u64,
}

#[derive(Debug, Default)]
struct Inner {
    tasks: HashMap<String, StoredTask>,
    resources: HashMap<String, StoredResource>,
    next_seq: u64,
}

impl Inner {
    const fn bump(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn release_resources(&mut self, task_id: &str, resource_ids: &BTreeMap<String, String>) {
        for resource_id in resource_ids.values() {
            if let Some(resource) = self.resources.get_mut(resource_id) {
                resource.holders.remove(task_id);
                resource.record.is_locked = !resource.holders.is_empty();
            }
        }
    }
}

/// Thread-safe in-memory store.
pub struct Store {
    inner: RwLock<Inner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Lists tasks newest first, filtered by state and title substring.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> TaskList {
        let inner = self.inner.read().await;
        let wanted_state = filter
            .status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(TaskState::parse);
        let needle = lowercase_needle(filter.q.as_deref());

        let mut matching: Vec<&StoredTask> = inner
            .tasks
            .values()
            .filter(|t| {
                wanted_state
                    .as_ref()
                    .is_none_or(|s| t.record.state.as_ref() == Some(s))
            })
            .filter(|t| {
                needle
                    .as_deref()
                    .is_none_or(|n| t.record.title.to_lowercase().contains(n))
            })
            .collect();
        matching.sort_by(|a, b| b.seq.cmp(&a.seq));

        let total = matching.len() as u64;
        let tasks = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.count)
            .map(|t| t.record.clone())
            .collect();

        TaskList {
            tasks,
            total: Some(total),
        }
    }

    /// Lists resources newest first, filtered by lock flag and name substring.
    pub async fn list_resources(&self, filter: &ResourceFilter) -> ResourceList {
        let inner = self.inner.read().await;
        let needle = lowercase_needle(filter.q.as_deref());

        let mut matching: Vec<&StoredResource> = inner
            .resources
            .values()
            .filter(|r| filter.is_locked.is_none_or(|l| r.record.is_locked == l))
            .filter(|r| {
                needle
                    .as_deref()
                    .is_none_or(|n| r.record.name.to_lowercase().contains(n))
            })
            .collect();
        matching.sort_by(|a, b| b.seq.cmp(&a.seq));

        let total = matching.len() as u64;
        let resources = matching
            .into_iter()
            .skip(filter.offset)
            .take(filter.count)
            .map(|r| r.record.clone())
            .collect();

        ResourceList {
            resources,
            total: Some(total),
        }
    }

    /// Validates and stores a task, locking the resources it references.
    ///
    /// The new task is `PENDING`. Returns its id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] when the script does not define the required
    /// names, [`StoreError::ResourceNotFound`] for an unknown resource id.
    pub async fn add_task(&self, request: AddTaskRequest) -> Result<String, StoreError> {
        let errors = validate_script(&request.file);
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }

        let mut inner = self.inner.write().await;
        if let Some(missing) = request
            .resources
            .values()
            .find(|id| !inner.resources.contains_key(*id))
        {
            return Err(StoreError::ResourceNotFound(missing.clone()));
        }

        let task_id = uuid::Uuid::now_v7().to_string();
        for resource_id in request.resources.values() {
            if let Some(resource) = inner.resources.get_mut(resource_id) {
                resource.holders.insert(task_id.clone());
                resource.record.is_locked = true;
            }
        }

        let seq = inner.bump();
        let title = if request.title.trim().is_empty() {
            "Untitled task".to_string()
        } else {
            request.title
        };
        inner.tasks.insert(
            task_id.clone(),
            StoredTask {
                record: TaskRecord::new(task_id.clone(), title, TaskState::Pending),
                resources: request.resources,
                seq,
            },
        );
        drop(inner);

        tracing::info!(task_id = %task_id, "task added");
        Ok(task_id)
    }

    /// Stores an uploaded resource, unlocked. Returns its id.
    ///
    /// # Errors
    ///
    /// [`StoreError::Invalid`] when the file is empty.
    pub async fn add_resource(&self, request: AddResourceRequest) -> Result<String, StoreError> {
        if request.file.is_empty() {
            let mut errors = BTreeMap::new();
            errors.insert("file".to_string(), FieldError::new("File is empty"));
            return Err(StoreError::Invalid(errors));
        }

        let resource_id = uuid::Uuid::now_v7().to_string();
        let mut inner = self.inner.write().await;
        let seq = inner.bump();
        inner.resources.insert(
            resource_id.clone(),
            StoredResource {
                record: ResourceRecord {
                    resource_id: resource_id.clone(),
                    name: request.title,
                    is_locked: false,
                    is_deletion_requested: Some(false),
                },
                holders: BTreeSet::new(),
                seq,
            },
        );
        drop(inner);

        tracing::info!(resource_id = %resource_id, "resource added");
        Ok(resource_id)
    }

    /// Cancels an idle, pending or running task and releases its resources.
    ///
    /// # Errors
    ///
    /// [`StoreError::TaskNotFound`] for an unknown id,
    /// [`StoreError::NotCancellable`] for any other state.
    pub async fn cancel_task(&self, task_id: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
        let state = task
            .record
            .state
            .clone()
            .unwrap_or_else(|| TaskState::Unknown(UNKNOWN_STATE.to_string()));
        if !state.is_cancellable() {
            return Err(StoreError::NotCancellable(state));
        }
        task.record.state = Some(TaskState::Cancelled);
        let resources = task.resources.clone();
        inner.release_resources(task_id, &resources);
        drop(inner);

        tracing::info!(task_id = %task_id, "task cancelled");
        Ok(())
    }

    /// Forces a task into `state`, releasing its resources if the state is
    /// final. Stands in for the workers that drive state on a real server.
    ///
    /// # Errors
    ///
    /// [`StoreError::TaskNotFound`] for an unknown id.
    pub async fn set_task_state(&self, task_id: &str, state: TaskState) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let task = inner
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
        let finished = state.is_finished();
        task.record.state = Some(state);
        if finished {
            let resources = task.resources.clone();
            inner.release_resources(task_id, &resources);
        }
        Ok(())
    }

    /// Fills the store with a few tasks in different states and two resources.
    pub async fn seed_demo(&self) {
        let demo_script = "from sklearn.svm import SVC\nEstimator = SVC\nX = resources['data']\ny = resources['target']\nparam_grid = {'C': [0.1, 1, 10]}\n";

        let mut ids = Vec::new();
        for (name, body) in [("iris.csv", "5.1,3.5,1.4,0.2\n"), ("labels.csv", "0\n")] {
            let request = AddResourceRequest {
                file: body.to_string(),
                title: name.to_string(),
            };
            if let Ok(id) = self.add_resource(request).await {
                ids.push(id);
            }
        }

        let states = [
            ("SVC sweep", TaskState::Running),
            ("Random forest depth", TaskState::Success),
            ("Broken pipeline", TaskState::Failed),
            ("Queued ridge", TaskState::Pending),
        ];
        for (title, state) in states {
            let mut resources = BTreeMap::new();
            if state == TaskState::Running && ids.len() == 2 {
                resources.insert("data".to_string(), ids[0].clone());
                resources.insert("target".to_string(), ids[1].clone());
            }
            let request = AddTaskRequest {
                file: demo_script.to_string(),
                title: title.to_string(),
                resources,
            };
            if let Ok(id) = self.add_task(request).await {
                let _ = self.set_task_state(&id, state).await;
            }
        }
        tracing::info!("demo data seeded");
    }
}

fn lowercase_needle(q: Option<&str>) -> Option<String> {
    q.map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Checks that a task script defines every required name.
///
/// The script is not executed; a name counts as defined when a line
/// assigns it, defines it as a function or class, or imports it.
fn validate_script(script: &str) -> BTreeMap<String, FieldError> {
    let mut errors = BTreeMap::new();
    if script.trim().is_empty() {
        errors.insert("script".to_string(), FieldError::new("Script is empty"));
        return errors;
    }
    for name in REQUIRED_SCRIPT_NAMES {
        if !defines(script, name) {
            errors.insert(
                name.to_string(),
                FieldError::new(format!("There is no {name} in script")),
            );
        }
    }
    errors
}

fn defines(script: &str, name: &str) -> bool {
    script.lines().any(|line| {
        let line = line.trim_start();
        if let Some(rest) = line.strip_prefix(name) {
            let rest = rest.trim_start();
            return rest.starts_with('=') && !rest.starts_with("==");
        }
        let defined_as = |keyword: &str| {
            line.strip_prefix(keyword)
                .map(str::trim_start)
                .and_then(|rest| rest.strip_prefix(name))
                .is_some_and(|rest| rest.starts_with(['(', ':', ' ']) || rest.is_empty())
        };
        if defined_as("def ") || defined_as("class ") {
            return true;
        }
        (line.starts_with("import ") || line.starts_with("from "))
            && line.split([',', ' ']).any(|token| token == name)
    })
}
