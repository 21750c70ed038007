//! In-memory [`Backend`] for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use gsdash_proto::{
    AddResourceRequest, AddTaskRequest, ErrorMessage, LockFilter, ResourceList, ResourceQuery,
    ResourceRecord, StateFilter, TaskList, TaskQuery, TaskRecord,
};

use crate::api::{ApiError, Backend};

/// Records every call and answers from canned data.
#[derive(Default)]
pub struct FakeBackend {
    tasks: Mutex<Vec<TaskRecord>>,
    resources: Mutex<Vec<ResourceRecord>>,
    task_queries: Mutex<Vec<TaskQuery>>,
    resource_queries: Mutex<Vec<ResourceQuery>>,
    cancelled: Mutex<Vec<String>>,
    added_tasks: Mutex<Vec<AddTaskRequest>>,
    added_resources: Mutex<Vec<AddResourceRequest>>,
    fail_reads: AtomicBool,
    reject: Mutex<Option<ErrorMessage>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tasks(&self, tasks: Vec<TaskRecord>) {
        *self.tasks.lock().unwrap() = tasks;
    }

    pub fn set_resources(&self, resources: Vec<ResourceRecord>) {
        *self.resources.lock().unwrap() = resources;
    }

    /// Make list calls fail with a transport-like error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make write calls fail with a 400 carrying `message`.
    pub fn reject_writes(&self, message: ErrorMessage) {
        *self.reject.lock().unwrap() = Some(message);
    }

    pub fn task_queries(&self) -> Vec<TaskQuery> {
        self.task_queries.lock().unwrap().clone()
    }

    pub fn resource_queries(&self) -> Vec<ResourceQuery> {
        self.resource_queries.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    pub fn added_tasks(&self) -> Vec<AddTaskRequest> {
        self.added_tasks.lock().unwrap().clone()
    }

    pub fn added_resources(&self) -> Vec<AddResourceRequest> {
        self.added_resources.lock().unwrap().clone()
    }

    fn read_error(&self) -> Option<ApiError> {
        self.fail_reads
            .load(Ordering::SeqCst)
            .then(|| ApiError::NotABase("fake backend offline".into()))
    }

    fn write_error(&self) -> Option<ApiError> {
        self.reject.lock().unwrap().clone().map(|message| {
            let body = serde_json::to_string(&gsdash_proto::ErrorBody {
                message: message.clone(),
            })
            .unwrap();
            ApiError::Rejected {
                status: 400,
                message: Some(message),
                body,
            }
        })
    }
}

impl Backend for FakeBackend {
    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskList, ApiError> {
        self.task_queries.lock().unwrap().push(query.clone());
        if let Some(e) = self.read_error() {
            return Err(e);
        }
        let needle = query.q.trim().to_lowercase();
        let matching: Vec<TaskRecord> = self
            .tasks
            .lock()
            .unwrap()
            .iter()
            .filter(|t| match &query.state {
                StateFilter::All => true,
                StateFilter::Only(state) => t.state.as_ref() == Some(state),
            })
            .filter(|t| needle.is_empty() || t.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let tasks = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.count as usize)
            .collect();
        Ok(TaskList {
            tasks,
            total: Some(total),
        })
    }

    async fn list_resources(&self, query: &ResourceQuery) -> Result<ResourceList, ApiError> {
        self.resource_queries.lock().unwrap().push(query.clone());
        if let Some(e) = self.read_error() {
            return Err(e);
        }
        let matching: Vec<ResourceRecord> = self
            .resources
            .lock()
            .unwrap()
            .iter()
            .filter(|r| match query.lock {
                LockFilter::Any => true,
                LockFilter::Locked => r.is_locked,
                LockFilter::Unlocked => !r.is_locked,
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let resources = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.count as usize)
            .collect();
        Ok(ResourceList {
            resources,
            total: Some(total),
        })
    }

    async fn cancel_task(&self, task_id: &str) -> Result<(), ApiError> {
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        self.cancelled.lock().unwrap().push(task_id.to_string());
        Ok(())
    }

    async fn add_task(&self, request: &AddTaskRequest) -> Result<(), ApiError> {
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        self.added_tasks.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn add_resource(&self, request: &AddResourceRequest) -> Result<(), ApiError> {
        if let Some(e) = self.write_error() {
            return Err(e);
        }
        self.added_resources.lock().unwrap().push(request.clone());
        Ok(())
    }
}
