//! Records returned by the list endpoints.
//!
//! Every field apart from the identifier is defaulted so that partially
//! populated server payloads (a task that has not started yet has no
//! times or scores) still decode.

use serde::{Deserialize, Serialize};

use crate::state::TaskState;

/// Error captured from a failing subtask.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeError {
    /// Exception type name.
    pub ex_type: String,
    /// Exception message.
    pub ex_message: String,
    /// Formatted traceback.
    pub traceback: String,
}

/// A task as reported by `GET /task_info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Server-assigned identifier.
    pub task_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub state: Option<TaskState>,
    /// Earliest subtask start, as formatted by the server.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Latest successful subtask end, as formatted by the server.
    #[serde(default)]
    pub end_time: Option<String>,
    /// When the server last recomputed this record.
    #[serde(default)]
    pub actualize_date: Option<String>,
    #[serde(default)]
    pub n_subtasks: Option<u32>,
    #[serde(default)]
    pub n_completed: u32,
    #[serde(default)]
    pub best_score: Option<f64>,
    /// Parameter combination that produced `best_score`.
    #[serde(default)]
    pub best_params: Option<serde_json::Value>,
    #[serde(default)]
    pub param_errors: Option<serde_json::Value>,
    #[serde(default)]
    pub runtime_errors: Vec<RuntimeError>,
}

impl TaskRecord {
    /// A fresh record with only an id, title and state.
    #[must_use]
    pub fn new(task_id: impl Into<String>, title: impl Into<String>, state: TaskState) -> Self {
        Self {
            task_id: task_id.into(),
            title: title.into(),
            state: Some(state),
            start_time: None,
            end_time: None,
            actualize_date: None,
            n_subtasks: None,
            n_completed: 0,
            best_score: None,
            best_params: None,
            param_errors: None,
            runtime_errors: Vec::new(),
        }
    }

    /// `completed/total` progress, or `-` when the subtask count is unknown.
    #[must_use]
    pub fn progress(&self) -> String {
        self.n_subtasks.map_or_else(
            || "-".to_string(),
            |total| format!("{}/{total}", self.n_completed),
        )
    }

    /// Whether a cancel affordance should be offered for this record.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        self.state.as_ref().is_some_and(TaskState::is_cancellable)
    }
}

/// Response body of `GET /task_info`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<TaskRecord>,
    /// Number of matching tasks before pagination, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// A resource as reported by `GET /resource_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub resource_id: String,
    #[serde(default)]
    pub name: String,
    /// Held by a task that has not finished yet.
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_deletion_requested: Option<bool>,
}

/// Response body of `GET /resource_info`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceList {
    pub resources: Vec<ResourceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}
