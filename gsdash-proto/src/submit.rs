//! JSON bodies for the create endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Body of `POST /add_task`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddTaskRequest {
    /// Full text of the task definition script.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub title: String,
    /// Resource alias (as seen by the script) to resource id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, String>,
}

/// Body of `POST /add_resource`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddResourceRequest {
    /// Full text of the uploaded resource file.
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub title: String,
}

/// Success body of the create endpoints. The dashboard does not rely on
/// it; both ids are optional so any JSON object decodes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Created {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}
