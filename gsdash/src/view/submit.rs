//! Submission forms for new tasks and resources.
//!
//! A form is filled in by the modal, then handed to [`submit_task`] or
//! [`submit_resource`], which read the selected file and post it. The
//! outcome always comes back as a [`Notice`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gsdash_proto::{AddResourceRequest, AddTaskRequest, failure_message};

use crate::api::{ApiError, Backend};
use crate::notice::Notice;

/// Default title of a new task.
pub const DEFAULT_TASK_TITLE: &str = "Custom task";
/// Default title of a new resource.
pub const DEFAULT_RESOURCE_TITLE: &str = "Custom resource";

pub const TASK_ADDED: &str = "Task added!";
pub const RESOURCE_ADDED: &str = "Resource added!";
pub const TASK_FAILED: &str = "Adding task failed";
pub const RESOURCE_FAILED: &str = "Adding resource failed";

/// Errors preparing or sending a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The form has no file selected.
    #[error("no file selected")]
    NoFile,

    /// The selected file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Notification text: `prefix` followed by the server's error lines,
    /// or by this error's own text when the server sent none.
    #[must_use]
    pub fn notice_text(&self, prefix: &str) -> String {
        match self {
            Self::Api(e) if e.server_message().is_some() => {
                failure_message(prefix, e.server_message())
            }
            other => format!("{prefix}\n{other}"),
        }
    }
}

/// One resource row of the task form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceBinding {
    /// Server id of the resource.
    pub id: String,
    /// Name under which the script refers to it. Blank means the id.
    pub alias: String,
}

impl ResourceBinding {
    pub fn new(id: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            alias: alias.into(),
        }
    }
}

/// The "add task" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSubmission {
    pub title: String,
    /// Path of the script to upload. Blank means no file selected.
    pub file: String,
    pub resources: Vec<ResourceBinding>,
}

impl Default for TaskSubmission {
    fn default() -> Self {
        Self {
            title: DEFAULT_TASK_TITLE.to_string(),
            file: String::new(),
            resources: Vec::new(),
        }
    }
}

impl TaskSubmission {
    /// The selected file, if any.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        selected_path(&self.file)
    }

    /// Append an empty resource row and return its index.
    pub fn add_resource_row(&mut self) -> usize {
        self.resources.push(ResourceBinding::default());
        self.resources.len() - 1
    }

    /// Remove the row at `index`, if it exists.
    pub fn remove_resource_row(&mut self, index: usize) -> Option<ResourceBinding> {
        (index < self.resources.len()).then(|| self.resources.remove(index))
    }

    /// Alias → id map sent with the task. Blank aliases fall back to the
    /// id; rows without an id are skipped. Later rows win on alias clashes.
    #[must_use]
    pub fn resource_mapping(&self) -> BTreeMap<String, String> {
        self.resources
            .iter()
            .filter_map(|row| {
                let id = row.id.trim();
                if id.is_empty() {
                    return None;
                }
                let alias = row.alias.trim();
                let alias = if alias.is_empty() { id } else { alias };
                Some((alias.to_string(), id.to_string()))
            })
            .collect()
    }

    /// Check that the form can be submitted.
    ///
    /// # Errors
    ///
    /// [`SubmitError::NoFile`] when no file is selected.
    pub fn ready(&self) -> Result<(), SubmitError> {
        self.file_path().map(|_| ()).ok_or(SubmitError::NoFile)
    }

    /// Read the selected file and build the request body.
    ///
    /// # Errors
    ///
    /// [`SubmitError::NoFile`] or [`SubmitError::Read`].
    pub async fn to_request(&self) -> Result<AddTaskRequest, SubmitError> {
        let path = self.file_path().ok_or(SubmitError::NoFile)?;
        Ok(AddTaskRequest {
            file: read_file(path).await?,
            title: self.title.clone(),
            resources: self.resource_mapping(),
        })
    }
}

/// The "add resource" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSubmission {
    pub title: String,
    pub file: String,
}

impl Default for ResourceSubmission {
    fn default() -> Self {
        Self {
            title: DEFAULT_RESOURCE_TITLE.to_string(),
            file: String::new(),
        }
    }
}

impl ResourceSubmission {
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        selected_path(&self.file)
    }

    /// # Errors
    ///
    /// [`SubmitError::NoFile`] when no file is selected.
    pub fn ready(&self) -> Result<(), SubmitError> {
        self.file_path().map(|_| ()).ok_or(SubmitError::NoFile)
    }

    /// # Errors
    ///
    /// [`SubmitError::NoFile`] or [`SubmitError::Read`].
    pub async fn to_request(&self) -> Result<AddResourceRequest, SubmitError> {
        let path = self.file_path().ok_or(SubmitError::NoFile)?;
        Ok(AddResourceRequest {
            file: read_file(path).await?,
            title: self.title.clone(),
        })
    }
}

/// Read the task script and post it.
pub async fn submit_task<B: Backend>(backend: &B, form: &TaskSubmission) -> Notice {
    let result = async {
        let request = form.to_request().await?;
        backend.add_task(&request).await?;
        Ok::<_, SubmitError>(())
    }
    .await;

    match result {
        Ok(()) => {
            tracing::info!(title = %form.title, "task added");
            Notice::success(TASK_ADDED)
        }
        Err(e) => {
            tracing::warn!(title = %form.title, error = %e, "adding task failed");
            Notice::failure(e.notice_text(TASK_FAILED))
        }
    }
}

/// Read the resource file and post it.
pub async fn submit_resource<B: Backend>(backend: &B, form: &ResourceSubmission) -> Notice {
    let result = async {
        let request = form.to_request().await?;
        backend.add_resource(&request).await?;
        Ok::<_, SubmitError>(())
    }
    .await;

    match result {
        Ok(()) => {
            tracing::info!(title = %form.title, "resource added");
            Notice::success(RESOURCE_ADDED)
        }
        Err(e) => {
            tracing::warn!(title = %form.title, error = %e, "adding resource failed");
            Notice::failure(e.notice_text(RESOURCE_FAILED))
        }
    }
}

fn selected_path(raw: &str) -> Option<&Path> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| Path::new(trimmed))
}

async fn read_file(path: &Path) -> Result<String, SubmitError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SubmitError::Read {
            path: path.to_path_buf(),
            source,
        })
}
