//! Task list screen: listing plus the cancel action.

use gsdash_proto::{TaskList, TaskQuery, failure_message};

use super::list::{ListSource, ListView, Listing};
use crate::api::{ApiError, Backend};
use crate::notice::Notice;

pub use gsdash_proto::can_cancel;

/// Notification text after a successful cancel.
pub const CANCELLED: &str = "Task cancelled!";

/// Notification prefix after a failed cancel.
pub const CANCEL_FAILED: &str = "Error";

/// The task list view-model.
pub type TaskListView = ListView<TaskQuery>;

impl Listing for TaskList {
    type Record = gsdash_proto::TaskRecord;

    fn into_parts(self) -> (Vec<Self::Record>, Option<u64>) {
        (self.tasks, self.total)
    }
}

impl ListSource for TaskQuery {
    type Listing = TaskList;

    const NAME: &'static str = "tasks";

    fn fetch<B: Backend>(
        backend: &B,
        query: &Self,
    ) -> impl Future<Output = Result<TaskList, ApiError>> + Send {
        backend.list_tasks(query)
    }
}

/// Ask the server to cancel `task_id` and describe the outcome.
///
/// The list is not refreshed here; the next poll picks up the new state.
pub async fn cancel<B: Backend>(backend: &B, task_id: &str) -> Notice {
    match backend.cancel_task(task_id).await {
        Ok(()) => {
            tracing::info!(task_id, "task cancelled");
            Notice::success(CANCELLED)
        }
        Err(e) => {
            tracing::warn!(task_id, error = %e, "cancel failed");
            let text = match e.server_message() {
                Some(message) => failure_message(CANCEL_FAILED, Some(message)),
                None => format!("{CANCEL_FAILED}\n{e}"),
            };
            Notice::failure(text)
        }
    }
}
