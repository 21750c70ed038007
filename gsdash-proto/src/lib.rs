//! Shared HTTP API contracts for the gsdash task server.
//!
//! Every type here is JSON-encoded: list filters travel as query strings,
//! add requests as JSON bodies, and failures as an [`error::ErrorBody`].

pub mod error;
pub mod query;
pub mod record;
pub mod state;
pub mod submit;

pub use error::{ErrorBody, ErrorMessage, FieldError, ProtoError, failure_message};
pub use query::{
    DEFAULT_PAGE_SIZE, LockFilter, Paged, ResourceQuery, SortKey, StateFilter, TaskQuery,
};
pub use record::{ResourceList, ResourceRecord, RuntimeError, TaskList, TaskRecord};
pub use state::{TaskState, can_cancel};
pub use submit::{AddResourceRequest, AddTaskRequest, Created};
