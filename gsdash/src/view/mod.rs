//! View-models behind the dashboard screens.
//!
//! These hold the state a screen renders and the operations a user can
//! trigger on it. They talk to the server only through [`crate::api::Backend`].

pub mod list;
pub mod resources;
pub mod submit;
pub mod tasks;

pub use list::{FilterForm, ListSource, ListView, Listing, RecordOf};
pub use resources::ResourceListView;
pub use submit::{ResourceBinding, ResourceSubmission, SubmitError, TaskSubmission};
pub use tasks::TaskListView;
