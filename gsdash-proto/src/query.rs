//! List filters sent as query strings to the list endpoints.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::state::TaskState;

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// State filter for the task list. `All` omits the `status` parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateFilter {
    /// No filtering by state.
    #[default]
    All,
    /// Only tasks in the given state.
    Only(TaskState),
}

impl StateFilter {
    /// `true` for [`StateFilter::All`].
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// All filter options in display order.
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(TaskState::KNOWN.into_iter().map(Self::Only))
            .collect()
    }

    /// The option after this one, wrapping around.
    #[must_use]
    pub fn next(&self) -> Self {
        let options = Self::options();
        let idx = options.iter().position(|o| o == self).unwrap_or(0);
        options[(idx + 1) % options.len()].clone()
    }

    /// The option before this one, wrapping around.
    #[must_use]
    pub fn prev(&self) -> Self {
        let options = Self::options();
        let idx = options.iter().position(|o| o == self).unwrap_or(0);
        options[(idx + options.len() - 1) % options.len()].clone()
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(state) => state.fmt(f),
        }
    }
}

impl Serialize for StateFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_none(),
            Self::Only(state) => state.serialize(serializer),
        }
    }
}

/// Sort key for the task list. The server only knows date ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date => f.write_str("Date"),
        }
    }
}

/// Lock filter for the resource list. `Any` omits the `is_locked` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockFilter {
    /// Locked and unlocked resources.
    #[default]
    Any,
    /// Only resources held by a running task.
    Locked,
    /// Only free resources.
    Unlocked,
}

impl LockFilter {
    /// `true` for [`LockFilter::Any`].
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// The option after this one, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Any => Self::Locked,
            Self::Locked => Self::Unlocked,
            Self::Unlocked => Self::Any,
        }
    }

    /// The option before this one, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::Any => Self::Unlocked,
            Self::Locked => Self::Any,
            Self::Unlocked => Self::Locked,
        }
    }
}

impl fmt::Display for LockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Locked => f.write_str("Locked"),
            Self::Unlocked => f.write_str("Unlocked"),
        }
    }
}

impl Serialize for LockFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_none(),
            Self::Locked => serializer.serialize_bool(true),
            Self::Unlocked => serializer.serialize_bool(false),
        }
    }
}

/// Offset/count pagination shared by both list filters.
pub trait Paged {
    /// Index of the first record requested.
    fn offset(&self) -> u32;
    /// Page size.
    fn count(&self) -> u32;
    /// Move the window start.
    fn set_offset(&mut self, offset: u32);

    /// Advance one page. Returns `false` when already on the last page
    /// according to `total`, or when the page size is zero.
    fn next_page(&mut self, total: Option<u64>) -> bool {
        let count = self.count();
        if count == 0 {
            return false;
        }
        let next = self.offset().saturating_add(count);
        if total.is_some_and(|t| u64::from(next) >= t) {
            return false;
        }
        self.set_offset(next);
        true
    }

    /// Go back one page, clamping at zero. Returns `false` on the first page.
    fn prev_page(&mut self) -> bool {
        if self.offset() == 0 {
            return false;
        }
        self.set_offset(self.offset().saturating_sub(self.count()));
        true
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[allow(clippy::ptr_arg)]
fn serialize_trimmed<S: Serializer>(value: &String, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.trim())
}

/// Filters for `GET /task_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskQuery {
    /// State filter, sent as `status`.
    #[serde(rename = "status", skip_serializing_if = "StateFilter::is_all")]
    pub state: StateFilter,
    /// Sort key.
    pub sort: SortKey,
    /// Case-insensitive title substring; blank means no filter.
    #[serde(
        skip_serializing_if = "is_blank",
        serialize_with = "serialize_trimmed"
    )]
    pub q: String,
    /// Pagination offset.
    pub offset: u32,
    /// Page size.
    pub count: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl TaskQuery {
    /// The baseline filter with a custom page size.
    #[must_use]
    pub fn with_page_size(count: u32) -> Self {
        Self {
            state: StateFilter::All,
            sort: SortKey::Date,
            q: String::new(),
            offset: 0,
            count,
        }
    }
}

impl Paged for TaskQuery {
    fn offset(&self) -> u32 {
        self.offset
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }
}

/// Filters for `GET /resource_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceQuery {
    /// Lock filter, sent as `is_locked`.
    #[serde(rename = "is_locked", skip_serializing_if = "LockFilter::is_any")]
    pub lock: LockFilter,
    /// Case-insensitive name substring; blank means no filter.
    #[serde(
        skip_serializing_if = "is_blank",
        serialize_with = "serialize_trimmed"
    )]
    pub q: String,
    /// Pagination offset.
    pub offset: u32,
    /// Page size.
    pub count: u32,
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ResourceQuery {
    /// The baseline filter with a custom page size.
    #[must_use]
    pub fn with_page_size(count: u32) -> Self {
        Self {
            lock: LockFilter::Any,
            q: String::new(),
            offset: 0,
            count,
        }
    }
}

impl Paged for ResourceQuery {
    fn offset(&self) -> u32 {
        self.offset
    }

    fn count(&self) -> u32 {
        self.count
    }

    fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }
}
