//! Task lifecycle labels as reported by the task server.
//!
//! The server stores upper-case labels (`RUNNING`, `CANCELED`), while
//! older dashboards compared against capitalised ones (`Running`,
//! `Cancelled`). Parsing accepts either casing and both spellings of
//! cancelled; serialisation always emits the server's upper-case form.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a task on the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskState {
    /// Created but not yet queued.
    Idle,
    /// At least one subtask is executing.
    Running,
    /// A subtask failed.
    Failed,
    /// Every subtask succeeded.
    Success,
    /// Cancelled by a user.
    Cancelled,
    /// Queued for execution.
    Pending,
    /// A label this client does not know about, kept verbatim.
    Unknown(String),
}

impl TaskState {
    /// Every known state, in the order the dashboard offers them as filters.
    pub const KNOWN: [Self; 6] = [
        Self::Idle,
        Self::Running,
        Self::Failed,
        Self::Success,
        Self::Cancelled,
        Self::Pending,
    ];

    /// Parse a state label, ignoring case and surrounding whitespace.
    ///
    /// Never fails: unrecognised labels become [`TaskState::Unknown`].
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "IDLE" => Self::Idle,
            "RUNNING" => Self::Running,
            "FAILED" => Self::Failed,
            "SUCCESS" => Self::Success,
            "CANCELED" | "CANCELLED" => Self::Cancelled,
            "PENDING" => Self::Pending,
            _ => Self::Unknown(label.to_string()),
        }
    }

    /// The upper-case label the server stores and filters on.
    #[must_use]
    pub fn wire_label(&self) -> &str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Failed => "FAILED",
            Self::Success => "SUCCESS",
            Self::Cancelled => "CANCELED",
            Self::Pending => "PENDING",
            Self::Unknown(label) => label,
        }
    }

    /// Human-facing label.
    #[must_use]
    pub fn display_label(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Failed => "Failed",
            Self::Success => "Success",
            Self::Cancelled => "Cancelled",
            Self::Pending => "Pending",
            Self::Unknown(label) => label,
        }
    }

    /// Whether the server accepts a cancel request for a task in this state.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        matches!(self, Self::Idle | Self::Pending | Self::Running)
    }

    /// Whether the task has stopped for good.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Failed | Self::Success | Self::Cancelled)
    }
}

/// Cancel-eligibility check on a raw state label.
///
/// True only for `Idle`, `Pending` and `Running` in any casing.
#[must_use]
pub fn can_cancel(label: &str) -> bool {
    TaskState::parse(label).is_cancellable()
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_label())
    }
}

impl Serialize for TaskState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_label())
    }
}

impl<'de> Deserialize<'de> for TaskState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::parse(&label))
    }
}
