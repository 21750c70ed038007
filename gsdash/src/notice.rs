//! Blocking notifications shown to the user after a write action.

/// Outcome category of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// A message the user has to acknowledge before continuing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    /// A success notification.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    /// A failure notification.
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            text: text.into(),
        }
    }

    /// `true` for failure notifications.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.level == NoticeLevel::Failure
    }
}
