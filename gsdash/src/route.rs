//! Navigation routes of the dashboard.

use std::fmt;

/// A screen the dashboard can show. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Tasks,
    Resources,
}

impl Route {
    /// Every route, in navigation-bar order.
    pub const ALL: [Self; 2] = [Self::Tasks, Self::Resources];

    /// Resolve a path. Anything other than `/resources` (including `/`
    /// and unknown paths) lands on the task list.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        match path {
            "/resources" => Self::Resources,
            _ => Self::Tasks,
        }
    }

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Tasks => "/tasks",
            Self::Resources => "/resources",
        }
    }

    /// Navigation-bar label.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Tasks => "Tasks",
            Self::Resources => "Resources",
        }
    }

    /// Whether this route's entry is highlighted for `current_path`.
    /// Matches the exact path only.
    #[must_use]
    pub fn is_active(self, current_path: &str) -> bool {
        self.path() == current_path
    }

    /// The other route, for tab-style switching.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Tasks => Self::Resources,
            Self::Resources => Self::Tasks,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
