//! List view-model shared by the task and resource screens.
//!
//! A list view keeps three copies of its filter: the `baseline` it was
//! created with, the `staged` copy the user edits, and the `committed`
//! copy last sent to the server. Searching copies staged into committed;
//! resetting copies baseline into staged. The record list is replaced
//! wholesale by every successful fetch and left untouched by failures.

use std::fmt;
use std::future::Future;

use chrono::{DateTime, Local};
use gsdash_proto::Paged;

use crate::api::{ApiError, Backend};

/// A list response that splits into records and an optional total.
pub trait Listing {
    type Record: Clone + fmt::Debug + Send + Sync + 'static;

    /// Records in server order, and the unpaginated total when known.
    fn into_parts(self) -> (Vec<Self::Record>, Option<u64>);
}

/// A filter type that knows which endpoint it queries.
pub trait ListSource: Clone + PartialEq + Paged + Send + Sync + 'static {
    type Listing: Listing + Send + 'static;

    /// Label used in log records.
    const NAME: &'static str;

    /// Fetch one page matching `query`.
    fn fetch<B: Backend>(
        backend: &B,
        query: &Self,
    ) -> impl Future<Output = Result<Self::Listing, ApiError>> + Send;
}

/// Record type listed by a filter type.
pub type RecordOf<F> = <<F as ListSource>::Listing as Listing>::Record;

/// Staged/committed filter pair with a fixed baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterForm<F> {
    baseline: F,
    staged: F,
    committed: F,
}

impl<F: Clone> FilterForm<F> {
    /// Both the staged and committed copies start equal to `baseline`.
    pub fn new(baseline: F) -> Self {
        Self {
            staged: baseline.clone(),
            committed: baseline.clone(),
            baseline,
        }
    }

    pub const fn baseline(&self) -> &F {
        &self.baseline
    }

    /// The user-edited copy.
    pub const fn staged(&self) -> &F {
        &self.staged
    }

    pub const fn staged_mut(&mut self) -> &mut F {
        &mut self.staged
    }

    /// The copy last sent to the server.
    pub const fn committed(&self) -> &F {
        &self.committed
    }

    /// Copy the staged filter into the committed one and return it.
    pub fn commit(&mut self) -> F {
        self.committed = self.staged.clone();
        self.committed.clone()
    }

    /// Restore the staged filter to the baseline.
    pub fn reset(&mut self) {
        self.staged = self.baseline.clone();
    }
}

impl<F: Clone + Paged> FilterForm<F> {
    /// Advance the committed window by one page. The staged offset follows
    /// so that a later search stays on the same page. Returns the new
    /// committed filter, or `None` when already on the last page.
    pub fn next_page(&mut self, total: Option<u64>) -> Option<F> {
        if !self.committed.next_page(total) {
            return None;
        }
        self.staged.set_offset(self.committed.offset());
        Some(self.committed.clone())
    }

    /// Go back one page. Returns `None` on the first page.
    pub fn prev_page(&mut self) -> Option<F> {
        if !self.committed.prev_page() {
            return None;
        }
        self.staged.set_offset(self.committed.offset());
        Some(self.committed.clone())
    }
}

/// View-model of one list screen.
#[derive(Debug, Clone)]
pub struct ListView<F: ListSource> {
    pub form: FilterForm<F>,
    items: Vec<RecordOf<F>>,
    total: Option<u64>,
    selected: usize,
    last_updated: Option<DateTime<Local>>,
}

impl<F: ListSource> ListView<F> {
    /// An empty list with the given filter baseline.
    pub fn new(baseline: F) -> Self {
        Self {
            form: FilterForm::new(baseline),
            items: Vec::new(),
            total: None,
            selected: 0,
            last_updated: None,
        }
    }

    /// Currently displayed records.
    pub fn items(&self) -> &[RecordOf<F>] {
        &self.items
    }

    /// Unpaginated match count from the last successful fetch.
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// When the list was last replaced.
    pub const fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// The highlighted record, if the list is not empty.
    pub fn selected_item(&self) -> Option<&RecordOf<F>> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected < self.items.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Commit the staged filters. Returns the filter to fetch with.
    pub fn search(&mut self) -> F {
        self.form.commit()
    }

    /// Restore the staged filters to the baseline.
    pub fn reset(&mut self) {
        self.form.reset();
    }

    /// Apply a fetch result: replace the list on success, log and keep the
    /// current list on failure. Returns whether the list was replaced.
    pub fn apply(&mut self, result: Result<F::Listing, ApiError>) -> bool {
        match result {
            Ok(listing) => {
                let (items, total) = listing.into_parts();
                tracing::debug!(list = F::NAME, count = items.len(), "list replaced");
                self.items = items;
                self.total = total;
                self.selected = self.selected.min(self.items.len().saturating_sub(1));
                self.last_updated = Some(Local::now());
                true
            }
            Err(e) => {
                tracing::warn!(list = F::NAME, error = %e, "error loading data");
                false
            }
        }
    }

    /// Fetch with the committed filters and apply the result.
    pub async fn update<B: Backend>(&mut self, backend: &B) -> bool {
        let result = F::fetch(backend, self.form.committed()).await;
        self.apply(result)
    }
}
