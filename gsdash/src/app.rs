//! Application state and event handling.
//!
//! [`App`] owns both list views, the open modal (if any) and the queue of
//! pending notices. Key handling is synchronous and returns the
//! [`NetCommand`] to dispatch, if the key triggered network work.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gsdash_proto::{ResourceQuery, TaskQuery};

use crate::net::{ListQuery, NetCommand, NetEvent};
use crate::notice::Notice;
use crate::route::Route;
use crate::view::{ResourceListView, ResourceSubmission, TaskListView, TaskSubmission};

/// Status bar time format used unless configured otherwise.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Notice shown when submitting a form without a file.
pub const NO_FILE_SELECTED: &str = "Select a file to upload";

/// Which part of the list screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// Record table (default).
    Table,
    /// Filter form.
    Filter,
}

/// An editable field of a submission modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalField {
    Title,
    File,
    ResourceId(usize),
    ResourceAlias(usize),
}

impl ModalField {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::File => "File",
            Self::ResourceId(_) => "Resource id",
            Self::ResourceAlias(_) => "Alias",
        }
    }
}

/// The form shown in the modal overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalForm {
    Task(TaskSubmission),
    Resource(ResourceSubmission),
}

/// An open submission modal and its focused field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub form: ModalForm,
    pub field: usize,
}

impl Modal {
    #[must_use]
    pub fn task() -> Self {
        Self {
            form: ModalForm::Task(TaskSubmission::default()),
            field: 0,
        }
    }

    #[must_use]
    pub fn resource() -> Self {
        Self {
            form: ModalForm::Resource(ResourceSubmission::default()),
            field: 0,
        }
    }

    /// Heading of the overlay.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.form {
            ModalForm::Task(_) => "Add task",
            ModalForm::Resource(_) => "Add resource",
        }
    }

    /// Editable fields in tab order.
    #[must_use]
    pub fn fields(&self) -> Vec<ModalField> {
        let mut fields = vec![ModalField::Title, ModalField::File];
        if let ModalForm::Task(form) = &self.form {
            for i in 0..form.resources.len() {
                fields.push(ModalField::ResourceId(i));
                fields.push(ModalField::ResourceAlias(i));
            }
        }
        fields
    }

    #[must_use]
    pub fn focused(&self) -> ModalField {
        self.fields()
            .get(self.field)
            .copied()
            .unwrap_or(ModalField::Title)
    }

    /// Current text of `field`.
    #[must_use]
    pub fn value(&self, field: ModalField) -> &str {
        match (&self.form, field) {
            (ModalForm::Task(f), ModalField::Title) => &f.title,
            (ModalForm::Task(f), ModalField::File) => &f.file,
            (ModalForm::Resource(f), ModalField::Title) => &f.title,
            (ModalForm::Resource(f), ModalField::File) => &f.file,
            (ModalForm::Task(f), ModalField::ResourceId(i)) => {
                f.resources.get(i).map_or("", |r| r.id.as_str())
            }
            (ModalForm::Task(f), ModalField::ResourceAlias(i)) => {
                f.resources.get(i).map_or("", |r| r.alias.as_str())
            }
            (ModalForm::Resource(_), _) => "",
        }
    }

    fn value_mut(&mut self) -> Option<&mut String> {
        let field = self.focused();
        match (&mut self.form, field) {
            (ModalForm::Task(f), ModalField::Title) => Some(&mut f.title),
            (ModalForm::Task(f), ModalField::File) => Some(&mut f.file),
            (ModalForm::Resource(f), ModalField::Title) => Some(&mut f.title),
            (ModalForm::Resource(f), ModalField::File) => Some(&mut f.file),
            (ModalForm::Task(f), ModalField::ResourceId(i)) => {
                f.resources.get_mut(i).map(|r| &mut r.id)
            }
            (ModalForm::Task(f), ModalField::ResourceAlias(i)) => {
                f.resources.get_mut(i).map(|r| &mut r.alias)
            }
            (ModalForm::Resource(_), _) => None,
        }
    }

    fn next_field(&mut self) {
        self.field = (self.field + 1) % self.fields().len();
    }

    fn prev_field(&mut self) {
        let len = self.fields().len();
        self.field = (self.field + len - 1) % len;
    }

    /// Add a resource row to a task form and focus its id.
    fn add_resource_row(&mut self) {
        if let ModalForm::Task(form) = &mut self.form {
            let row = form.add_resource_row();
            self.field = 2 + row * 2;
        }
    }

    /// Remove the resource row holding the focused field.
    fn remove_focused_row(&mut self) {
        let row = match self.focused() {
            ModalField::ResourceId(i) | ModalField::ResourceAlias(i) => i,
            _ => return,
        };
        if let ModalForm::Task(form) = &mut self.form {
            form.remove_resource_row(row);
        }
        self.field = self.field.min(self.fields().len() - 1);
    }

    /// Validate and turn the form into a command.
    fn submit(&self) -> Result<NetCommand, Notice> {
        match &self.form {
            ModalForm::Task(form) => form
                .ready()
                .map(|()| NetCommand::AddTask(form.clone()))
                .map_err(|_| Notice::failure(NO_FILE_SELECTED)),
            ModalForm::Resource(form) => form
                .ready()
                .map(|()| NetCommand::AddResource(form.clone()))
                .map_err(|_| Notice::failure(NO_FILE_SELECTED)),
        }
    }
}

/// Main application state.
pub struct App {
    route: Route,
    /// Bumped on every route activation; list events carry the value they
    /// were requested under.
    generation: u64,
    pub tasks: TaskListView,
    pub resources: ResourceListView,
    pub focus: Focus,
    pub modal: Option<Modal>,
    /// Detail pane for the highlighted task is open.
    pub show_detail: bool,
    /// Blocking notices, oldest first.
    pub notices: VecDeque<Notice>,
    /// Server address shown in the status bar.
    pub base_url: String,
    /// Timestamp display format (chrono).
    pub timestamp_format: String,
    pub should_quit: bool,
}

impl App {
    /// Create an application with empty lists and `page_size` records per page.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            route: Route::default(),
            generation: 0,
            tasks: TaskListView::new(TaskQuery::with_page_size(page_size)),
            resources: ResourceListView::new(ResourceQuery::with_page_size(page_size)),
            focus: Focus::Table,
            modal: None,
            show_detail: false,
            notices: VecDeque::new(),
            base_url: String::new(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub const fn route(&self) -> Route {
        self.route
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Path of the active route, for navigation highlighting.
    pub const fn current_path(&self) -> &'static str {
        self.route.path()
    }

    /// The notice currently blocking input, if any.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    /// Switch to the route for `path` and return the command that starts
    /// polling it. Unknown paths land on the task list.
    pub fn navigate(&mut self, path: &str) -> NetCommand {
        self.route = Route::from_path(path);
        self.generation += 1;
        self.focus = Focus::Table;
        tracing::debug!(route = %self.route, generation = self.generation, "navigate");
        NetCommand::Activate {
            generation: self.generation,
            query: self.active_query(),
        }
    }

    fn active_query(&self) -> ListQuery {
        match self.route {
            Route::Tasks => ListQuery::Tasks(self.tasks.form.committed().clone()),
            Route::Resources => ListQuery::Resources(self.resources.form.committed().clone()),
        }
    }

    fn is_current(&self, generation: u64, route: Route) -> bool {
        generation == self.generation && route == self.route
    }

    /// Apply an event from the networking layer. List results from a
    /// superseded activation are dropped.
    pub fn apply_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::TasksLoaded { generation, result } => {
                if self.is_current(generation, Route::Tasks) {
                    self.tasks.apply(result);
                } else {
                    tracing::debug!(generation, current = self.generation, "dropping stale task list");
                }
            }
            NetEvent::ResourcesLoaded { generation, result } => {
                if self.is_current(generation, Route::Resources) {
                    self.resources.apply(result);
                } else {
                    tracing::debug!(
                        generation,
                        current = self.generation,
                        "dropping stale resource list"
                    );
                }
            }
            NetEvent::Notice(notice) => self.push_notice(notice),
        }
    }

    /// Handle a key event.
    ///
    /// Returns `Some(NetCommand)` when the key requires network dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<NetCommand> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        // A notice blocks everything until acknowledged.
        if !self.notices.is_empty() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notices.pop_front();
            }
            return None;
        }

        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        match self.focus {
            Focus::Table => self.handle_table_key(key),
            Focus::Filter => self.handle_filter_key(key),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => Some(self.navigate(self.route.toggle().path())),
            KeyCode::Char('1') => Some(self.navigate(Route::Tasks.path())),
            KeyCode::Char('2') => Some(self.navigate(Route::Resources.path())),
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => self.next_page(),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => self.prev_page(),
            KeyCode::Char('/' | 'f') => {
                self.focus = Focus::Filter;
                None
            }
            KeyCode::Char('r') => Some(NetCommand::Refresh),
            KeyCode::Enter => {
                if self.route == Route::Tasks {
                    self.show_detail = !self.show_detail;
                }
                None
            }
            KeyCode::Char('c') => self.cancel_selected(),
            KeyCode::Char('a') => {
                self.modal = Some(match self.route {
                    Route::Tasks => Modal::task(),
                    Route::Resources => Modal::resource(),
                });
                None
            }
            _ => None,
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('r') {
                self.reset_filters();
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Enter => {
                self.focus = Focus::Table;
                return Some(self.search());
            }
            KeyCode::Char(c) => self.edit_query(|q| q.push(c)),
            KeyCode::Backspace => self.edit_query(|q| {
                q.pop();
            }),
            KeyCode::Right => self.cycle_filter(true),
            KeyCode::Left => self.cycle_filter(false),
            KeyCode::Up => self.adjust_page_size(1),
            KeyCode::Down => self.adjust_page_size(-1),
            _ => {}
        }
        None
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<NetCommand> {
        let modal = self.modal.as_mut()?;

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => modal.add_resource_row(),
                KeyCode::Char('d') => modal.remove_focused_row(),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Esc => self.modal = None,
            KeyCode::Tab | KeyCode::Down => modal.next_field(),
            KeyCode::BackTab | KeyCode::Up => modal.prev_field(),
            KeyCode::Char(c) => {
                if let Some(value) = modal.value_mut() {
                    value.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = modal.value_mut() {
                    value.pop();
                }
            }
            KeyCode::Enter => match modal.submit() {
                Ok(cmd) => {
                    // Dismiss right away; the outcome arrives as a notice.
                    self.modal = None;
                    return Some(cmd);
                }
                Err(notice) => self.push_notice(notice),
            },
            _ => {}
        }
        None
    }

    /// Commit the staged filters of the active list.
    pub fn search(&mut self) -> NetCommand {
        match self.route {
            Route::Tasks => NetCommand::SetTaskQuery(self.tasks.search()),
            Route::Resources => NetCommand::SetResourceQuery(self.resources.search()),
        }
    }

    /// Restore the staged filters of the active list to the baseline.
    pub fn reset_filters(&mut self) {
        match self.route {
            Route::Tasks => self.tasks.reset(),
            Route::Resources => self.resources.reset(),
        }
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut String)) {
        match self.route {
            Route::Tasks => {
                let staged = self.tasks.form.staged_mut();
                edit(&mut staged.q);
                staged.offset = 0;
            }
            Route::Resources => {
                let staged = self.resources.form.staged_mut();
                edit(&mut staged.q);
                staged.offset = 0;
            }
        }
    }

    fn cycle_filter(&mut self, forward: bool) {
        match self.route {
            Route::Tasks => {
                let staged = self.tasks.form.staged_mut();
                staged.state = if forward {
                    staged.state.next()
                } else {
                    staged.state.prev()
                };
                staged.offset = 0;
            }
            Route::Resources => {
                let staged = self.resources.form.staged_mut();
                staged.lock = if forward {
                    staged.lock.next()
                } else {
                    staged.lock.prev()
                };
                staged.offset = 0;
            }
        }
    }

    fn adjust_page_size(&mut self, delta: i32) {
        let apply = |count: &mut u32| {
            *count = count.saturating_add_signed(delta).max(1);
        };
        match self.route {
            Route::Tasks => apply(&mut self.tasks.form.staged_mut().count),
            Route::Resources => apply(&mut self.resources.form.staged_mut().count),
        }
    }

    fn select_next(&mut self) {
        match self.route {
            Route::Tasks => self.tasks.select_next(),
            Route::Resources => self.resources.select_next(),
        }
    }

    fn select_prev(&mut self) {
        match self.route {
            Route::Tasks => self.tasks.select_prev(),
            Route::Resources => self.resources.select_prev(),
        }
    }

    fn next_page(&mut self) -> Option<NetCommand> {
        match self.route {
            Route::Tasks => {
                let total = self.tasks.total();
                self.tasks.form.next_page(total).map(NetCommand::SetTaskQuery)
            }
            Route::Resources => {
                let total = self.resources.total();
                self.resources
                    .form
                    .next_page(total)
                    .map(NetCommand::SetResourceQuery)
            }
        }
    }

    fn prev_page(&mut self) -> Option<NetCommand> {
        match self.route {
            Route::Tasks => self.tasks.form.prev_page().map(NetCommand::SetTaskQuery),
            Route::Resources => self
                .resources
                .form
                .prev_page()
                .map(NetCommand::SetResourceQuery),
        }
    }

    /// Cancel the highlighted task, if the list offers cancel for it.
    fn cancel_selected(&self) -> Option<NetCommand> {
        if self.route != Route::Tasks {
            return None;
        }
        let task = self.tasks.selected_item()?;
        task.can_cancel().then(|| NetCommand::CancelTask {
            task_id: task.task_id.clone(),
        })
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(gsdash_proto::DEFAULT_PAGE_SIZE)
    }
}
