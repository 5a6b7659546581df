//! Application state and logic
//!
//! `App` is owned by the event loop and is the only place view state is
//! mutated. Key handling returns [`Action`]s for the loop to run in the
//! background; their results come back as [`BackendEvent`]s.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use inventory_console::generation::Applied;
use inventory_console::graph::UrlOpener;
use inventory_console::model::{Metric, Resource};
use inventory_console::notify::{RecordingNotifier, report_error};
use inventory_console::tree::{Expansion, NodePath};
use inventory_console::{Config, GraphLauncher, ResourceTree, TypeCatalog};
use ratatui::widgets::{ListState, TableState};
use tracing::info;

use crate::event::{Action, BackendEvent, ConnectionState};

/// Top-level view shown in the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Resources,
    Types,
}

/// Pane holding keyboard focus in the Resources view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Metrics,
}

/// Deletion waiting for operator confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum PendingDelete {
    Resource(Resource),
    Type(String),
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        match self {
            PendingDelete::Resource(resource) => {
                format!("Delete resource {}?", resource.label())
            }
            PendingDelete::Type(type_id) => format!("Delete resource type {type_id}?"),
        }
    }
}

/// Error notification shown in the corner of the screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub raised: Instant,
}

/// Logs graph URLs; the TUI shows them in the status line
struct LogOpener;

impl UrlOpener for LogOpener {
    fn open(&self, url: &str) {
        info!("Open graph: {}", url);
    }
}

/// Main application state
pub struct App {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Base URL of the inventory service
    pub server_url: String,
    pub view: ActiveView,
    pub focus: Focus,
    pub tree: ResourceTree,
    pub tree_state: ListState,
    pub metrics_state: ListState,
    pub catalog: TypeCatalog,
    pub types_state: TableState,
    /// Filter text being edited, if the filter prompt is open
    pub filter_input: Option<String>,
    pub ignore_case: bool,
    pub pending_delete: Option<PendingDelete>,
    pub toasts: VecDeque<Toast>,
    pub status_line: Option<String>,
    pub connection: ConnectionState,
    pub last_refresh: Option<DateTime<Local>>,
    launcher: GraphLauncher,
    notifier: RecordingNotifier,
    confirm_deletes: bool,
    toast_lifetime: Duration,
}

impl App {
    /// Create a new App instance
    pub fn new(server_url: String, config: &Config) -> Self {
        Self {
            should_quit: false,
            server_url,
            view: ActiveView::Resources,
            focus: Focus::Tree,
            tree: ResourceTree::new(),
            tree_state: ListState::default(),
            metrics_state: ListState::default(),
            catalog: TypeCatalog::new(),
            types_state: TableState::default(),
            filter_input: None,
            ignore_case: true,
            pending_delete: None,
            toasts: VecDeque::new(),
            status_line: None,
            connection: ConnectionState::Unknown,
            last_refresh: None,
            launcher: GraphLauncher::new(config.graph.clone()),
            notifier: RecordingNotifier::new(),
            confirm_deletes: config.console.confirm_deletes,
            toast_lifetime: Duration::from_secs(config.console.notification_secs),
        }
    }

    /// Mark the app as ready to quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Work to run when the app starts
    pub fn startup(&mut self) -> Vec<Action> {
        vec![
            Action::CheckStatus,
            Action::LoadRoots(self.tree.begin_refresh()),
            Action::LoadTypes(self.catalog.begin_load()),
        ]
    }

    // Key handling

    pub fn on_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Vec::new();
        }
        if self.pending_delete.is_some() {
            return self.on_confirm_key(key);
        }
        if self.filter_input.is_some() {
            self.on_filter_key(key);
            return Vec::new();
        }

        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                Vec::new()
            }
            KeyCode::Tab => {
                self.view = match self.view {
                    ActiveView::Resources => ActiveView::Types,
                    ActiveView::Types => ActiveView::Resources,
                };
                Vec::new()
            }
            KeyCode::Char('r') => vec![self.refresh()],
            KeyCode::Char('s') => vec![Action::CheckStatus],
            _ => match self.view {
                ActiveView::Resources => self.on_resources_key(key),
                ActiveView::Types => self.on_types_key(key),
            },
        }
    }

    /// Refresh the current view
    pub fn refresh(&mut self) -> Action {
        match self.view {
            ActiveView::Resources => Action::LoadRoots(self.tree.begin_refresh()),
            ActiveView::Types => Action::LoadTypes(self.catalog.begin_load()),
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => match self.pending_delete.take() {
                Some(PendingDelete::Resource(resource)) => vec![Action::DeleteResource(resource)],
                Some(PendingDelete::Type(type_id)) => vec![Action::DeleteType(type_id)],
                None => Vec::new(),
            },
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.pending_delete = None;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn request_delete(&mut self, pending: PendingDelete) -> Vec<Action> {
        if self.confirm_deletes {
            self.pending_delete = Some(pending);
            return Vec::new();
        }
        match pending {
            PendingDelete::Resource(resource) => vec![Action::DeleteResource(resource)],
            PendingDelete::Type(type_id) => vec![Action::DeleteType(type_id)],
        }
    }

    fn on_resources_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if self.focus == Focus::Metrics {
            return self.on_metrics_key(key);
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_tree_cursor(1);
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_tree_cursor(-1);
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.expand_selected(),
            KeyCode::Left | KeyCode::Char('h') => {
                self.collapse_selected();
                Vec::new()
            }
            KeyCode::Char('m') => {
                if !self.tree.detail().metrics.is_empty() {
                    self.focus = Focus::Metrics;
                    self.metrics_state.select(Some(0));
                }
                Vec::new()
            }
            KeyCode::Char('d') => match self.tree.detail().resource.clone() {
                Some(resource) => self.request_delete(PendingDelete::Resource(resource)),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn on_metrics_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let count = self.tree.detail().metrics.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                step_list(&mut self.metrics_state, count, 1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                step_list(&mut self.metrics_state, count, -1);
            }
            KeyCode::Enter | KeyCode::Char('g') => self.launch_graph(),
            KeyCode::Esc | KeyCode::Char('m') => {
                self.focus = Focus::Tree;
                self.metrics_state.select(None);
            }
            _ => {}
        }
        Vec::new()
    }

    fn on_types_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let count = self.catalog.filtered().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                step_table(&mut self.types_state, count, 1);
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                step_table(&mut self.types_state, count, -1);
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.filter_input = Some(self.catalog.filter().name.clone().unwrap_or_default());
                Vec::new()
            }
            KeyCode::Char('i') => {
                self.ignore_case = !self.ignore_case;
                self.reapply_filter();
                Vec::new()
            }
            KeyCode::Char('d') => match self.selected_type_id() {
                Some(type_id) => self.request_delete(PendingDelete::Type(type_id)),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        let Some(input) = self.filter_input.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.filter_input = None;
                return;
            }
            _ => return,
        }
        let text = input.clone();
        self.catalog.apply_filter(Some(&text), self.ignore_case);
        self.clamp_types_cursor();
    }

    fn reapply_filter(&mut self) {
        let text = self.catalog.filter().name.clone();
        self.catalog.apply_filter(text.as_deref(), self.ignore_case);
        self.clamp_types_cursor();
    }

    // Resources view

    fn selected_path(&self) -> Option<NodePath> {
        let index = self.tree_state.selected()?;
        self.tree
            .visible_rows()
            .into_iter()
            .nth(index)
            .map(|row| row.path)
    }

    fn move_tree_cursor(&mut self, delta: isize) {
        let count = self.tree.visible_rows().len();
        step_list(&mut self.tree_state, count, delta);
        self.select_current();
    }

    fn select_current(&mut self) {
        if let Some(path) = self.selected_path() {
            self.tree.select_node(&path);
            self.metrics_state.select(None);
        }
    }

    /// Keep the cursor on the selected node when rows above it change
    fn anchor_tree_cursor(&mut self) {
        let Some(selected) = self.tree.selected() else {
            return;
        };
        if let Some(index) = self
            .tree
            .visible_rows()
            .iter()
            .position(|row| &row.path == selected)
        {
            self.tree_state.select(Some(index));
        }
    }

    fn expand_selected(&mut self) -> Vec<Action> {
        let Some(path) = self.selected_path() else {
            return Vec::new();
        };
        self.tree.select_node(&path);
        match self.tree.begin_expand(&path) {
            Expansion::Fetch(ticket) => vec![Action::Expand(ticket)],
            Expansion::Cached | Expansion::Pending | Expansion::Missing => Vec::new(),
        }
    }

    fn collapse_selected(&mut self) {
        let Some(path) = self.selected_path() else {
            return;
        };
        if self.tree.collapse(&path) {
            return;
        }
        let Some(parent) = path.parent() else {
            return;
        };
        if let Some(index) = self
            .tree
            .visible_rows()
            .iter()
            .position(|row| row.path == parent)
        {
            self.tree_state.select(Some(index));
            self.select_current();
        }
    }

    pub fn selected_metric(&self) -> Option<&Metric> {
        let index = self.metrics_state.selected()?;
        self.tree.detail().metrics.get(index)
    }

    fn launch_graph(&mut self) {
        let Some(metric) = self.selected_metric() else {
            return;
        };
        let message = match self.launcher.launch(metric, &LogOpener) {
            Some(url) => format!("Graph: {url}"),
            None => format!(
                "No graph for metric [{}]: no family and/or no labels",
                metric.display_name
            ),
        };
        self.status_line = Some(message);
    }

    // Types view

    pub fn selected_type_id(&self) -> Option<String> {
        let index = self.types_state.selected()?;
        self.catalog.filtered().get(index).map(|t| t.id.clone())
    }

    fn clamp_types_cursor(&mut self) {
        let count = self.catalog.filtered().len();
        match self.types_state.selected() {
            _ if count == 0 => self.types_state.select(None),
            Some(i) if i >= count => self.types_state.select(Some(count - 1)),
            None => self.types_state.select(Some(0)),
            Some(_) => {}
        }
    }

    // Backend results

    pub fn on_backend(&mut self, event: BackendEvent) -> Vec<Action> {
        let mut follow_up = Vec::new();
        match event {
            BackendEvent::Roots { ticket, result } => {
                if let Ok(Applied::Updated) =
                    self.tree.apply_roots(ticket, result, &self.notifier)
                {
                    self.last_refresh = Some(Local::now());
                    let count = self.tree.visible_rows().len();
                    self.tree_state
                        .select(if count == 0 { None } else { Some(0) });
                    self.focus = Focus::Tree;
                    self.select_current();
                }
            }
            BackendEvent::Children { ticket, result } => {
                if let Ok(Applied::Updated) =
                    self.tree.apply_children(ticket, result, &self.notifier)
                {
                    self.anchor_tree_cursor();
                }
            }
            BackendEvent::Types { ticket, result } => {
                if let Ok(Applied::Updated) =
                    self.catalog.apply_types(ticket, result, &self.notifier)
                {
                    self.clamp_types_cursor();
                }
            }
            BackendEvent::ResourceDeleted { resource, result } => match result {
                Ok(()) => {
                    self.status_line = Some(format!(
                        "Deleted resource {}. Press r to refresh.",
                        resource.label()
                    ));
                }
                Err(e) => report_error(&self.notifier, "Resources", &e),
            },
            BackendEvent::TypeDeleted { type_id, result } => match result {
                Ok(()) => {
                    self.status_line = Some(format!("Deleted resource type {type_id}"));
                    follow_up.push(Action::LoadTypes(self.catalog.begin_load()));
                }
                Err(e) => report_error(&self.notifier, "Types", &e),
            },
            BackendEvent::Status(result) => {
                self.connection = match result {
                    Ok(status) => ConnectionState::Connected(
                        status
                            .get("status")
                            .and_then(|v| v.as_str())
                            .unwrap_or("UP")
                            .to_string(),
                    ),
                    Err(e) => {
                        report_error(&self.notifier, "Status", &e);
                        ConnectionState::Error(e.to_string())
                    }
                };
            }
        }
        self.collect_toasts();
        follow_up
    }

    fn collect_toasts(&mut self) {
        let now = Instant::now();
        for message in self.notifier.drain() {
            self.toasts.push_back(Toast {
                message,
                raised: now,
            });
        }
    }

    /// Drop notifications older than the configured lifetime
    pub fn on_tick(&mut self) {
        let lifetime = self.toast_lifetime;
        self.toasts.retain(|t| t.raised.elapsed() < lifetime);
    }
}

fn step_index(current: Option<usize>, count: usize, delta: isize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let next = match current {
        None => 0,
        Some(i) if delta >= 0 => {
            if i + 1 >= count {
                0
            } else {
                i + 1
            }
        }
        Some(0) => count - 1,
        Some(i) => i - 1,
    };
    Some(next)
}

fn step_list(state: &mut ListState, count: usize, delta: isize) {
    let next = step_index(state.selected(), count, delta);
    state.select(next);
}

fn step_table(state: &mut TableState, count: usize, delta: isize) {
    let next = step_index(state.selected(), count, delta);
    state.select(next);
}
