//! Terminal setup and the frame layout

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::{self, Stdout, stdout};

use crate::app::{ActiveView, App};
use crate::event::ConnectionState;
use crate::views::{NotificationsView, ResourceDetailView, ResourceTreeView, TypesView};

/// Terminal UI wrapper
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Enter the TUI mode (raw mode, alternate screen)
    pub fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Exit the TUI mode and restore terminal state
    pub fn exit(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    /// Draw one frame of the application
    pub fn draw(&mut self, app: &mut App) -> io::Result<()> {
        self.terminal.draw(|frame| render(frame, app))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        // Attempt to restore terminal state on drop
        let _ = self.exit();
    }
}

/// Render header, body and footer, then overlays
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Body
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Key help
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    match app.view {
        ActiveView::Resources => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(chunks[1]);
            ResourceTreeView::render(frame, body[0], app);
            ResourceDetailView::render(frame, body[1], app);
        }
        ActiveView::Types => TypesView::render(frame, chunks[1], app),
    }
    render_status(frame, chunks[2], app);
    render_help(frame, chunks[3], app);

    NotificationsView::render_toasts(frame, area, app.toasts.iter());
    if let Some(pending) = &app.pending_delete {
        NotificationsView::render_confirm(frame, area, pending);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let (connection, style) = match &app.connection {
        ConnectionState::Unknown => ("checking...".to_string(), Style::default().fg(Color::DarkGray)),
        ConnectionState::Connected(status) => (status.clone(), Style::default().fg(Color::Green)),
        ConnectionState::Error(_) => ("unreachable".to_string(), Style::default().fg(Color::Red)),
    };
    let tab = |view: ActiveView, label: &'static str| {
        if app.view == view {
            Span::styled(label, Style::default().fg(Color::Cyan).bold())
        } else {
            Span::raw(label)
        }
    };
    let refreshed = app
        .last_refresh
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());

    let header = Paragraph::new(Line::from(vec![
        tab(ActiveView::Resources, " Resources "),
        Span::raw("|"),
        tab(ActiveView::Types, " Types "),
        Span::raw(format!("   {}  ", app.server_url)),
        Span::styled(format!("[{connection}]"), style),
        Span::raw(format!("  refreshed {refreshed}")),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Inventory "));
    frame.render_widget(header, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let text = app.status_line.clone().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(format!(" {text}")).style(Style::default().fg(Color::Cyan)),
        area,
    );
}

fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.view {
        ActiveView::Resources => {
            " q: quit | Tab: types | r: refresh | s: status | j/k: move | Enter/l: expand | h: collapse | m: metrics | d: delete "
        }
        ActiveView::Types => " q: quit | Tab: resources | r: refresh | s: status | j/k: move ",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
