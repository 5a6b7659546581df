//! Detail pane for the selected resource

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Focus};

pub struct ResourceDetailView;

impl ResourceDetailView {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(60), // JSON
                Constraint::Percentage(40), // Metrics
            ])
            .split(area);

        let detail = app.tree.detail();
        let json = Paragraph::new(detail.json.clone())
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(" Detail "));
        frame.render_widget(json, chunks[0]);

        let items: Vec<ListItem> = detail
            .metrics
            .iter()
            .map(|m| {
                let family = m.family.as_deref().unwrap_or("-");
                ListItem::new(format!("{}  ({})", m.display_name, family))
            })
            .collect();

        let border_style = if app.focus == Focus::Metrics {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(" Metrics (m: focus, g: graph) "),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(list, chunks[1], &mut app.metrics_state);
    }
}
