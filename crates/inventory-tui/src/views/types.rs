//! Resource type list view

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::app::App;

pub struct TypesView;

impl TypesView {
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // Table
                Constraint::Length(1), // Filter line
            ])
            .split(area);

        Self::render_table(frame, chunks[0], app);
        Self::render_filter(frame, chunks[1], app);
    }

    fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
        let header = Row::new(vec![
            Cell::from("ID").style(Style::default().bold()),
            Cell::from("Operations").style(Style::default().bold()),
            Cell::from("Metadata").style(Style::default().bold()),
        ])
        .height(1);

        let rows: Vec<Row> = app
            .catalog
            .filtered()
            .iter()
            .map(|t| {
                let operations = t
                    .operations
                    .iter()
                    .map(|o| o.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Row::new(vec![
                    Cell::from(t.id.clone()),
                    Cell::from(if operations.is_empty() {
                        "-".to_string()
                    } else {
                        operations
                    }),
                    Cell::from(t.metadata_len().to_string()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(40),
            Constraint::Min(20),
            Constraint::Length(10),
        ];

        let title = if app.catalog.is_loading() {
            " Types (loading...) ".to_string()
        } else {
            format!(
                " Types ({}/{}) ",
                app.catalog.filtered().len(),
                app.catalog.all().len()
            )
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        frame.render_stateful_widget(table, area, &mut app.types_state);
    }

    fn render_filter(frame: &mut Frame, area: Rect, app: &App) {
        let case = if app.ignore_case { "ignore case" } else { "match case" };
        let text = match &app.filter_input {
            Some(input) => format!(" Filter: {input}_ ({case}) | Enter/Esc: done "),
            None => format!(
                " Filter: {} ({case}) | /: edit | i: toggle case | d: delete ",
                app.catalog.filter().name.as_deref().unwrap_or("")
            ),
        };
        let style = if app.filter_input.is_some() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(Paragraph::new(text).style(style), area);
    }
}
