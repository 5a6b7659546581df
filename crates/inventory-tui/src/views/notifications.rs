//! Error toasts and the delete confirmation dialog

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{PendingDelete, Toast};

pub struct NotificationsView;

impl NotificationsView {
    /// Stack toasts in the top-right corner, newest at the bottom
    pub fn render_toasts<'a>(
        frame: &mut Frame,
        area: Rect,
        toasts: impl DoubleEndedIterator<Item = &'a Toast>,
    ) {
        let width = area.width.min(60);
        let mut y = area.y + 1;
        for toast in toasts.rev().take(4).collect::<Vec<_>>().into_iter().rev() {
            let height = 4;
            if y + height > area.bottom() {
                break;
            }
            let rect = Rect::new(area.right().saturating_sub(width + 1), y, width, height);
            let paragraph = Paragraph::new(toast.message.as_str())
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::White))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red))
                        .title(" Error "),
                );
            frame.render_widget(Clear, rect);
            frame.render_widget(paragraph, rect);
            y += height;
        }
    }

    pub fn render_confirm(frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let [row] = Layout::vertical([Constraint::Length(5)])
            .flex(Flex::Center)
            .areas(area);
        let [rect] = Layout::horizontal([Constraint::Length(60.min(area.width))])
            .flex(Flex::Center)
            .areas(row);

        let text = format!("{}\n\n y: delete   n/Esc: cancel", pending.prompt());
        let dialog = Paragraph::new(text).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(" Confirm "),
        );
        frame.render_widget(Clear, rect);
        frame.render_widget(dialog, rect);
    }
}
