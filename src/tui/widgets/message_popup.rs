use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub struct MessagePopup;

impl MessagePopup {
    pub fn render(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Min(7),
                Constraint::Percentage(35),
            ])
            .split(area);

        let centered = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(60),
                Constraint::Percentage(20),
            ])
            .split(chunks[1])[1];

        frame.render_widget(Clear, centered);

        let block = Block::default()
            .title(" Message ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.background()));

        let inner_area = block.inner(centered);
        frame.render_widget(block, centered);

        let text = format!("{}\n\nPress Enter or Esc to continue", message);
        let widget = Paragraph::new(text)
            .style(Style::default().fg(theme.text()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(widget, inner_area);
    }
}
