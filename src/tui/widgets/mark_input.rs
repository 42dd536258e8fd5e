use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

pub struct MarkInput;

impl MarkInput {
    pub fn render(frame: &mut Frame, area: Rect, text: &str, theme: &Theme) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let input_area = chunks[1];
        frame.render_widget(Clear, input_area);

        let input = Paragraph::new(format!("Mark: {}_", text))
            .style(Style::default().fg(theme.highlight()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Enter: add mark | Esc: cancel ")
                    .border_style(Style::default().fg(theme.border_focused())),
            )
            .alignment(Alignment::Left);

        frame.render_widget(input, input_area);
    }
}
