use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = centered_rect(70, 90, area);

        frame.render_widget(Clear, popup_area);

        let outer_block = Block::default()
            .title(" Help - Press ? or Esc to close ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.background()));

        frame.render_widget(outer_block, popup_area);

        let inner_area = popup_area.inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: 1,
        });

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(7),
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Min(0),
            ])
            .split(inner_area);

        Self::render_section(
            frame,
            sections[0],
            "Global",
            vec![
                ("q", "Quit"),
                ("?", "Toggle this help screen"),
                ("Space", "Start / stop collecting"),
            ],
            theme,
        );

        Self::render_section(
            frame,
            sections[1],
            "Timeline",
            vec![
                ("+ / -", "Widen / narrow the view window"),
                ("← / →", "Pan back / forward in time"),
                ("0", "Jump back to live data"),
                ("[ / ]", "Faster / slower sampling interval"),
                ("h", "Show / hide the heap series"),
            ],
            theme,
        );

        Self::render_section(
            frame,
            sections[2],
            "Data",
            vec![
                ("c", "Clear all samples and marks"),
                ("m", "Add a labelled mark"),
                ("e", "Export the session to a file"),
            ],
            theme,
        );

        Self::render_section(
            frame,
            sections[3],
            "Saved Session",
            vec![
                ("s", "Save the session"),
                ("r", "Restore the saved session"),
                ("x", "Delete the saved session"),
                ("Enter", "Confirm a mark label"),
                ("Esc", "Cancel a mark label / close popup"),
            ],
            theme,
        );

        let about_text = concat!(
            "perf-visualizer v",
            env!("CARGO_PKG_VERSION"),
            "\nMemory, frame-rate and long-task timelines in the terminal."
        );

        let about = Paragraph::new(about_text)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(" About ")
                    .border_style(Style::default().fg(theme.border())),
            )
            .style(Style::default().fg(theme.text_dim()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(about, sections[4]);
    }

    fn render_section(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        keybindings: Vec<(&str, &str)>,
        theme: &Theme,
    ) {
        let rows: Vec<Row> = keybindings
            .iter()
            .map(|(key, desc)| {
                Row::new(vec![
                    Cell::from(*key).style(Style::default().fg(theme.highlight()).bold()),
                    Cell::from(*desc).style(Style::default().fg(theme.text())),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(10), Constraint::Percentage(85)])
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(format!(" {} ", title))
                    .border_style(Style::default().fg(theme.border())),
            )
            .column_spacing(2);

        frame.render_widget(table, area);
    }
}
