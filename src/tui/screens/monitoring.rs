use crate::app::{App, AppMode, Source};
use crate::metrics::store::StoreSnapshot;
use crate::tui::views::{
    fps::FpsView, long_tasks::LongTasksView, marks::MarksView, memory::MemoryView,
};
use crate::tui::widgets::{
    help_overlay::HelpOverlay, mark_input::MarkInput, message_popup::MessagePopup,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct MonitoringScreen;

impl MonitoringScreen {
    pub fn render(frame: &mut Frame, app: &App, snapshot: &StoreSnapshot) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        Self::render_header(frame, chunks[0], app);
        Self::render_content(frame, chunks[1], app, snapshot);
        Self::render_footer(frame, chunks[2], app);

        match &app.mode {
            AppMode::Help => HelpOverlay::render(frame, area, &app.theme),
            AppMode::MarkInput => MarkInput::render(frame, chunks[1], &app.mark_text, &app.theme),
            AppMode::Message(message) => MessagePopup::render(frame, area, message, &app.theme),
            AppMode::Normal => {}
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let (state, state_color) = match (app.source, app.collecting) {
            (Source::Replay, _) => ("REPLAY", theme.warning()),
            (Source::Live, true) => ("RECORDING", theme.success()),
            (Source::Live, false) => ("PAUSED", theme.text_dim()),
        };

        let pan = if app.pan_offset_secs > 0 {
            format!(" │ -{}s", app.pan_offset_secs)
        } else {
            String::new()
        };
        let saved = if app.has_saved_session { " │ saved" } else { "" };

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", state),
                Style::default().fg(state_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "│ {} │ every {} ms │ window {}s{}{}",
                    app.source_label, app.interval_ms, app.window_secs, pan, saved
                ),
                Style::default().fg(theme.primary()),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border()))
                .title("Performance"),
        );

        frame.render_widget(header, area);
    }

    fn render_content(frame: &mut Frame, area: Rect, app: &App, snapshot: &StoreSnapshot) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        MemoryView::render(frame, rows[0], snapshot, app);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);

        FpsView::render(frame, bottom[0], snapshot, app);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3)])
            .split(bottom[1]);

        LongTasksView::render(frame, side[0], snapshot, app);
        MarksView::render(frame, side[1], snapshot, app);
    }

    fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
        let footer_text = match (&app.mode, app.source) {
            (AppMode::MarkInput, _) => "Type a label | Enter: Add | Esc: Cancel",
            (_, Source::Live) => {
                "Space: Start/Stop | m: Mark | e: Export | s/r/x: Save/Restore/Delete | +/-: Window | ←/→: Pan | q: Quit | ?: Help"
            }
            (_, Source::Replay) => {
                "+/-: Window | ←/→: Pan | 0: Latest | h: Heap | e: Export | q: Quit | ?: Help"
            }
        };

        let footer = Paragraph::new(footer_text)
            .style(Style::default().fg(app.theme.text_dim()))
            .block(Block::default().borders(Borders::ALL).title("Controls"));

        frame.render_widget(footer, area);
    }
}
