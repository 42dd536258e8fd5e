use crate::app::App;
use crate::metrics::store::StoreSnapshot;
use crate::metrics::window::window_slice;
use crate::session::{Sample, SeriesKind};
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct LongTasksView;

impl LongTasksView {
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &StoreSnapshot, app: &App) {
        let theme = &app.theme;
        let events = window_slice(
            snapshot.series(SeriesKind::LongTaskMs),
            app.window_ms(),
            app.pan_offset_ms(),
        );

        let mut lines = vec![Line::from(vec![
            Span::styled("Long Tasks: ", Style::default().fg(theme.text_dim())),
            Span::styled(
                summary(events, app.window_secs),
                Style::default()
                    .fg(theme.long_task())
                    .add_modifier(Modifier::BOLD),
            ),
        ])];

        if let Some(longest) = longest(events) {
            lines.push(Line::from(vec![
                Span::styled("Longest: ", Style::default().fg(theme.text_dim())),
                Span::raw(format!("{:.0} ms", longest)),
            ]));
        }

        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Long Tasks"));
        frame.render_widget(paragraph, area);
    }
}

pub fn summary(events: &[Sample], window_secs: u64) -> String {
    format!("{} events in {}s window", events.len(), window_secs)
}

fn longest(events: &[Sample]) -> Option<f64> {
    events.iter().map(|s| s.value).reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_events() {
        let events = vec![Sample::new(1_000, 120.0), Sample::new(2_000, 95.0)];
        assert_eq!(summary(&events, 30), "2 events in 30s window");
        assert_eq!(summary(&[], 5), "0 events in 5s window");
        assert_eq!(longest(&events), Some(120.0));
        assert_eq!(longest(&[]), None);
    }
}
