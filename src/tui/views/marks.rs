use crate::app::App;
use crate::metrics::store::StoreSnapshot;
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, Borders, List, ListItem},
};

pub struct MarksView;

impl MarksView {
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &StoreSnapshot, app: &App) {
        let theme = &app.theme;
        let visible = area.height.saturating_sub(2) as usize;

        let items: Vec<ListItem> = if snapshot.marks.is_empty() {
            vec![ListItem::new(Span::styled(
                "No marks yet (press m to add one)",
                Style::default().fg(theme.text_dim()),
            ))]
        } else {
            snapshot
                .marks
                .iter()
                .rev()
                .take(visible.max(1))
                .map(|mark| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{} ", format_time(mark.timestamp)),
                            Style::default().fg(theme.text_dim()),
                        ),
                        Span::styled(mark.label.clone(), Style::default().fg(theme.mark())),
                    ]))
                })
                .collect()
        };

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Marks ({})", snapshot.marks.len())),
        );
        frame.render_widget(list, area);
    }
}

fn format_time(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}
