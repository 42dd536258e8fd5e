use crate::app::App;
use crate::metrics::store::StoreSnapshot;
use crate::metrics::window::{merge_series, window_slice};
use crate::session::{Sample, SeriesKind};
use crate::tui::views::{chart_points, time_bounds, value_bounds, BYTES_PER_MB};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

pub struct MemoryView;

impl MemoryView {
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &StoreSnapshot, app: &App) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(area);

        Self::render_chart(frame, chunks[0], snapshot, app);
        Self::render_alerts(frame, chunks[1], snapshot, app);
    }

    fn render_chart(frame: &mut Frame, area: Rect, snapshot: &StoreSnapshot, app: &App) {
        let theme = &app.theme;
        let memory = window_slice(
            snapshot.series(SeriesKind::MemoryBytes),
            app.window_ms(),
            app.pan_offset_ms(),
        );
        let heap: &[Sample] = if app.show_heap {
            window_slice(
                snapshot.series(SeriesKind::HeapBytes),
                app.window_ms(),
                app.pan_offset_ms(),
            )
        } else {
            &[]
        };

        let combined = merge_series(memory, heap);
        let Some(origin) = combined.first().map(|s| s.timestamp) else {
            let placeholder = Paragraph::new("Waiting for memory samples...")
                .block(Block::default().borders(Borders::ALL).title("Memory"))
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let memory_points = chart_points(memory, origin, BYTES_PER_MB);
        let heap_points = chart_points(heap, origin, BYTES_PER_MB);
        let all_points = chart_points(&combined, origin, BYTES_PER_MB);
        let x_bounds = time_bounds(&all_points);
        let y_bounds = value_bounds(&all_points);

        let title = match (memory.last(), heap.last()) {
            (Some(m), Some(h)) => format!(
                "Memory (MB) - {:.2} allocated, {:.2} heap",
                m.value / BYTES_PER_MB,
                h.value / BYTES_PER_MB
            ),
            (Some(m), None) => format!("Memory (MB) - {:.2}", m.value / BYTES_PER_MB),
            (None, Some(h)) => format!("Heap (MB) - {:.2}", h.value / BYTES_PER_MB),
            (None, None) => "Memory (MB)".to_string(),
        };

        let mut datasets = vec![Dataset::default()
            .name("memory")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.memory_line()))
            .data(&memory_points)];
        if !heap_points.is_empty() {
            datasets.push(
                Dataset::default()
                    .name("heap")
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(theme.heap_line()))
                    .data(&heap_points),
            );
        }

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(title))
            .x_axis(
                Axis::default()
                    .title("s")
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds(x_bounds)
                    .labels(vec![
                        Span::raw(format!("{:.0}", x_bounds[0])),
                        Span::raw(format!("{:.0}", x_bounds[1])),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("MB")
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds(y_bounds)
                    .labels(vec![
                        Span::raw(format!("{:.1}", y_bounds[0])),
                        Span::raw(format!("{:.1}", y_bounds[1])),
                    ]),
            );

        frame.render_widget(chart, area);
    }

    fn render_alerts(frame: &mut Frame, area: Rect, snapshot: &StoreSnapshot, app: &App) {
        let theme = &app.theme;
        let alerts = app
            .trend
            .evaluate_window(snapshot.series(SeriesKind::MemoryBytes), app.window_ms());

        let mut messages = Vec::new();
        if alerts.upward_trend {
            messages.push("Alert: upward memory trend detected");
        }
        if alerts.sudden_spike {
            messages.push("Alert: sudden memory spike detected");
        }

        let (text, color) = if messages.is_empty() {
            ("No memory alerts".to_string(), theme.success())
        } else {
            (messages.join(" │ "), theme.error())
        };

        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL).title("Alerts"));

        frame.render_widget(paragraph, area);
    }
}
