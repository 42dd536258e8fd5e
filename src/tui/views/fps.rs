use crate::app::App;
use crate::metrics::store::StoreSnapshot;
use crate::metrics::window::window_slice;
use crate::session::SeriesKind;
use crate::tui::views::{chart_points, time_bounds};
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

/// Below this the FPS line is drawn in the warning colour.
pub const LOW_FPS: f64 = 30.0;

pub struct FpsView;

impl FpsView {
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &StoreSnapshot, app: &App) {
        let theme = &app.theme;
        let samples = window_slice(
            snapshot.series(SeriesKind::FpsEstimate),
            app.window_ms(),
            app.pan_offset_ms(),
        );

        let Some(first) = samples.first() else {
            let placeholder = Paragraph::new("Waiting for frame data...")
                .block(Block::default().borders(Borders::ALL).title("FPS"))
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        };

        let points = chart_points(samples, first.timestamp, 1.0);
        let x_bounds = time_bounds(&points);
        let peak = points.iter().map(|&(_, y)| y).fold(60.0_f64, f64::max);
        let y_bounds = [0.0, peak.ceil()];

        let current = samples.last().map(|s| s.value).unwrap_or(0.0);
        let color = if current < LOW_FPS {
            theme.fps_low()
        } else {
            theme.fps_line()
        };

        let datasets = vec![Dataset::default()
            .name("fps")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&points)];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("FPS - {:.1}", current)),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds(x_bounds),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds(y_bounds)
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", y_bounds[1])),
                    ]),
            );

        frame.render_widget(chart, area);
    }
}
