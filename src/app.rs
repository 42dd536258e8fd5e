use crate::metrics::trend::TrendConfig;
use crate::metrics::window::{clamp_window_secs, MAX_WINDOW_SECS};
use crate::theme::Theme;

pub const WINDOW_STEP_SECS: u64 = 5;
pub const PAN_STEP_SECS: u64 = 5;
pub const INTERVAL_STEP_MS: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Sampling a live process.
    Live,
    /// Replaying an imported session.
    Replay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    MarkInput,
    Message(String),
}

pub struct App {
    pub should_quit: bool,
    pub mode: AppMode,
    pub source: Source,
    pub source_label: String,
    pub collecting: bool,
    pub interval_ms: u64,
    pub started_at: i64,
    pub window_secs: u64,
    pub pan_offset_secs: u64,
    pub show_heap: bool,
    pub has_saved_session: bool,
    pub mark_text: String,
    pub trend: TrendConfig,
    pub theme: Theme,
}

impl App {
    pub fn new(source: Source, source_label: String, trend: TrendConfig) -> Self {
        Self {
            should_quit: false,
            mode: AppMode::Normal,
            source,
            source_label,
            collecting: false,
            interval_ms: 500,
            started_at: 0,
            window_secs: clamp_window_secs(trend.window_secs),
            pan_offset_secs: 0,
            show_heap: true,
            has_saved_session: false,
            mark_text: String::new(),
            trend,
            theme: Theme,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn window_ms(&self) -> i64 {
        self.window_secs as i64 * 1000
    }

    pub fn pan_offset_ms(&self) -> i64 {
        self.pan_offset_secs as i64 * 1000
    }

    pub fn widen_window(&mut self) {
        self.window_secs = clamp_window_secs(self.window_secs.saturating_add(WINDOW_STEP_SECS));
    }

    pub fn narrow_window(&mut self) {
        self.window_secs = clamp_window_secs(self.window_secs.saturating_sub(WINDOW_STEP_SECS));
    }

    pub fn pan_back(&mut self) {
        self.pan_offset_secs = self
            .pan_offset_secs
            .saturating_add(PAN_STEP_SECS)
            .min(MAX_WINDOW_SECS * 10);
    }

    pub fn pan_forward(&mut self) {
        self.pan_offset_secs = self.pan_offset_secs.saturating_sub(PAN_STEP_SECS);
    }

    pub fn reset_pan(&mut self) {
        self.pan_offset_secs = 0;
    }

    pub fn toggle_heap(&mut self) {
        self.show_heap = !self.show_heap;
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            AppMode::Help => AppMode::Normal,
            _ => AppMode::Help,
        };
    }

    pub fn start_mark_input(&mut self) {
        self.mode = AppMode::MarkInput;
        self.mark_text.clear();
    }

    pub fn cancel_mark_input(&mut self) {
        self.mode = AppMode::Normal;
        self.mark_text.clear();
    }

    pub fn push_mark_char(&mut self, c: char) {
        self.mark_text.push(c);
    }

    pub fn pop_mark_char(&mut self) {
        self.mark_text.pop();
    }

    /// Leaves mark input and returns the label, unless it is blank.
    pub fn take_mark_label(&mut self) -> Option<String> {
        self.mode = AppMode::Normal;
        let label = std::mem::take(&mut self.mark_text);
        let trimmed = label.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.mode = AppMode::Message(message.into());
    }

    pub fn dismiss_message(&mut self) {
        if matches!(self.mode, AppMode::Message(_)) {
            self.mode = AppMode::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Source::Live, "test".to_string(), TrendConfig::default())
    }

    #[test]
    fn test_window_is_clamped() {
        let mut app = app();
        assert_eq!(app.window_secs, 30);

        for _ in 0..10 {
            app.narrow_window();
        }
        assert_eq!(app.window_secs, 5);

        for _ in 0..200 {
            app.widen_window();
        }
        assert_eq!(app.window_secs, 600);
        assert_eq!(app.window_ms(), 600_000);
    }

    #[test]
    fn test_pan_never_goes_negative() {
        let mut app = app();
        app.pan_forward();
        assert_eq!(app.pan_offset_secs, 0);

        app.pan_back();
        app.pan_back();
        assert_eq!(app.pan_offset_ms(), 10_000);

        app.pan_forward();
        assert_eq!(app.pan_offset_secs, 5);

        app.reset_pan();
        assert_eq!(app.pan_offset_secs, 0);
    }

    #[test]
    fn test_mark_input_flow() {
        let mut app = app();
        app.start_mark_input();
        assert_eq!(app.mode, AppMode::MarkInput);

        for c in " gc!".chars() {
            app.push_mark_char(c);
        }
        app.pop_mark_char();
        assert_eq!(app.take_mark_label().as_deref(), Some("gc"));
        assert_eq!(app.mode, AppMode::Normal);

        app.start_mark_input();
        app.push_mark_char(' ');
        assert_eq!(app.take_mark_label(), None);
    }

    #[test]
    fn test_help_and_message_modes() {
        let mut app = app();
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Help);
        app.toggle_help();
        assert_eq!(app.mode, AppMode::Normal);

        app.show_message("saved");
        app.dismiss_message();
        assert_eq!(app.mode, AppMode::Normal);
    }
}
