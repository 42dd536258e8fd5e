use crate::app::{App, AppMode, Source, INTERVAL_STEP_MS};
use crate::error::Result;
use crate::export;
use crate::metrics::collector::MetricsCollector;
use crate::metrics::store::{SeriesStore, StoreSnapshot};
use crate::session::storage::SessionSlot;
use crate::session::{codec, Session};
use crate::tui::event::{Event, InputMode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Ties the interactive state to the store, the collector and the saved
/// session slot. Every key press ends up in [`Controller::handle_event`].
pub struct Controller {
    pub app: App,
    store: Arc<RwLock<SeriesStore>>,
    collector: Option<MetricsCollector>,
    slot: Box<dyn SessionSlot>,
    export_dir: Option<String>,
}

impl Controller {
    /// `collector` is `None` when replaying a file.
    pub fn new(
        mut app: App,
        store: Arc<RwLock<SeriesStore>>,
        collector: Option<MetricsCollector>,
        slot: Box<dyn SessionSlot>,
        export_dir: Option<String>,
    ) -> Self {
        app.has_saved_session = slot.exists();
        if let Some(collector) = &collector {
            app.interval_ms = collector.interval().as_millis() as u64;
        }
        Self {
            app,
            store,
            collector,
            slot,
            export_dir,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match self.app.mode {
            AppMode::MarkInput => InputMode::Text,
            _ => InputMode::Command,
        }
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.store.read().await.snapshot()
    }

    fn now_millis(&self) -> i64 {
        match &self.collector {
            Some(collector) => collector.now_millis(),
            None => chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn start_collecting(&mut self) {
        let now = self.now_millis();
        if let Some(collector) = self.collector.as_mut() {
            if !collector.is_running() {
                collector.start();
                if self.app.started_at == 0 {
                    self.app.started_at = now;
                }
            }
            self.app.collecting = true;
        }
    }

    pub async fn stop_collecting(&mut self) {
        if let Some(collector) = self.collector.as_mut() {
            collector.stop().await;
        }
        self.app.collecting = false;
    }

    pub async fn handle_event(&mut self, event: Event) {
        match self.app.mode.clone() {
            AppMode::Help => match event {
                Event::Help | Event::Escape | Event::Quit => self.app.toggle_help(),
                _ => {}
            },
            AppMode::Message(_) => match event {
                Event::Enter | Event::Escape | Event::Quit => self.app.dismiss_message(),
                _ => {}
            },
            AppMode::MarkInput => match event {
                Event::Quit => self.app.quit(),
                Event::Escape => self.app.cancel_mark_input(),
                Event::Backspace => self.app.pop_mark_char(),
                Event::Char(c) => self.app.push_mark_char(c),
                Event::Enter => {
                    if let Some(label) = self.app.take_mark_label() {
                        self.add_mark(label).await;
                    }
                }
                _ => {}
            },
            AppMode::Normal => self.handle_command(event).await,
        }
    }

    async fn handle_command(&mut self, event: Event) {
        match event {
            Event::Quit => self.app.quit(),
            Event::Help => self.app.toggle_help(),
            Event::ToggleCollecting => {
                if self.app.collecting {
                    self.stop_collecting().await;
                } else {
                    self.start_collecting();
                }
            }
            Event::ClearData => self.clear_data().await,
            Event::AddMark => self.app.start_mark_input(),
            Event::Export => match self.export_file().await {
                Ok(path) => self
                    .app
                    .show_message(format!("Exported to {}", path.display())),
                Err(e) => self.app.show_message(format!("Export failed: {}", e)),
            },
            Event::SaveSession => match self.save_session().await {
                Ok(()) => self.app.show_message("Session saved"),
                Err(e) => self.app.show_message(format!("Save failed: {}", e)),
            },
            Event::RestoreSession => match self.restore_session().await {
                Ok(true) => self.app.show_message("Session restored"),
                Ok(false) => self.app.show_message("No saved session"),
                Err(e) => self.app.show_message(format!("Restore failed: {}", e)),
            },
            Event::ClearSavedSession => match self.clear_saved_session() {
                Ok(()) => self.app.show_message("Saved session deleted"),
                Err(e) => self.app.show_message(format!("Delete failed: {}", e)),
            },
            Event::WidenWindow => self.app.widen_window(),
            Event::NarrowWindow => self.app.narrow_window(),
            Event::PanBack => self.app.pan_back(),
            Event::PanForward => self.app.pan_forward(),
            Event::ResetPan => self.app.reset_pan(),
            Event::FasterInterval => {
                self.change_interval(self.app.interval_ms.saturating_sub(INTERVAL_STEP_MS))
            }
            Event::SlowerInterval => {
                self.change_interval(self.app.interval_ms.saturating_add(INTERVAL_STEP_MS))
            }
            Event::ToggleHeap => self.app.toggle_heap(),
            Event::Escape | Event::Enter | Event::Backspace | Event::Char(_) | Event::None => {}
        }
    }

    pub async fn add_mark(&mut self, label: String) {
        let now = self.now_millis();
        self.store.write().await.add_mark(now, label);
    }

    fn change_interval(&mut self, interval_ms: u64) {
        if let Some(collector) = &self.collector {
            let applied = collector.set_interval(Duration::from_millis(interval_ms));
            self.app.interval_ms = applied.as_millis() as u64;
        }
    }

    pub async fn export_text(&self) -> String {
        let snapshot = self.snapshot().await;
        codec::export(self.app.started_at, self.app.interval_ms, &snapshot)
    }

    pub async fn export_file(&self) -> Result<PathBuf> {
        let text = self.export_text().await;
        export::export_session_file(&text, self.export_dir.as_deref())
    }

    pub async fn save_session(&mut self) -> Result<()> {
        let text = self.export_text().await;
        self.slot.set(&text)?;
        self.app.has_saved_session = true;
        Ok(())
    }

    /// Loads the saved slot. `Ok(false)` when there is nothing usable in it;
    /// the current data is then left alone.
    pub async fn restore_session(&mut self) -> Result<bool> {
        let Some(session) = self.slot.get()?.as_deref().and_then(codec::import) else {
            tracing::debug!("saved session slot empty or unreadable");
            return Ok(false);
        };
        self.load_session(&session).await;
        Ok(true)
    }

    /// Replaces the store contents with `session`, pausing the collector
    /// around the load.
    pub async fn load_session(&mut self, session: &Session) {
        let was_collecting = self.app.collecting;
        self.stop_collecting().await;

        self.store.write().await.load_session(session);
        self.app.started_at = session.started_at;
        self.app.reset_pan();
        if self.collector.is_none() {
            self.app.interval_ms = session.interval_ms;
        }

        if was_collecting {
            self.start_collecting();
        }
    }

    pub fn clear_saved_session(&mut self) -> Result<()> {
        self.slot.remove()?;
        self.app.has_saved_session = false;
        Ok(())
    }

    pub async fn clear_data(&mut self) {
        let was_collecting = self.app.collecting;
        self.stop_collecting().await;

        self.store.write().await.clear();
        self.app.reset_pan();
        self.app.started_at = if self.app.source == Source::Live {
            self.now_millis()
        } else {
            0
        };

        if was_collecting {
            self.start_collecting();
        }
    }

    pub async fn shutdown(&mut self) {
        self.stop_collecting().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::trend::TrendConfig;
    use crate::session::storage::MemorySessionSlot;
    use crate::session::SeriesKind;
    use pretty_assertions::assert_eq;

    fn replay_controller(slot: MemorySessionSlot) -> Controller {
        let store = Arc::new(RwLock::new(SeriesStore::new(10).unwrap()));
        let app = App::new(Source::Replay, "test".to_string(), TrendConfig::default());
        Controller::new(app, store, None, Box::new(slot), None)
    }

    #[tokio::test]
    async fn test_restore_without_saved_session_keeps_data() {
        let mut controller = replay_controller(MemorySessionSlot::new());
        controller
            .store
            .write()
            .await
            .record(SeriesKind::MemoryBytes, 1, 100.0);

        controller.handle_event(Event::RestoreSession).await;

        assert_eq!(controller.app.mode, AppMode::Message("No saved session".to_string()));
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.series(SeriesKind::MemoryBytes).len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_saved_session_is_ignored() {
        let slot = MemorySessionSlot::new();
        slot.set("not a session").unwrap();
        let mut controller = replay_controller(slot);

        assert!(!controller.restore_session().await.unwrap());
    }

    #[tokio::test]
    async fn test_save_then_restore_replays_session() {
        let mut controller = replay_controller(MemorySessionSlot::new());
        controller.app.started_at = 1_000;
        {
            let mut store = controller.store.write().await;
            store.record(SeriesKind::MemoryBytes, 1_000, 1.0);
            store.record(SeriesKind::FpsEstimate, 1_016, 60.0);
        }
        controller.add_mark("gc \"full\"".to_string()).await;

        controller.handle_event(Event::SaveSession).await;
        assert!(controller.app.has_saved_session);
        controller.handle_event(Event::Enter).await;

        controller.clear_data().await;
        assert_eq!(controller.snapshot().await.marks.len(), 0);

        assert!(controller.restore_session().await.unwrap());
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.series(SeriesKind::MemoryBytes).len(), 1);
        assert_eq!(snapshot.series(SeriesKind::FpsEstimate)[0].value, 60.0);
        assert_eq!(snapshot.marks[0].label, "gc \"full\"");
        assert_eq!(controller.app.started_at, 1_000);

        controller.handle_event(Event::ClearSavedSession).await;
        assert!(!controller.app.has_saved_session);
    }

    #[tokio::test]
    async fn test_mark_input_adds_mark() {
        let mut controller = replay_controller(MemorySessionSlot::new());
        controller.handle_event(Event::AddMark).await;
        assert_eq!(controller.input_mode(), InputMode::Text);

        for c in "load".chars() {
            controller.handle_event(Event::Char(c)).await;
        }
        controller.handle_event(Event::Enter).await;

        assert_eq!(controller.input_mode(), InputMode::Command);
        let snapshot = controller.snapshot().await;
        assert_eq!(snapshot.marks.len(), 1);
        assert_eq!(snapshot.marks[0].label, "load");
    }

    #[tokio::test]
    async fn test_quit_from_normal_mode() {
        let mut controller = replay_controller(MemorySessionSlot::new());
        controller.handle_event(Event::Quit).await;
        assert!(controller.app.should_quit);
    }
}
