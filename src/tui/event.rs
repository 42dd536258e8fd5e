use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Quit,
    Help,
    ToggleCollecting,
    ClearData,
    AddMark,
    Export,
    SaveSession,
    RestoreSession,
    ClearSavedSession,
    WidenWindow,
    NarrowWindow,
    PanBack,
    PanForward,
    ResetPan,
    FasterInterval,
    SlowerInterval,
    ToggleHeap,
    Escape,
    Enter,
    Backspace,
    Char(char),
    None,
}

/// How keys are read: as commands, or as text for the mark label prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Command,
    Text,
}

pub fn poll_event(timeout: Duration, mode: InputMode) -> std::io::Result<Event> {
    if event::poll(timeout)? {
        if let CrosstermEvent::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(map_key_event(key, mode));
            }
        }
    }
    Ok(Event::None)
}

pub fn map_key_event(key: KeyEvent, mode: InputMode) -> Event {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return Event::Quit;
    }

    match mode {
        InputMode::Text => match key.code {
            KeyCode::Esc => Event::Escape,
            KeyCode::Enter => Event::Enter,
            KeyCode::Backspace => Event::Backspace,
            KeyCode::Char(c) => Event::Char(c),
            _ => Event::None,
        },
        InputMode::Command => match key.code {
            KeyCode::Char('q') => Event::Quit,
            KeyCode::Char('?') => Event::Help,
            KeyCode::Char(' ') => Event::ToggleCollecting,
            KeyCode::Char('c') => Event::ClearData,
            KeyCode::Char('m') => Event::AddMark,
            KeyCode::Char('e') => Event::Export,
            KeyCode::Char('s') => Event::SaveSession,
            KeyCode::Char('r') => Event::RestoreSession,
            KeyCode::Char('x') => Event::ClearSavedSession,
            KeyCode::Char('+') | KeyCode::Char('=') => Event::WidenWindow,
            KeyCode::Char('-') => Event::NarrowWindow,
            KeyCode::Left => Event::PanBack,
            KeyCode::Right => Event::PanForward,
            KeyCode::Char('0') => Event::ResetPan,
            KeyCode::Char('[') => Event::FasterInterval,
            KeyCode::Char(']') => Event::SlowerInterval,
            KeyCode::Char('h') => Event::ToggleHeap,
            KeyCode::Esc => Event::Escape,
            KeyCode::Enter => Event::Enter,
            _ => Event::None,
        },
    }
}
