use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crate::error::{AppError, Result};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn tui_error(action: &str) -> impl FnOnce(io::Error) -> AppError + '_ {
    move |e| AppError::Tui(format!("{}: {}", action, e))
}

pub fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(tui_error("cannot enable raw mode"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(tui_error("cannot enter alternate screen"))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(tui_error("cannot create terminal"))
}

pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(tui_error("cannot disable raw mode"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(tui_error("cannot leave alternate screen"))?;
    terminal
        .show_cursor()
        .map_err(tui_error("cannot show cursor"))?;
    Ok(())
}
