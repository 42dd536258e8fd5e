use ratatui::style::Color;

#[derive(Debug, Clone, Copy, Default)]
pub struct Theme;

impl Theme {
    pub fn primary(&self) -> Color {
        Color::Cyan
    }

    pub fn text(&self) -> Color {
        Color::Reset
    }

    pub fn text_dim(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn background(&self) -> Color {
        Color::Reset
    }

    pub fn success(&self) -> Color {
        Color::Green
    }

    pub fn warning(&self) -> Color {
        Color::Yellow
    }

    pub fn error(&self) -> Color {
        Color::Red
    }

    pub fn border(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn border_focused(&self) -> Color {
        Color::Cyan
    }

    pub fn highlight(&self) -> Color {
        Color::Yellow
    }

    pub fn memory_line(&self) -> Color {
        Color::Cyan
    }

    pub fn heap_line(&self) -> Color {
        Color::Magenta
    }

    pub fn fps_line(&self) -> Color {
        Color::Green
    }

    pub fn fps_low(&self) -> Color {
        Color::Red
    }

    pub fn long_task(&self) -> Color {
        Color::Yellow
    }

    pub fn mark(&self) -> Color {
        Color::Blue
    }
}
