//! Terminal User Interface
//!
//! A single-screen hacker terminal built on ratatui: transcript on the left,
//! player meters on the right, prompt at the bottom.

pub mod app;
pub mod widgets;

pub use app::App;

use crate::data::Category;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};

/// Color scheme for the terminal
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub alert: Color,
    pub success: Color,
    pub warning: Color,
    pub info: Color,
    pub border: Color,
    pub prompt: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            accent: Color::Cyan,
            alert: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            info: Color::Gray,
            border: Color::DarkGray,
            prompt: Color::LightGreen,
        }
    }
}

impl Theme {
    /// Color for a transcript line
    pub fn category_color(&self, category: Category) -> Color {
        match category {
            Category::Info => self.info,
            Category::Success => self.success,
            Category::Error => self.alert,
            Category::Warning => self.warning,
            Category::System => self.accent,
        }
    }

    pub fn category_style(&self, category: Category) -> Style {
        let style = Style::default().fg(self.category_color(category));
        match category {
            Category::Error | Category::Warning => style.add_modifier(Modifier::BOLD),
            _ => style,
        }
    }
}

/// Create a styled border block
pub fn styled_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
}

/// Header banner
pub const SMALL_LOGO: &str = " TERMINAL HACKER ";

/// Key bindings overlay
pub const HELP_TEXT: &str = r#"
╔═══════════════════════════════════════════════╗
║                   CONTROLS                    ║
╠═══════════════════════════════════════════════╣
║  Enter      Run the typed command             ║
║  ↑/↓        Browse command history            ║
║  PgUp/PgDn  Scroll the terminal               ║
║  Esc        Clear the input / close help      ║
║  ?          Toggle this help (empty prompt)   ║
║  Ctrl-C     Quit                              ║
╠═══════════════════════════════════════════════╣
║  Type 'help' for the command list.            ║
║  Type 'exit' or 'quit' to leave.              ║
╚═══════════════════════════════════════════════╝
"#;

/// Create the main layout
pub fn create_main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),   // Header
            Constraint::Min(10),     // Main content
            Constraint::Length(3),   // Prompt
            Constraint::Length(1),   // Status bar
        ])
        .split(area)
        .to_vec()
}

/// Create the content layout (terminal + side panel)
pub fn create_content_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(72),  // Transcript
            Constraint::Percentage(28),  // Player panel
        ])
        .split(area)
        .to_vec()
}

/// Centered popup of at most `width` x `height`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_and_successes_differ_in_color() {
        let theme = Theme::default();
        assert_ne!(
            theme.category_color(Category::Error),
            theme.category_color(Category::Success)
        );
    }

    #[test]
    fn popup_fits_inside_small_areas() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = centered_rect(area, 60, 25);
        assert!(popup.width <= area.width && popup.height <= area.height);
        assert!(popup.x + popup.width <= area.width);
    }
}
