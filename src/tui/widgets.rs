//! Custom widgets for the terminal UI

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A labelled meter for experience and detection
pub struct StatusBar {
    value: u8,
    max: u8,
    label: String,
    color: Color,
    warning_threshold: u8,
    danger_threshold: u8,
}

impl StatusBar {
    pub fn new(label: &str, value: u8, max: u8) -> Self {
        Self {
            value: value.min(max),
            max: max.max(1),
            label: label.to_string(),
            color: Color::Green,
            warning_threshold: u8::MAX,
            danger_threshold: u8::MAX,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn warning_threshold(mut self, threshold: u8) -> Self {
        self.warning_threshold = threshold;
        self
    }

    pub fn danger_threshold(mut self, threshold: u8) -> Self {
        self.danger_threshold = threshold;
        self
    }

    fn current_color(&self) -> Color {
        if self.value >= self.danger_threshold {
            Color::Red
        } else if self.value >= self.warning_threshold {
            Color::Yellow
        } else {
            self.color
        }
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let color = self.current_color();
        let inner = area.width - 2;
        let filled = (self.value as u32 * inner as u32 / self.max as u32) as u16;

        let label = format!("{}: {}%", self.label, self.value);
        buf.set_string(area.x, area.y, &label, Style::default().fg(color));

        if area.height > 1 {
            let bar_y = area.y + 1;
            buf.set_string(area.x, bar_y, "[", Style::default());
            buf.set_string(area.x + area.width - 1, bar_y, "]", Style::default());

            for x in 0..filled {
                buf.set_string(area.x + 1 + x, bar_y, "█", Style::default().fg(color));
            }
            for x in filled..inner {
                buf.set_string(area.x + 1 + x, bar_y, "░", Style::default().fg(Color::DarkGray));
            }
        }
    }
}

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Shown next to the prompt while a command runs
pub struct BusyIndicator {
    tick: usize,
    label: String,
}

impl BusyIndicator {
    pub fn new(tick: usize, label: &str) -> Self {
        Self {
            tick,
            label: label.to_string(),
        }
    }
}

impl Widget for BusyIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
        let text = format!("{} {}", frame, self.label);
        buf.set_stringn(
            area.x,
            area.y,
            &text,
            area.width as usize,
            Style::default().fg(Color::Yellow),
        );
    }
}
