//! Big countdown clock

use crate::theme::Theme;
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

/// Glyph height in rows
pub const GLYPH_HEIGHT: u16 = 5;
/// Glyph width in columns (digits; the colon is narrower)
const DIGIT_WIDTH: u16 = 3;
const COLON_WIDTH: u16 = 1;
/// Blank columns between glyphs
const GAP: u16 = 1;

const DIGITS: [[&str; 5]; 10] = [
    ["███", "█ █", "█ █", "█ █", "███"], // 0
    [" ██", "  █", "  █", "  █", "  █"], // 1
    ["███", "  █", "███", "█  ", "███"], // 2
    ["███", "  █", "███", "  █", "███"], // 3
    ["█ █", "█ █", "███", "  █", "  █"], // 4
    ["███", "█  ", "███", "  █", "███"], // 5
    ["███", "█  ", "███", "█ █", "███"], // 6
    ["███", "  █", "  █", "  █", "  █"], // 7
    ["███", "█ █", "███", "█ █", "███"], // 8
    ["███", "█ █", "███", "  █", "███"], // 9
];
const COLON: [&str; 5] = [" ", "█", " ", "█", " "];

fn glyph(ch: char) -> Option<&'static [&'static str; 5]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        ':' => Some(&COLON),
        _ => None,
    }
}

/// Columns needed to draw `text` in big glyphs
pub fn big_width(text: &str) -> u16 {
    let glyphs: u16 = text
        .chars()
        .map(|c| if c == ':' { COLON_WIDTH } else { DIGIT_WIDTH })
        .sum();
    glyphs + GAP * (text.chars().count() as u16).saturating_sub(1)
}

/// Widget for the `MM:SS` countdown
///
/// Falls back to a single line of text when the area is too small for the
/// big glyphs.
pub struct ClockWidget<'a> {
    text: &'a str,
    theme: &'a Theme,
    style: Option<Style>,
}

impl<'a> ClockWidget<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self {
            text,
            theme,
            style: None,
        }
    }

    /// Override the digit style (e.g. dimmed while paused)
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl Widget for ClockWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = self.style.unwrap_or_else(|| self.theme.clock());

        let width = big_width(self.text);
        if area.height < GLYPH_HEIGHT || area.width < width {
            let len = self.text.chars().count() as u16;
            let x = area.x + area.width.saturating_sub(len) / 2;
            let y = area.y + area.height / 2;
            buf.set_stringn(x, y, self.text, area.width as usize, style);
            return;
        }

        let mut x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - GLYPH_HEIGHT) / 2;

        for ch in self.text.chars() {
            let Some(rows) = glyph(ch) else {
                continue;
            };
            let mut glyph_width = 0;
            for (row, line) in rows.iter().enumerate() {
                for (col, cell) in line.chars().enumerate() {
                    if cell != ' ' {
                        buf[(x + col as u16, y + row as u16)]
                            .set_char(cell)
                            .set_style(style);
                    }
                }
                glyph_width = glyph_width.max(line.chars().count() as u16);
            }
            x += glyph_width + GAP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_big_width() {
        // 4 digits + colon + 4 gaps
        assert_eq!(big_width("25:00"), 4 * 3 + 1 + 4);
        assert_eq!(big_width("120:00"), 5 * 3 + 1 + 5);
    }

    #[test]
    fn test_render_big_digits() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 17, 5);
        let mut buf = Buffer::empty(area);
        ClockWidget::new("10:07", &theme).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0), " ██ ███   ███ ███");
        assert_eq!(row_text(&buf, 1), "  █ █ █ █ █ █   █");
        assert_eq!(row_text(&buf, 4), "  █ ███   ███   █");
    }

    #[test]
    fn test_fallback_to_text() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 10, 3);
        let mut buf = Buffer::empty(area);
        ClockWidget::new("25:00", &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 1), "  25:00   ");
    }
}
