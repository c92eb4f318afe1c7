//! Rain backdrop - dimmed background with falling drops
//!
//! Raindrop placement is a pure function of (drop index, frame), so the same
//! frame always renders the same picture and no RNG state is kept.

use crate::theme::Theme;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Number of drops on screen
pub const DEFAULT_DROPS: usize = 100;
/// Cells per drop (head + tail)
const TAIL_LEN: u16 = 2;
/// Fastest / slowest time to cross the screen (ms)
const FALL_MIN_MS: u64 = 500;
const FALL_SPREAD_MS: u64 = 300;
/// Start offsets are spread over this window (ms)
const DELAY_SPREAD_MS: u64 = 2000;

/// Integer hash for per-drop parameters
fn hash(index: u32, salt: u32) -> u32 {
    let mut h = index
        .wrapping_mul(0x9E3779B9)
        .wrapping_add(salt.wrapping_mul(0x85EBCA6B));
    h ^= h >> 16;
    h = h.wrapping_mul(0xC2B2AE35);
    h ^= h >> 13;
    h
}

/// Position of one drop at a given frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raindrop {
    pub column: u16,
    /// Row of the head, counted from the top of the area
    pub row: u16,
}

/// Widget for the animated rain backdrop
pub struct RainWidget<'a> {
    frame_count: u64,
    fps: u64,
    theme: &'a Theme,
}

impl<'a> RainWidget<'a> {
    pub fn new(frame_count: u64, theme: &'a Theme) -> Self {
        Self {
            frame_count,
            fps: 30,
            theme,
        }
    }

    /// Frame rate the animation timings are converted with
    pub fn fps(mut self, fps: u64) -> Self {
        self.fps = fps.max(1);
        self
    }

    /// Where drop `index` is at the current frame inside a `width` x `height` area
    pub fn drop_at(&self, index: usize, width: u16, height: u16) -> Raindrop {
        let i = index as u32;
        let column = (hash(i, 1) % width.max(1) as u32) as u16;

        let fall_ms = FALL_MIN_MS + (hash(i, 2) as u64 % FALL_SPREAD_MS);
        let period = (fall_ms * self.fps / 1000).max(1);
        let delay = (hash(i, 3) as u64 % DELAY_SPREAD_MS) * self.fps / 1000;

        let progress = (self.frame_count + delay) % period;
        let row = (progress * height as u64 / period) as u16;

        Raindrop { column, row }
    }
}

impl Widget for RainWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Backdrop
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                buf[(x, y)].set_char(' ').set_style(self.theme.normal());
            }
        }

        if area.width == 0 || area.height == 0 {
            return;
        }

        for i in 0..DEFAULT_DROPS {
            let drop = self.drop_at(i, area.width, area.height);
            let x = area.x + drop.column;

            for t in 0..TAIL_LEN {
                let Some(row) = drop.row.checked_sub(t) else {
                    break;
                };
                let (ch, style) = if t == 0 {
                    ('│', self.theme.rain_style(true))
                } else {
                    ('╵', self.theme.rain_style(false))
                };
                buf[(x, area.y + row)].set_char(ch).set_style(style);
            }
        }
    }
}
