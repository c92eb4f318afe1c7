//! Controls overlay - mute icon, volume slider, fullscreen indicator

use crate::app::AudioStatus;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use swm_session::TimerState;

/// Overlay size including the border
pub const CONTROLS_WIDTH: u16 = 34;
pub const CONTROLS_HEIGHT: u16 = 3;
/// Slider track length in cells
const SLIDER_CELLS: usize = 12;

/// Widget for the audio and fullscreen controls
pub struct ControlsWidget<'a> {
    state: &'a TimerState,
    theme: &'a Theme,
    audio: AudioStatus,
}

impl<'a> ControlsWidget<'a> {
    pub fn new(state: &'a TimerState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            audio: AudioStatus::Ready,
        }
    }

    pub fn audio(mut self, audio: AudioStatus) -> Self {
        self.audio = audio;
        self
    }

    fn mute_icon(&self) -> Span<'static> {
        if self.audio == AudioStatus::Unavailable {
            Span::styled("!", Style::default().fg(self.theme.warning))
        } else if self.state.is_muted {
            Span::styled("×", Style::default().fg(self.theme.danger))
        } else {
            Span::styled("♪", Style::default().fg(self.theme.accent))
        }
    }

    fn slider(&self) -> Vec<Span<'static>> {
        let level = self.state.volume as f32 / 100.0;
        let knob = self.state.volume as usize * (SLIDER_CELLS - 1) / 100;

        let filled: String = "━".repeat(knob);
        let empty: String = "─".repeat(SLIDER_CELLS - 1 - knob);
        let fill_style = if self.state.is_muted {
            self.theme.dim()
        } else {
            self.theme.slider_style(level)
        };

        vec![
            Span::styled(filled, fill_style),
            Span::styled("●", Style::default().fg(self.theme.highlight)),
            Span::styled(empty, self.theme.dim()),
        ]
    }
}

impl Widget for ControlsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_set(border::ROUNDED)
            .border_style(self.theme.border());
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 4 || inner.height < 1 {
            return;
        }

        let mut spans = vec![Span::raw(" "), self.mute_icon(), Span::raw(" ")];
        spans.extend(self.slider());
        spans.push(Span::styled(
            format!(" {:>3}%", self.state.volume),
            self.theme.normal(),
        ));
        spans.push(Span::styled("  │ ", self.theme.border()));
        let (icon, label) = if self.state.is_fullscreen {
            ("⇲", "min")
        } else {
            ("⇱", "max")
        };
        spans.push(Span::styled(
            format!("{} {}", icon, label),
            self.theme.normal(),
        ));

        Paragraph::new(Line::from(spans))
            .style(self.theme.normal())
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(state: &TimerState, audio: AudioStatus) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, CONTROLS_WIDTH, CONTROLS_HEIGHT);
        let mut buf = Buffer::empty(area);
        ControlsWidget::new(state, &theme)
            .audio(audio)
            .render(area, &mut buf);
        (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_muted_icon() {
        let state = TimerState::default();
        assert!(state.is_muted);
        let row = render(&state, AudioStatus::Ready);
        assert!(row.contains('×'));
        assert!(row.contains(" 50%"));
        assert!(row.contains("max"));
    }

    #[test]
    fn test_unmuted_icon_and_fullscreen() {
        let mut state = TimerState::new(30, 80, false);
        state.is_fullscreen = true;
        let row = render(&state, AudioStatus::Ready);
        assert!(row.contains('♪'));
        assert!(row.contains(" 80%"));
        assert!(row.contains("min"));
    }

    #[test]
    fn test_unavailable_audio() {
        let state = TimerState::new(30, 50, false);
        let row = render(&state, AudioStatus::Unavailable);
        assert!(row.contains('!'));
    }

    #[test]
    fn test_slider_knob_position() {
        let silent = render(&TimerState::new(30, 0, true), AudioStatus::Ready);
        assert!(silent.contains("●───────────"));

        let full = render(&TimerState::new(30, 100, false), AudioStatus::Ready);
        assert!(full.contains("━━━━━━━━━━━●"));
    }
}
