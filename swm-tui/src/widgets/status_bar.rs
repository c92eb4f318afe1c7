//! Status bar widget - mode, session phase and messages

use crate::app::MessageType;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Widget},
};
use swm_audio::PlaybackState;
use swm_input::Mode;
use swm_session::SessionPhase;

/// Widget for displaying the status bar
pub struct StatusBarWidget<'a> {
    mode: Mode,
    phase: SessionPhase,
    message: Option<&'a str>,
    message_type: MessageType,
    track: Option<&'a str>,
    playback: PlaybackState,
    theme: &'a Theme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: Mode, phase: SessionPhase, theme: &'a Theme) -> Self {
        Self {
            mode,
            phase,
            message: None,
            message_type: MessageType::Info,
            track: None,
            playback: PlaybackState::Stopped,
            theme,
        }
    }

    pub fn message(mut self, msg: Option<&'a str>, msg_type: MessageType) -> Self {
        self.message = msg;
        self.message_type = msg_type;
        self
    }

    /// Name of the loaded ambient track and whether it is sounding
    pub fn track(mut self, track: Option<&'a str>, playback: PlaybackState) -> Self {
        self.track = track;
        self.playback = playback;
        self
    }

    fn playback_glyph(&self) -> &'static str {
        match self.playback {
            PlaybackState::Playing => "♪",
            PlaybackState::Paused => "‖",
            PlaybackState::Stopped => "·",
        }
    }

    fn mode_style(&self) -> Style {
        match self.mode {
            Mode::Normal | Mode::Help => self.theme.highlight(),
            Mode::Duration => Style::default().fg(self.theme.accent),
        }
    }

    fn phase_style(&self) -> Style {
        match self.phase {
            SessionPhase::Idle => self.theme.dim(),
            SessionPhase::Running => Style::default().fg(self.theme.accent),
            SessionPhase::Paused => Style::default().fg(self.theme.warning),
            SessionPhase::Finished => self.theme.title(),
        }
    }

    fn message_style(&self) -> Style {
        match self.message_type {
            MessageType::Info => self.theme.dim(),
            MessageType::Success => Style::default().fg(self.theme.accent),
            MessageType::Warning => Style::default().fg(self.theme.warning),
            MessageType::Error => Style::default().fg(self.theme.danger),
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }

        // [mode] phase message........ hint
        let chunks = Layout::horizontal([
            Constraint::Length(11),
            Constraint::Length(9),
            Constraint::Min(20),
            Constraint::Length(24),
        ])
        .split(area);

        let mode_line = Line::from(vec![
            Span::raw("["),
            Span::styled(self.mode.display_name(), self.mode_style()),
            Span::raw("]"),
        ]);
        Paragraph::new(mode_line).render(chunks[0], buf);

        Paragraph::new(Line::from(Span::styled(
            self.phase.name(),
            self.phase_style(),
        )))
        .render(chunks[1], buf);

        let content = match (self.message, self.track) {
            (Some(msg), _) => Line::from(Span::styled(msg, self.message_style())),
            (None, Some(track)) => Line::from(Span::styled(
                format!("{} {}", self.playback_glyph(), track),
                self.theme.dim(),
            )),
            (None, None) => Line::from(Span::styled("Ready. Press ? for help", self.theme.dim())),
        };
        Paragraph::new(content).render(chunks[2], buf);

        let help = match self.mode {
            Mode::Normal => "e:duration  ?:help  q:quit",
            Mode::Duration => "Enter:start  Esc:done",
            Mode::Help => "Esc:close help",
        };
        let help_line = Line::from(Span::styled(help, self.theme.dim()));
        Paragraph::new(help_line).render(chunks[3], buf);
    }
}

/// Help overlay widget with scrolling support
pub struct HelpWidget<'a> {
    theme: &'a Theme,
    scroll: u16,
}

impl<'a> HelpWidget<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme, scroll: 0 }
    }

    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    /// Box width in cells
    pub const WIDTH: u16 = 50;

    fn help_lines() -> Vec<&'static str> {
        vec![
            "╔════════════════════════════════════════════════╗",
            "║           SWM - Study With Me                  ║",
            "║           ↑/↓ or j/k to scroll                 ║",
            "╠════════════════════════════════════════════════╣",
            "║ SESSION                                        ║",
            "║   Enter / s     Start focus session            ║",
            "║   Space / p     Pause / resume                 ║",
            "║   r             Reset to setup                 ║",
            "╠────────────────────────────────────────────────╣",
            "║ DURATION (press e or Tab to edit)              ║",
            "║   type          Minutes for the next session   ║",
            "║   Backspace     Delete last character          ║",
            "║   Del / Ctrl-u  Clear the field                ║",
            "║   Enter         Start                          ║",
            "║   Esc / Tab     Stop editing                   ║",
            "╠────────────────────────────────────────────────╣",
            "║ AMBIENCE                                       ║",
            "║   m             Mute / unmute rain             ║",
            "║   + / - / ←/→   Volume ±5                      ║",
            "║   0-9           Volume 0%-90%                  ║",
            "╠────────────────────────────────────────────────╣",
            "║ SCREEN                                         ║",
            "║   f             Fullscreen on / off            ║",
            "║   t             Cycle theme                    ║",
            "║   ?             This help                      ║",
            "╠════════════════════════════════════════════════╣",
            "║         Press Esc or ? to close help           ║",
            "║          q or Ctrl-Q to quit SWM               ║",
            "╚════════════════════════════════════════════════╝",
        ]
    }
}

impl HelpWidget<'_> {
    /// Box rows are border glyphs around a plain body
    fn styled_line(&self, text: &'static str) -> Line<'static> {
        let mut chars = text.chars();
        match (chars.next(), chars.next_back()) {
            (Some('║'), Some('║')) => {
                let body = &text['║'.len_utf8()..text.len() - '║'.len_utf8()];
                Line::from(vec![
                    Span::styled("║", self.theme.border()),
                    Span::styled(body, self.theme.normal()),
                    Span::styled("║", self.theme.border()),
                ])
            }
            _ => Line::from(Span::styled(text, self.theme.border())),
        }
    }
}

impl Widget for HelpWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        buf.set_style(area, self.theme.normal());
        if area.height == 0 {
            return;
        }

        let lines: Vec<Line> = Self::help_lines()
            .into_iter()
            .map(|l| self.styled_line(l))
            .collect();
        let total = lines.len() as u16;
        let max_scroll = total.saturating_sub(area.height);
        let scroll = self.scroll.min(max_scroll);

        let left = area.x + area.width.saturating_sub(Self::WIDTH) / 2;
        let body = Rect::new(left, area.y, Self::WIDTH.min(area.width), area.height);
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .render(body, buf);

        if max_scroll > 0 {
            let indicator = format!(" [{}/{}] ", scroll + 1, max_scroll + 1);
            let width = (indicator.len() as u16).min(area.width);
            let x = area.x + area.width.saturating_sub(width + 2);
            let y = area.y + area.height - 1;
            Paragraph::new(Span::styled(indicator, self.theme.dim()))
                .render(Rect::new(x, y, width, 1), buf);
        }
    }
}
