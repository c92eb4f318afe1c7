//! Central panel - title or countdown, plus the controls for the current phase

use super::clock::{ClockWidget, GLYPH_HEIGHT};
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use swm_session::{Panel, SessionPhase, TimerState};

const TITLE: &str = "Study With Me";
const SUBTITLE: &str = "Set your timer to begin the journey";
/// Minimum visible width of the duration field contents
const FIELD_WIDTH: usize = 6;

/// Widget for the title/countdown and the phase controls
pub struct PanelWidget<'a> {
    state: &'a TimerState,
    theme: &'a Theme,
    editing: bool,
}

impl<'a> PanelWidget<'a> {
    pub fn new(state: &'a TimerState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            editing: false,
        }
    }

    /// Duration field has keyboard focus
    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    fn top_height(&self) -> u16 {
        if self.state.show_title {
            3
        } else {
            GLYPH_HEIGHT
        }
    }

    /// Rows needed to draw the whole panel
    pub fn height(&self) -> u16 {
        self.top_height() + 1 + self.body_lines().len() as u16
    }

    fn title_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                TITLE,
                self.theme.title().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(Span::styled(SUBTITLE, self.theme.dim())),
        ]
    }

    fn duration_field(&self) -> Line<'a> {
        let text = self.state.duration_text.as_str();
        let border = if self.editing {
            self.theme.border_active()
        } else {
            self.theme.border()
        };

        let mut spans = vec![
            Span::styled("[ ", border),
            Span::styled(text, self.theme.normal()),
        ];
        let mut used = text.chars().count();
        if self.editing {
            spans.push(Span::styled("█", self.theme.border_active()));
            used += 1;
        }
        spans.push(Span::raw(" ".repeat(FIELD_WIDTH.saturating_sub(used))));
        spans.push(Span::styled(" ]", border));
        spans.push(Span::styled(" min", self.theme.dim()));
        Line::from(spans)
    }

    fn body_lines(&self) -> Vec<Line<'a>> {
        let theme = self.theme;
        match self.state.panel() {
            Panel::Setup => {
                let hint = if self.editing {
                    "type minutes · Enter start · Esc done"
                } else {
                    "e edit · Enter start"
                };
                vec![
                    Line::from(Span::styled("Study Duration", theme.dim())),
                    self.duration_field(),
                    Line::from(""),
                    Line::from(Span::styled(
                        "  ◷ Start Focus Session  ",
                        theme.button(theme.start),
                    )),
                    Line::from(Span::styled(hint, theme.dim())),
                ]
            }
            Panel::Running => {
                let mut lines = Vec::new();
                if self.state.phase() == SessionPhase::Finished {
                    lines.push(Line::from(Span::styled(
                        "Session complete",
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )));
                }
                lines.push(Line::from(Span::styled(
                    "  ‖ Pause Timer  ",
                    theme.button(theme.pause),
                )));
                lines.push(Line::from(Span::styled("Space pause · r reset", theme.dim())));
                lines
            }
            Panel::Paused => vec![
                Line::from(Span::styled(
                    "  ▶ Resume Timer  ",
                    theme.button(theme.resume),
                )),
                Line::from(Span::styled("Space resume · r reset", theme.dim())),
            ],
        }
    }
}

impl Widget for PanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let [top, _, body] = Layout::vertical([
            Constraint::Length(self.top_height()),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        if self.state.show_title {
            Paragraph::new(self.title_lines())
                .alignment(Alignment::Center)
                .render(top, buf);
        } else {
            let clock = self.state.clock();
            let widget = ClockWidget::new(&clock, self.theme);
            if self.state.is_paused {
                widget
                    .style(self.theme.dim().add_modifier(Modifier::BOLD))
                    .render(top, buf);
            } else {
                widget.render(top, buf);
            }
        }

        Paragraph::new(self.body_lines())
            .alignment(Alignment::Center)
            .render(body, buf);
    }
}
