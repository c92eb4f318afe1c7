//! Color themes for SWM

use ratatui::style::{Color, Modifier, Style};

/// Theme configuration for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    /// Primary foreground color (text, borders)
    pub fg: Color,
    /// Dimmed foreground (secondary text)
    pub fg_dim: Color,
    /// Backdrop color
    pub bg: Color,
    /// Highlight color (title, focused field)
    pub highlight: Color,
    /// Accent color (slider fill, success messages)
    pub accent: Color,
    /// Warning color
    pub warning: Color,
    /// Error/danger color
    pub danger: Color,
    /// Falling drop head
    pub rain: Color,
    /// Falling drop tail
    pub rain_dim: Color,
    /// Start button
    pub start: Color,
    /// Pause button
    pub pause: Color,
    /// Resume button
    pub resume: Color,
}

impl Theme {
    /// Get style for normal text
    pub fn normal(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for dimmed text
    pub fn dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight(&self) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border(&self) -> Style {
        Style::default().fg(self.fg_dim)
    }

    /// Get style for active borders
    pub fn border_active(&self) -> Style {
        Style::default().fg(self.highlight)
    }

    /// Get title style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Countdown digits
    pub fn clock(&self) -> Style {
        Style::default().fg(self.fg).add_modifier(Modifier::BOLD)
    }

    /// Rain drop style: head is brighter than the tail
    pub fn rain_style(&self, head: bool) -> Style {
        if head {
            Style::default().fg(self.rain)
        } else {
            Style::default().fg(self.rain_dim)
        }
    }

    /// Filled button in the given color
    pub fn button(&self, color: Color) -> Style {
        Style::default()
            .fg(self.bg)
            .bg(color)
            .add_modifier(Modifier::BOLD)
    }

    /// Slider fill style based on level (0.0 - 1.0)
    pub fn slider_style(&self, level: f32) -> Style {
        let color = if level > 0.9 {
            self.warning
        } else {
            self.accent
        };
        Style::default().fg(color)
    }

    /// Look up a palette by name or alias
    pub fn by_name(name: &str) -> Option<Theme> {
        match name.to_lowercase().as_str() {
            "dusk" | "default" => Some(DUSK),
            "storm" | "blue" => Some(STORM),
            "amber" | "orange" => Some(CRT_AMBER),
            "green" | "phosphor" | "phosphor-green" => Some(CRT_GREEN),
            _ => None,
        }
    }

    /// The palette after this one in `THEMES`, wrapping around
    pub fn next(&self) -> Theme {
        let idx = THEMES
            .iter()
            .position(|t| t.name == self.name)
            .map_or(0, |i| (i + 1) % THEMES.len());
        THEMES[idx].clone()
    }
}

/// Indigo night with warm buttons (default)
pub const DUSK: Theme = Theme {
    name: "dusk",
    fg: Color::Rgb(240, 240, 245),
    fg_dim: Color::Rgb(140, 140, 160),
    bg: Color::Rgb(12, 10, 22),
    highlight: Color::Rgb(199, 210, 254), // indigo-200
    accent: Color::Rgb(233, 213, 255),    // purple-200
    warning: Color::Rgb(255, 220, 120),
    danger: Color::Rgb(255, 110, 110),
    rain: Color::Rgb(190, 200, 230),
    rain_dim: Color::Rgb(70, 76, 100),
    start: Color::Rgb(255, 180, 162),  // #FFB4A2
    pause: Color::Rgb(240, 187, 120),  // #F0BB78
    resume: Color::Rgb(34, 197, 94),   // green-500
};

/// Cold blue storm
pub const STORM: Theme = Theme {
    name: "storm",
    fg: Color::Rgb(220, 232, 245),
    fg_dim: Color::Rgb(100, 120, 145),
    bg: Color::Rgb(5, 10, 20),
    highlight: Color::Rgb(140, 200, 255),
    accent: Color::Rgb(100, 170, 240),
    warning: Color::Rgb(255, 210, 90),
    danger: Color::Rgb(255, 90, 90),
    rain: Color::Rgb(150, 190, 240),
    rain_dim: Color::Rgb(40, 60, 90),
    start: Color::Rgb(120, 180, 255),
    pause: Color::Rgb(200, 170, 110),
    resume: Color::Rgb(80, 200, 160),
};

/// Monochrome amber terminal
pub const CRT_AMBER: Theme = Theme {
    name: "amber",
    fg: Color::Rgb(250, 170, 20),
    fg_dim: Color::Rgb(120, 82, 10),
    bg: Color::Rgb(14, 8, 2),
    highlight: Color::Rgb(255, 214, 140),
    accent: Color::Rgb(248, 196, 70),
    warning: Color::Rgb(255, 240, 120),
    danger: Color::Rgb(240, 96, 80),
    rain: Color::Rgb(255, 200, 90),
    rain_dim: Color::Rgb(90, 60, 0),
    start: Color::Rgb(255, 180, 50),
    pause: Color::Rgb(200, 140, 20),
    resume: Color::Rgb(255, 220, 100),
};

/// Monochrome green terminal
pub const CRT_GREEN: Theme = Theme {
    name: "phosphor-green",
    fg: Color::Rgb(64, 245, 64),
    fg_dim: Color::Rgb(30, 120, 34),
    bg: Color::Rgb(2, 12, 4),
    highlight: Color::Rgb(176, 250, 176),
    accent: Color::Rgb(110, 240, 110),
    warning: Color::Rgb(230, 250, 110),
    danger: Color::Rgb(240, 96, 80),
    rain: Color::Rgb(120, 255, 120),
    rain_dim: Color::Rgb(20, 90, 20),
    start: Color::Rgb(100, 255, 150),
    pause: Color::Rgb(150, 255, 100),
    resume: Color::Rgb(180, 255, 180),
};

/// Cycle order for runtime theme switching
pub const THEMES: [Theme; 4] = [DUSK, STORM, CRT_AMBER, CRT_GREEN];

impl Default for Theme {
    fn default() -> Self {
        DUSK
    }
}
