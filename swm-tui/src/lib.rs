//! Terminal UI for SWM - widgets, themes, and layout
//!
//! Rainy backdrop, big countdown and the controls overlay.

mod app;
mod surface;
mod theme;
pub mod widgets;

pub use app::{App, AppState, AudioStatus, MessageType};
pub use surface::TerminalFullscreen;
pub use theme::{Theme, CRT_AMBER, CRT_GREEN, DUSK, STORM, THEMES};
pub use widgets::status_bar::HelpWidget;
pub use widgets::{
    ClockWidget, ControlsWidget, PanelWidget, RainWidget, StatusBarWidget, CONTROLS_HEIGHT,
    CONTROLS_WIDTH,
};
