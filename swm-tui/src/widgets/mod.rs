//! UI Widgets for SWM

mod clock;
mod controls;
mod panel;
mod rain;
pub mod status_bar;

pub use clock::ClockWidget;
pub use controls::{ControlsWidget, CONTROLS_HEIGHT, CONTROLS_WIDTH};
pub use panel::PanelWidget;
pub use rain::RainWidget;
pub use status_bar::StatusBarWidget;
