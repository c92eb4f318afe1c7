//! Study session core for SWM - countdown, controller, and tick scheduling
//!
//! This crate owns everything the screen needs to know about a session:
//! - State: the flat timer record and its derived phase/panel
//! - Controller: intent methods (start, pause, volume, fullscreen...)
//! - Ticker: the cancellable one-second countdown task
//! - Events: change notifications for whoever draws the screen
//! - Host: traits for the audio output and fullscreen surface

mod controller;
mod duration;
mod events;
mod host;
mod state;
mod ticker;

pub use controller::TimerController;
pub use duration::{minutes_to_secs, parse_minutes, DurationInput};
pub use events::{Subscribers, TimerEvent};
pub use host::{AmbientAudio, FullscreenError, FullscreenHost, PlaybackError};
pub use state::{
    format_clock, Panel, SessionPhase, TimerState, DEFAULT_STUDY_MINUTES, DEFAULT_VOLUME,
};
pub use ticker::{ThreadTicker, TickSource, TickToken, TICK_PERIOD};
