//! Application view state (Elm architecture)
//!
//! The timer controller owns the session; this is the screen's copy of it,
//! refreshed from `TimerEvent`s, plus purely visual state.

use crate::theme::Theme;
use swm_audio::{AudioEvent, PlaybackState};
use swm_input::Mode;
use swm_session::{TimerEvent, TimerState};
use tracing::debug;

/// Message type for colored status messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageType {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// What the ambient output is doing, as far as the screen knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioStatus {
    /// Waiting for the output device
    #[default]
    Starting,
    /// Device open, track still decoding
    Loading,
    /// Track loaded
    Ready,
    /// No device or the track failed to load
    Unavailable,
}

/// Application state
pub struct AppState {
    /// Latest snapshot from the timer controller
    pub timer: TimerState,

    // Ambient track (updated from audio engine)
    pub audio_status: AudioStatus,
    pub playback: PlaybackState,
    pub track_name: Option<String>,

    // UI state
    pub mode: Mode,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub show_help: bool,
    pub help_scroll: u16,

    // Theme
    pub theme: Theme,

    // Animation state
    pub frame_count: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(TimerState::default())
    }
}

impl AppState {
    pub fn new(timer: TimerState) -> Self {
        Self {
            timer,
            audio_status: AudioStatus::default(),
            playback: PlaybackState::default(),
            track_name: None,
            mode: Mode::Normal,
            message: None,
            message_type: MessageType::Info,
            show_help: false,
            help_scroll: 0,
            theme: Theme::default(),
            frame_count: 0,
        }
    }

    /// Update state from a timer controller event
    pub fn handle_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::StateChanged(state) => {
                self.timer = state;
            }
            TimerEvent::SessionStarted { seconds } => {
                if seconds == 0 {
                    self.set_warning("Duration is zero - nothing to count");
                } else {
                    self.set_message(format!("Focus session: {} min", seconds / 60));
                }
            }
            TimerEvent::SessionFinished => {
                self.set_success("Session complete. Press r to set up another");
            }
        }
    }

    /// Update state from audio engine event
    pub fn handle_audio_event(&mut self, event: &AudioEvent) {
        match event {
            AudioEvent::DeviceReady { .. } => {
                self.audio_status = AudioStatus::Loading;
            }
            AudioEvent::StateUpdate(player) => {
                self.playback = player.playback;
            }
            AudioEvent::TrackLoaded { name, .. } => {
                self.audio_status = AudioStatus::Ready;
                self.track_name = name.clone();
            }
            AudioEvent::Looped | AudioEvent::TrackEnded => {}
            AudioEvent::Error(msg) => {
                self.audio_status = AudioStatus::Unavailable;
                self.set_warning(format!("Audio: {}", msg));
            }
        }
    }

    /// Set current mode
    pub fn set_mode(&mut self, mode: Mode) {
        let opening_help = mode == Mode::Help && !self.show_help;
        self.mode = mode;
        self.show_help = mode == Mode::Help;
        if opening_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    /// Scroll help up
    pub fn help_scroll_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(3);
    }

    /// Scroll help down
    pub fn help_scroll_down(&mut self) {
        self.help_scroll = self.help_scroll.saturating_add(3);
    }

    /// Set theme by name. Returns false for an unknown name.
    pub fn set_theme(&mut self, name: &str) -> bool {
        match Theme::by_name(name) {
            Some(theme) => {
                self.theme = theme;
                true
            }
            None => {
                self.set_error(format!(
                    "Unknown theme: {}. Use dusk/storm/amber/green",
                    name
                ));
                false
            }
        }
    }

    /// Switch to the next palette
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        debug!(theme = self.theme.name, "theme changed");
        self.set_message(format!("Theme: {}", self.theme.name));
    }

    /// Advance animations by one frame
    pub fn advance_frame(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }

    /// Clear any displayed message
    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_type = MessageType::Info;
    }

    /// Set a message to display (info level)
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Info;
    }

    /// Set a success message (green)
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Success;
    }

    /// Set a warning message (yellow)
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Warning;
    }

    /// Set an error message (red)
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.message_type = MessageType::Error;
    }
}

/// Main application wrapper
pub struct App {
    pub state: AppState,
    pub should_quit: bool,
}

impl App {
    pub fn new(timer: TimerState) -> Self {
        Self {
            state: AppState::new(timer),
            should_quit: false,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(TimerState::default())
    }
}
