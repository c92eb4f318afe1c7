//! Timer state record and the views derived from it

/// Session length shown in the duration field at startup (minutes)
pub const DEFAULT_STUDY_MINUTES: i64 = 30;
/// Initial ambient volume (percent)
pub const DEFAULT_VOLUME: u8 = 50;

/// Where the countdown is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing started yet (or reset)
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Started, ticking suspended
    Paused,
    /// Running with nothing left to count
    Finished,
}

impl SessionPhase {
    /// Get display name
    pub fn name(self) -> &'static str {
        match self {
            SessionPhase::Idle => "IDLE",
            SessionPhase::Running => "FOCUS",
            SessionPhase::Paused => "PAUSED",
            SessionPhase::Finished => "DONE",
        }
    }
}

/// The central panel variants. Exactly one is visible at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Duration field and start control
    Setup,
    /// Countdown with a pause control
    Running,
    /// Countdown with a resume control
    Paused,
}

impl Panel {
    /// Select the panel for a state snapshot
    pub fn for_state(state: &TimerState) -> Self {
        if state.is_paused {
            Panel::Paused
        } else if state.is_running {
            Panel::Running
        } else {
            Panel::Setup
        }
    }
}

/// Snapshot of everything the screen shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Requested session length; unvalidated, may be zero or negative
    pub study_minutes: i64,
    /// Raw contents of the duration field
    pub duration_text: String,
    /// Countdown value in seconds
    pub remaining_secs: u64,
    /// A session has been started
    pub is_running: bool,
    /// Started but not ticking
    pub is_paused: bool,
    /// Mirrors the host fullscreen state (set optimistically)
    pub is_fullscreen: bool,
    /// Title is shown until the first start
    pub show_title: bool,
    /// Ambient playback suppressed
    pub is_muted: bool,
    /// Ambient gain, 0-100
    pub volume: u8,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_STUDY_MINUTES, DEFAULT_VOLUME, true)
    }
}

impl TimerState {
    /// Create the initial state
    pub fn new(study_minutes: i64, volume: u8, muted: bool) -> Self {
        Self {
            study_minutes,
            duration_text: study_minutes.to_string(),
            remaining_secs: crate::duration::minutes_to_secs(study_minutes),
            is_running: false,
            is_paused: false,
            is_fullscreen: false,
            show_title: true,
            is_muted: muted,
            volume: volume.min(100),
        }
    }

    /// Derived lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        match (self.is_running, self.is_paused) {
            (false, _) => SessionPhase::Idle,
            (true, true) => SessionPhase::Paused,
            (true, false) if self.remaining_secs == 0 => SessionPhase::Finished,
            (true, false) => SessionPhase::Running,
        }
    }

    /// Whether the countdown should be decrementing right now
    pub fn is_ticking(&self) -> bool {
        self.is_running && !self.is_paused && self.remaining_secs > 0
    }

    /// Which central panel to draw
    pub fn panel(&self) -> Panel {
        Panel::for_state(self)
    }

    /// Remaining time as `MM:SS`
    pub fn clock(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

/// Format seconds as `MM:SS`. Minutes are not capped at 99.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
