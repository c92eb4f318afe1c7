//! Command definitions for SWM

/// Commands that can be dispatched from input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Session
    Start,
    TogglePause,
    Reset,

    // Duration field
    EditDuration,
    DurationChar(char),
    DurationBackspace,
    DurationClear,

    // Ambient audio
    ToggleMute,
    AdjustVolume(i16), // percent, negative = quieter
    SetVolume(u8),     // 0-100

    // Screen
    ToggleFullscreen,
    CycleTheme,
    ToggleHelp,
    HelpScrollUp,
    HelpScrollDown,

    // Mode changes
    EnterNormalMode,

    // Application
    Quit,
    Cancel,
}

impl Command {
    /// Short label for the status bar
    pub fn label(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::TogglePause => "pause/resume",
            Command::Reset => "reset",
            Command::EditDuration
            | Command::DurationChar(_)
            | Command::DurationBackspace
            | Command::DurationClear => "duration",
            Command::ToggleMute => "mute",
            Command::AdjustVolume(_) | Command::SetVolume(_) => "volume",
            Command::ToggleFullscreen => "fullscreen",
            Command::CycleTheme => "theme",
            Command::ToggleHelp | Command::HelpScrollUp | Command::HelpScrollDown => "help",
            Command::EnterNormalMode => "normal",
            Command::Quit => "quit",
            Command::Cancel => "cancel",
        }
    }
}
