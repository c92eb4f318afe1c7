//! Modal state machine for keyboard input handling

use crate::commands::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Volume step for +/- keys (percent)
const VOLUME_STEP: i16 = 5;

/// Input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the duration field
    Duration,
    Help,
}

impl Mode {
    /// Get display name for the mode
    pub fn display_name(&self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Duration => "DURATION",
            Mode::Help => "HELP",
        }
    }
}

/// Handles keyboard input and converts to commands
pub struct InputHandler {
    mode: Mode,
}

impl InputHandler {
    pub fn new() -> Self {
        Self { mode: Mode::Normal }
    }

    /// Get current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Drop back to normal mode (e.g. when the duration field disappears)
    pub fn reset_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    /// Handle a key event and return a command if applicable
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        // Key release/repeat reports (kitty protocol, Windows) are ignored
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Command::Quit);
        }

        match self.mode {
            Mode::Normal => self.handle_normal_mode(key),
            Mode::Duration => self.handle_duration_mode(key),
            Mode::Help => self.handle_help_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            // Session
            KeyCode::Enter | KeyCode::Char('s') => Some(Command::Start),
            KeyCode::Char(' ') | KeyCode::Char('p') => Some(Command::TogglePause),
            KeyCode::Char('r') => Some(Command::Reset),

            // Duration field
            KeyCode::Char('e') | KeyCode::Tab => {
                self.mode = Mode::Duration;
                Some(Command::EditDuration)
            }

            // Ambient audio
            KeyCode::Char('m') => Some(Command::ToggleMute),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                Some(Command::AdjustVolume(VOLUME_STEP))
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Left => {
                Some(Command::AdjustVolume(-VOLUME_STEP))
            }
            // Slider presets: 0 = silent, 1-9 = 10%-90%
            KeyCode::Char(c @ '0'..='9') => Some(Command::SetVolume((c as u8 - b'0') * 10)),

            // Screen
            KeyCode::Char('f') => Some(Command::ToggleFullscreen),
            KeyCode::Char('t') => Some(Command::CycleTheme),
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Some(Command::ToggleHelp)
            }

            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Esc => Some(Command::Cancel),

            _ => None,
        }
    }

    fn handle_duration_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                Some(Command::Start)
            }
            KeyCode::Esc | KeyCode::Tab => {
                self.mode = Mode::Normal;
                Some(Command::EnterNormalMode)
            }
            KeyCode::Backspace => Some(Command::DurationBackspace),
            KeyCode::Delete => Some(Command::DurationClear),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::DurationClear)
            }
            // The field takes whatever is typed
            KeyCode::Char(c) => Some(Command::DurationChar(c)),
            _ => None,
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = Mode::Normal;
                Some(Command::ToggleHelp)
            }
            KeyCode::Up | KeyCode::Char('k') => Some(Command::HelpScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::HelpScrollDown),
            _ => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_normal_mode_session_keys() {
        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(
            input.handle_key(key(KeyCode::Char(' '))),
            Some(Command::TogglePause)
        );
        assert_eq!(input.handle_key(key(KeyCode::Char('r'))), Some(Command::Reset));
        assert_eq!(
            input.handle_key(key(KeyCode::Char('f'))),
            Some(Command::ToggleFullscreen)
        );
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_volume_keys() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle_key(key(KeyCode::Char('+'))),
            Some(Command::AdjustVolume(5))
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Left)),
            Some(Command::AdjustVolume(-5))
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Char('0'))),
            Some(Command::SetVolume(0))
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Char('3'))),
            Some(Command::SetVolume(30))
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Char('m'))),
            Some(Command::ToggleMute)
        );
    }

    #[test]
    fn test_duration_editing_flow() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle_key(key(KeyCode::Char('e'))),
            Some(Command::EditDuration)
        );
        assert_eq!(input.mode(), Mode::Duration);

        // Digits go to the field, not the volume presets
        assert_eq!(
            input.handle_key(key(KeyCode::Char('4'))),
            Some(Command::DurationChar('4'))
        );
        // Anything typed is accepted
        assert_eq!(
            input.handle_key(key(KeyCode::Char('x'))),
            Some(Command::DurationChar('x'))
        );
        assert_eq!(
            input.handle_key(key(KeyCode::Backspace)),
            Some(Command::DurationBackspace)
        );
        assert_eq!(input.handle_key(ctrl('u')), Some(Command::DurationClear));

        // Enter starts and leaves the field
        assert_eq!(input.handle_key(key(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_duration_escape() {
        let mut input = InputHandler::new();
        input.handle_key(key(KeyCode::Tab));
        assert_eq!(
            input.handle_key(key(KeyCode::Esc)),
            Some(Command::EnterNormalMode)
        );
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_help_mode() {
        let mut input = InputHandler::new();
        assert_eq!(
            input.handle_key(key(KeyCode::Char('?'))),
            Some(Command::ToggleHelp)
        );
        assert_eq!(input.mode(), Mode::Help);
        assert_eq!(
            input.handle_key(key(KeyCode::Down)),
            Some(Command::HelpScrollDown)
        );
        // Session keys do nothing while help is open
        assert_eq!(input.handle_key(key(KeyCode::Char('s'))), None);
        assert_eq!(
            input.handle_key(key(KeyCode::Esc)),
            Some(Command::ToggleHelp)
        );
        assert_eq!(input.mode(), Mode::Normal);
    }

    #[test]
    fn test_quit_from_any_mode() {
        let mut input = InputHandler::new();
        input.handle_key(key(KeyCode::Char('e')));
        assert_eq!(input.handle_key(ctrl('q')), Some(Command::Quit));

        let mut input = InputHandler::new();
        assert_eq!(input.handle_key(key(KeyCode::Char('q'))), Some(Command::Quit));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut input = InputHandler::new();
        let mut release = key(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(input.handle_key(release), None);
    }
}
