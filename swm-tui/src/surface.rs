//! Terminal fullscreen host
//!
//! "Fullscreen" in a terminal means the edge-to-edge layout (no frame, no
//! status bar). Optionally the xterm window-maximize escape is sent too;
//! terminals that do not understand it ignore it.

use crossterm::{execute, Command};
use std::fmt;
use std::io::{self, Write};
use swm_session::{FullscreenError, FullscreenHost};
use tracing::debug;

/// xterm window op: maximize the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maximize;

/// xterm window op: restore the window from maximized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restore;

impl Command for Maximize {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[9;1t")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

impl Command for Restore {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[9;0t")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Fullscreen host backed by the terminal
pub struct TerminalFullscreen {
    active: bool,
    send_escape: bool,
    out: Box<dyn Write + Send>,
}

impl TerminalFullscreen {
    /// Host writing escapes to stdout
    pub fn new(send_escape: bool) -> Self {
        Self::with_writer(send_escape, Box::new(io::stdout()))
    }

    pub fn with_writer(send_escape: bool, out: Box<dyn Write + Send>) -> Self {
        Self {
            active: false,
            send_escape,
            out,
        }
    }

    fn switch(&mut self, on: bool) -> Result<(), FullscreenError> {
        match (self.send_escape, on) {
            (true, true) => execute!(self.out, Maximize)?,
            (true, false) => execute!(self.out, Restore)?,
            (false, _) => {}
        }
        self.active = on;
        debug!(on, escape = self.send_escape, "terminal fullscreen");
        Ok(())
    }
}

impl FullscreenHost for TerminalFullscreen {
    fn is_active(&self) -> bool {
        self.active
    }

    fn request(&mut self) -> Result<(), FullscreenError> {
        self.switch(true)
    }

    fn exit(&mut self) -> Result<(), FullscreenError> {
        self.switch(false)
    }
}
