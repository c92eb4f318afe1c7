//! Modal keyboard input handling for SWM

mod commands;
mod modal;

pub use commands::Command;
pub use modal::{InputHandler, Mode};
