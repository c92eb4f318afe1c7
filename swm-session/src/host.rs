//! Collaborators the controller drives but does not own the internals of

use thiserror::Error;

/// Why an ambient playback request did not start audio
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no audio output device")]
    NoDevice,
    #[error("ambient track not loaded")]
    NotLoaded,
    #[error("audio engine is not running")]
    Disconnected,
    #[error("audio command queue is full")]
    QueueFull,
}

/// Fullscreen request failures
#[derive(Error, Debug)]
pub enum FullscreenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The looping ambient track output
pub trait AmbientAudio {
    /// Start or continue playback from the current position
    fn play(&mut self) -> Result<(), PlaybackError>;
    /// Stop output, keeping the position
    fn pause(&mut self);
    /// Set output gain (0.0 - 1.0)
    fn set_volume(&mut self, gain: f32);
    /// Seek back to the start of the track
    fn rewind(&mut self);
}

/// A surface that can be switched to fullscreen.
///
/// Requests may complete asynchronously; `is_active` reports what the
/// surface believes right now.
pub trait FullscreenHost {
    fn is_active(&self) -> bool;
    fn request(&mut self) -> Result<(), FullscreenError>;
    fn exit(&mut self) -> Result<(), FullscreenError>;
}
