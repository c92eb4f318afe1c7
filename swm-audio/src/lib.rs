//! Audio engine for SWM - ambient loop player and output stream
//!
//! - Player: looping playback of one decoded track with smoothed volume
//! - Engine: command/event channels and the controller-facing remote
//! - Output: the cpal stream and its command loop

mod engine;
mod output;
mod player;

pub use engine::{AudioCommand, AudioEngine, AudioEvent, AudioRemote, EngineState, OutputStatus};
pub use output::{run_output_thread, OutputError};
pub use player::{AmbientPlayer, EndOfTrack, PlaybackState, PlayerState};
