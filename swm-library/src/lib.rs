//! Assets for SWM - ambient track loading, generated rain and user configuration

mod config;
mod loader;
mod rain;

pub use config::{Config, DEFAULT_TRACK};
pub use loader::{to_stereo, AmbientTrack, LoadError, LoadedTrack, TrackLoader, TrackMetadata};
pub use rain::{RainSynth, LOOP_SECS, SYNTH_TITLE};
