//! Audio engine - command/event plumbing between the UI and the output thread

use crate::player::{AmbientPlayer, EndOfTrack, PlayerState};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use swm_session::{AmbientAudio, PlaybackError};
use tracing::debug;

/// Commands sent to the audio engine
#[derive(Debug, Clone)]
pub enum AudioCommand {
    /// Load a decoded track (interleaved stereo samples, sample_rate, name).
    /// Arc avoids copying sample data through the channel.
    Load(Arc<Vec<f32>>, u32, Option<String>),
    Play,
    Pause,
    Rewind,
    SetVolume(f32),
    SetLooping(bool),

    // System
    Shutdown,
}

/// Events sent from the audio engine
#[derive(Debug, Clone)]
pub enum AudioEvent {
    /// Output stream is open
    DeviceReady { sample_rate: u32, channels: u16 },
    /// Periodic state update for UI rendering
    StateUpdate(PlayerState),
    /// Track loaded and ready to play
    TrackLoaded { name: Option<String>, duration: f64 },
    /// Player wrapped to the start on its own
    Looped,
    /// Player stopped at the end of the track
    TrackEnded,
    /// Error occurred
    Error(String),
}

/// Output health shared between the engine handle and the output thread
#[derive(Debug, Default)]
pub struct OutputStatus {
    device_failed: AtomicBool,
    track_loaded: AtomicBool,
}

impl OutputStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_device_failed(&self) {
        self.device_failed.store(true, Ordering::Relaxed);
    }

    pub fn mark_track_loaded(&self) {
        self.track_loaded.store(true, Ordering::Relaxed);
    }

    pub fn device_failed(&self) -> bool {
        self.device_failed.load(Ordering::Relaxed)
    }

    pub fn track_loaded(&self) -> bool {
        self.track_loaded.load(Ordering::Relaxed)
    }
}

/// Audio engine state (held in audio thread)
pub struct EngineState {
    pub player: AmbientPlayer,
    status: Arc<OutputStatus>,
}

impl EngineState {
    pub fn new(sample_rate: u32, status: Arc<OutputStatus>) -> Self {
        Self {
            player: AmbientPlayer::new(sample_rate),
            status,
        }
    }

    /// Process a command. Returns an event to forward, if any.
    pub fn handle_command(&mut self, cmd: AudioCommand) -> Option<AudioEvent> {
        match cmd {
            AudioCommand::Load(samples, sr, name) => {
                self.player.load(samples, sr, name.clone());
                if !self.player.is_loaded() {
                    return Some(AudioEvent::Error("ambient track is empty".into()));
                }
                self.status.mark_track_loaded();
                return Some(AudioEvent::TrackLoaded {
                    name,
                    duration: self.player.duration(),
                });
            }
            AudioCommand::Play => {
                if !self.player.play() {
                    debug!("play ignored: no track loaded");
                }
            }
            AudioCommand::Pause => self.player.pause(),
            AudioCommand::Rewind => self.player.rewind(),
            AudioCommand::SetVolume(volume) => self.player.set_volume(volume),
            AudioCommand::SetLooping(looping) => self.player.set_looping(looping),
            AudioCommand::Shutdown => {}
        }
        None
    }

    /// Turn a pending end-of-track notice into an event
    pub fn take_end_event(&mut self) -> Option<AudioEvent> {
        self.player.take_end_of_track().map(|end| match end {
            EndOfTrack::Looped => AudioEvent::Looped,
            EndOfTrack::Ended => AudioEvent::TrackEnded,
        })
    }

    /// Get state snapshot for the UI
    pub fn get_state(&self) -> AudioEvent {
        AudioEvent::StateUpdate(self.player.state())
    }

    /// Render interleaved stereo output
    pub fn process(&mut self, output: &mut [f32]) {
        self.player.process(output);
    }
}

/// Handle to communicate with the audio engine
pub struct AudioEngine {
    /// Send commands to audio thread
    pub command_tx: Sender<AudioCommand>,
    /// Receive events from audio thread
    pub event_rx: Receiver<AudioEvent>,
    status: Arc<OutputStatus>,
}

impl AudioEngine {
    /// Create channels for engine communication
    pub fn create_channels() -> (
        Sender<AudioCommand>,
        Receiver<AudioCommand>,
        Sender<AudioEvent>,
        Receiver<AudioEvent>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(256);
        let (evt_tx, evt_rx) = bounded(256);
        (cmd_tx, cmd_rx, evt_tx, evt_rx)
    }

    /// Create a new engine handle
    pub fn new(
        command_tx: Sender<AudioCommand>,
        event_rx: Receiver<AudioEvent>,
        status: Arc<OutputStatus>,
    ) -> Self {
        Self {
            command_tx,
            event_rx,
            status,
        }
    }

    /// A controller-side handle implementing `AmbientAudio`
    pub fn remote(&self) -> AudioRemote {
        AudioRemote {
            command_tx: self.command_tx.clone(),
            status: self.status.clone(),
        }
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_tx.try_send(AudioCommand::Shutdown);
    }
}

/// Command-only engine handle handed to the timer controller
#[derive(Clone)]
pub struct AudioRemote {
    command_tx: Sender<AudioCommand>,
    status: Arc<OutputStatus>,
}

impl AudioRemote {
    fn try_send(&self, cmd: AudioCommand) -> Result<(), PlaybackError> {
        self.command_tx.try_send(cmd).map_err(|e| match e {
            TrySendError::Full(_) => PlaybackError::QueueFull,
            TrySendError::Disconnected(_) => PlaybackError::Disconnected,
        })
    }
}

impl AmbientAudio for AudioRemote {
    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.status.device_failed() {
            return Err(PlaybackError::NoDevice);
        }
        if !self.status.track_loaded() {
            return Err(PlaybackError::NotLoaded);
        }
        self.try_send(AudioCommand::Play)
    }

    fn pause(&mut self) {
        let _ = self.try_send(AudioCommand::Pause);
    }

    fn set_volume(&mut self, gain: f32) {
        let _ = self.try_send(AudioCommand::SetVolume(gain));
    }

    fn rewind(&mut self) {
        let _ = self.try_send(AudioCommand::Rewind);
    }
}
