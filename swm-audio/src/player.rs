//! Ambient player - looping playback of one decoded track

use std::sync::Arc;

/// Playback state for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing loaded
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Player state for UI rendering
#[derive(Debug, Clone, Default)]
pub struct PlayerState {
    pub playback: PlaybackState,
    pub position: f64, // seconds
    pub duration: f64, // seconds
    pub volume: f32,   // 0.0 - 1.0
    pub looping: bool,
    pub loops: u32,
    pub track_name: Option<String>,
}

/// What happened when the read head reached the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTrack {
    /// Wrapped back to the start
    Looped,
    /// Stopped at the end (looping disabled)
    Ended,
}

/// Single-track player with native looping and click-free volume changes
pub struct AmbientPlayer {
    /// Interleaved stereo samples - Arc to avoid copying through channels
    samples: Arc<Vec<f32>>,
    sample_rate: u32,
    /// Read head in stereo frames
    position: usize,
    state: PlaybackState,
    /// Wrap to the start at end of buffer
    looping: bool,
    /// Target gain
    volume: f32,
    /// Smoothed gain (interpolates toward volume to prevent clicks)
    smoothed_volume: f32,
    track_name: Option<String>,
    /// Completed passes through the track
    loops: u32,
    /// End-of-track notice waiting to be picked up by the command loop
    pending_end: Option<EndOfTrack>,
}

impl AmbientPlayer {
    /// Smoothing coefficient for volume (~5ms at 48kHz)
    const VOLUME_SMOOTH_COEFF: f32 = 0.995;

    /// Create an empty player
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Arc::new(Vec::new()),
            sample_rate,
            position: 0,
            state: PlaybackState::Stopped,
            looping: true,
            volume: 0.5,
            smoothed_volume: 0.5,
            track_name: None,
            loops: 0,
            pending_end: None,
        }
    }

    /// Load interleaved stereo samples. Playback state is kept so a track
    /// loaded while "playing" starts immediately.
    pub fn load(&mut self, samples: Arc<Vec<f32>>, sample_rate: u32, name: Option<String>) {
        self.samples = samples;
        self.sample_rate = sample_rate.max(1);
        self.position = 0;
        self.loops = 0;
        self.pending_end = None;
        self.track_name = name;
        if self.state == PlaybackState::Stopped {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn is_loaded(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Start playback. Returns false if nothing is loaded.
    pub fn play(&mut self) -> bool {
        if !self.is_loaded() {
            return false;
        }
        self.state = PlaybackState::Playing;
        true
    }

    /// Pause, keeping position
    pub fn pause(&mut self) {
        if self.is_loaded() {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Number of stereo frames loaded
    fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn position_secs(&self) -> f64 {
        self.position as f64 / self.sample_rate as f64
    }

    /// Take the end-of-track notice, if any
    pub fn take_end_of_track(&mut self) -> Option<EndOfTrack> {
        self.pending_end.take()
    }

    /// Get current state for UI
    pub fn state(&self) -> PlayerState {
        PlayerState {
            playback: self.state,
            position: self.position_secs(),
            duration: self.duration(),
            volume: self.volume,
            looping: self.looping,
            loops: self.loops,
            track_name: self.track_name.clone(),
        }
    }

    /// Render into an interleaved stereo buffer
    pub fn process(&mut self, output: &mut [f32]) {
        let frames = self.frames();
        if self.state != PlaybackState::Playing || frames == 0 {
            output.fill(0.0);
            return;
        }

        for frame in output.chunks_mut(2) {
            // Stopped mid-buffer at end of track
            if self.state != PlaybackState::Playing {
                frame.fill(0.0);
                continue;
            }

            self.smoothed_volume = Self::VOLUME_SMOOTH_COEFF * self.smoothed_volume
                + (1.0 - Self::VOLUME_SMOOTH_COEFF) * self.volume;

            if self.position >= frames {
                self.loops = self.loops.wrapping_add(1);
                if self.looping {
                    self.position = 0;
                    self.pending_end = Some(EndOfTrack::Looped);
                } else {
                    self.state = PlaybackState::Paused;
                    self.pending_end = Some(EndOfTrack::Ended);
                    frame.fill(0.0);
                    continue;
                }
            }

            let idx = self.position * 2;
            frame[0] = self.samples[idx] * self.smoothed_volume;
            if let Some(right) = frame.get_mut(1) {
                *right = self.samples[idx + 1] * self.smoothed_volume;
            }
            self.position += 1;
        }
    }
}

impl Default for AmbientPlayer {
    fn default() -> Self {
        Self::new(48000)
    }
}
