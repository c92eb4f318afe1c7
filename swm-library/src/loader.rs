//! Ambient track loading and decoding

use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::{Hint, ProbeResult};
use crate::rain::RainSynth;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during track loading
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No audio track found in file")]
    NoAudioTrack,
    #[error("Track contains no samples")]
    Empty,
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Track metadata
#[derive(Debug, Clone, Default)]
pub struct TrackMetadata {
    pub title: String,
    pub duration_secs: f64,
    /// Sample rate of the file before resampling
    pub source_sample_rate: u32,
    /// Channel count of the file before stereo conversion
    pub source_channels: u16,
}

/// A loaded and decoded track, ready for the player
pub struct LoadedTrack {
    /// Interleaved stereo samples (f32, normalized to -1.0 to 1.0)
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    pub metadata: TrackMetadata,
}

/// The track to play, and why the file was passed over if it was
pub struct AmbientTrack {
    pub track: LoadedTrack,
    /// Set when `track` is the synthesized fallback
    pub fallback: Option<LoadError>,
}

/// Audio file loader using Symphonia
pub struct TrackLoader {
    target_sample_rate: u32,
}

impl Default for TrackLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackLoader {
    /// Create a new track loader with default 48kHz sample rate
    pub fn new() -> Self {
        Self::with_sample_rate(48000)
    }

    /// Create a new track loader with specific sample rate
    pub fn with_sample_rate(target_sample_rate: u32) -> Self {
        Self { target_sample_rate }
    }

    /// Decode `path`, or generate rain when it cannot be decoded. Always
    /// yields something playable.
    pub fn load_ambient(&self, path: &Path) -> AmbientTrack {
        match self.load(path) {
            Ok(track) => AmbientTrack {
                track,
                fallback: None,
            },
            Err(e) => {
                warn!(path = %path.display(), "ambient track unusable, synthesizing rain: {}", e);
                AmbientTrack {
                    track: RainSynth::new(self.target_sample_rate).track(),
                    fallback: Some(e),
                }
            }
        }
    }

    /// Load and decode an audio file into interleaved stereo at the target
    /// sample rate
    pub fn load(&self, path: &Path) -> Result<LoadedTrack, LoadError> {
        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let mut probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        let mut metadata = TrackMetadata {
            title: tagged_title(&mut probed).unwrap_or_else(|| file_title(path)),
            ..Default::default()
        };
        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(LoadError::NoAudioTrack)?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let source_sample_rate = codec_params.sample_rate.unwrap_or(44100);
        let channels = codec_params
            .channels
            .map(|c| c.count() as u16)
            .unwrap_or(2)
            .max(1);

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| LoadError::Decode(e.to_string()))?;

        metadata.source_sample_rate = source_sample_rate;
        metadata.source_channels = channels;

        let mut samples: Vec<f32> = Vec::new();
        // Any read error, including end of stream, ends the track
        while let Ok(packet) = format.next_packet() {
            if packet.track_id() != track_id {
                continue;
            }
            let Ok(audio) = decoder.decode(&packet) else {
                continue;
            };

            let mut interleaved = SampleBuffer::<f32>::new(audio.capacity() as u64, *audio.spec());
            interleaved.copy_interleaved_ref(audio);
            samples.extend_from_slice(interleaved.samples());
        }

        if samples.is_empty() {
            return Err(LoadError::Empty);
        }

        let stereo = to_stereo(&samples, channels);
        let total_frames = stereo.len() / 2;
        metadata.duration_secs = total_frames as f64 / source_sample_rate as f64;

        let (samples, final_sample_rate) = if source_sample_rate != self.target_sample_rate {
            debug!(
                from = source_sample_rate,
                to = self.target_sample_rate,
                "resampling ambient track"
            );
            (
                self.resample(&stereo, source_sample_rate)?,
                self.target_sample_rate,
            )
        } else {
            (stereo, source_sample_rate)
        };

        info!(
            title = %metadata.title,
            secs = metadata.duration_secs,
            "ambient track decoded"
        );

        Ok(LoadedTrack {
            samples,
            sample_rate: final_sample_rate,
            metadata,
        })
    }

    /// Stereo resample to `target_sample_rate`. The input is zero-padded to
    /// whole resampler chunks and the output cut back to the scaled length.
    fn resample(&self, samples: &[f32], source_rate: u32) -> Result<Vec<f32>, LoadError> {
        use rubato::{FftFixedInOut, Resampler};

        let frames = samples.len() / 2;
        let mut resampler = FftFixedInOut::<f32>::new(
            source_rate as usize,
            self.target_sample_rate as usize,
            1024,
            2,
        )
        .map_err(|e| LoadError::Decode(e.to_string()))?;

        let chunk = resampler.input_frames_next();
        let padded_len = frames.div_ceil(chunk) * chunk;
        let mut left: Vec<f32> = samples.iter().step_by(2).copied().collect();
        let mut right: Vec<f32> = samples.iter().skip(1).step_by(2).copied().collect();
        left.resize(padded_len, 0.0);
        right.resize(padded_len, 0.0);

        let wanted = (frames as u64 * self.target_sample_rate as u64 / source_rate as u64) as usize;
        let mut out_left = Vec::with_capacity(wanted + chunk);
        let mut out_right = Vec::with_capacity(wanted + chunk);

        for start in (0..padded_len).step_by(chunk) {
            let block = [&left[start..start + chunk], &right[start..start + chunk]];
            let mut rendered = resampler
                .process(&block[..], None)
                .map_err(|e| LoadError::Decode(e.to_string()))?;
            let r = rendered.pop().unwrap_or_default();
            let l = rendered.pop().unwrap_or_default();
            out_left.extend(l);
            out_right.extend(r);
        }

        let kept = wanted.min(out_left.len()).min(out_right.len());
        Ok(out_left[..kept]
            .iter()
            .zip(&out_right[..kept])
            .flat_map(|(l, r)| [*l, *r])
            .collect())
    }
}

/// Title tag from the container, or from tags read while probing (ID3v2 in
/// front of an MP3 stream lands there)
fn tagged_title(probed: &mut ProbeResult) -> Option<String> {
    if let Some(title) = probed.format.metadata().current().and_then(track_title) {
        return Some(title);
    }
    probed
        .metadata
        .get()
        .as_ref()
        .and_then(|m| m.current())
        .and_then(track_title)
}

fn track_title(revision: &MetadataRevision) -> Option<String> {
    revision
        .tags()
        .iter()
        .rev()
        .find(|tag| tag.std_key == Some(StandardTagKey::TrackTitle))
        .map(|tag| tag.value.to_string())
        .filter(|title| !title.trim().is_empty())
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Unknown")
        .to_string()
}

/// Convert interleaved audio with any channel count to interleaved stereo.
/// Mono is duplicated; extra channels beyond the first two are dropped.
pub fn to_stereo(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.iter().flat_map(|s| [*s, *s]).collect(),
        2 => samples.to_vec(),
        n => samples
            .chunks_exact(n as usize)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    }
}
