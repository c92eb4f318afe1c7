//! Procedural rain loop
//!
//! Used when no ambient file can be decoded. Two channels of pink noise are
//! softened by a low-pass, sprinkled with short noisy drop transients, and
//! the tail is crossfaded into the head so the buffer loops without a seam.

use crate::loader::{LoadedTrack, TrackMetadata};

/// Title reported for the generated track
pub const SYNTH_TITLE: &str = "Synthesized rain";
/// Length of the generated loop (seconds)
pub const LOOP_SECS: f32 = 20.0;

/// Crossfade at the loop point (seconds)
const SEAM_SECS: f32 = 0.5;
/// Low-pass cutoff for the hiss (Hz)
const HISS_CUTOFF_HZ: f32 = 5000.0;
const HISS_GAIN: f32 = 1.2;
/// Average drop transients per second
const DROPS_PER_SEC: f32 = 40.0;

/// Per-channel noise shaping state
#[derive(Default)]
struct Channel {
    /// Kellet economy pink filter
    b0: f32,
    b1: f32,
    b2: f32,
    /// One-pole low-pass
    lp: f32,
    /// Current drop envelope
    drop: f32,
}

/// Deterministic rain generator
pub struct RainSynth {
    sample_rate: u32,
    random_state: u64,
    lowpass_coeff: f32,
    drop_chance: f32,
    channels: [Channel; 2],
}

impl RainSynth {
    pub fn new(sample_rate: u32) -> Self {
        let sample_rate = sample_rate.max(1);
        let sr = sample_rate as f32;
        Self {
            sample_rate,
            random_state: 0x5EED_0F_5A1E_5EA5,
            lowpass_coeff: (-2.0 * std::f32::consts::PI * HISS_CUTOFF_HZ / sr).exp(),
            drop_chance: DROPS_PER_SEC / sr,
            channels: Default::default(),
        }
    }

    /// xorshift64, mapped to [0, 1)
    fn next_random(&mut self) -> f32 {
        self.random_state ^= self.random_state << 13;
        self.random_state ^= self.random_state >> 7;
        self.random_state ^= self.random_state << 17;
        (self.random_state >> 40) as f32 / (1u64 << 24) as f32
    }

    fn white(&mut self) -> f32 {
        self.next_random() * 2.0 - 1.0
    }

    fn sample(&mut self, ch: usize) -> f32 {
        let white = self.white();
        let spark = self.next_random();
        let loudness = self.next_random();
        let decay = self.next_random();
        let sr = self.sample_rate as f32;
        let coeff = self.lowpass_coeff;
        let chance = self.drop_chance;

        let c = &mut self.channels[ch];
        c.b0 = 0.99886 * c.b0 + white * 0.0555179;
        c.b1 = 0.99332 * c.b1 + white * 0.0750759;
        c.b2 = 0.96900 * c.b2 + white * 0.1538520;
        let pink = (c.b0 + c.b1 + c.b2 + white * 0.5362) * 0.11;
        c.lp = coeff * c.lp + (1.0 - coeff) * pink;

        if spark < chance {
            c.drop = c.drop.max(0.05 + loudness * 0.2);
        }
        let drop = c.drop * white;
        // Drops ring for 3-8 ms
        let ring_secs = 0.003 + decay * 0.005;
        c.drop *= (1.0 - 1.0 / (ring_secs * sr)).max(0.0);

        (c.lp * HISS_GAIN + drop).clamp(-1.0, 1.0)
    }

    /// Render `seconds` of seamless interleaved stereo rain
    pub fn render(&mut self, seconds: f32) -> Vec<f32> {
        let frames = ((seconds.max(0.0) * self.sample_rate as f32) as usize).max(1);
        let seam = ((SEAM_SECS * self.sample_rate as f32) as usize).min(frames / 2);

        let mut out = Vec::with_capacity((frames + seam) * 2);
        for _ in 0..frames + seam {
            out.push(self.sample(0));
            out.push(self.sample(1));
        }

        // Fold the overhang onto the start: the last frame then leads into
        // frame 0 exactly as it led into the overhang
        for i in 0..seam {
            let t = i as f32 / seam as f32;
            let (fade_in, fade_out) = (t.sqrt(), (1.0 - t).sqrt());
            for ch in 0..2 {
                let head = out[i * 2 + ch];
                let tail = out[(frames + i) * 2 + ch];
                out[i * 2 + ch] = head * fade_in + tail * fade_out;
            }
        }
        out.truncate(frames * 2);
        out
    }

    /// A `LOOP_SECS` loop packaged like a decoded file
    pub fn track(&mut self) -> LoadedTrack {
        let samples = self.render(LOOP_SECS);
        LoadedTrack {
            metadata: TrackMetadata {
                title: SYNTH_TITLE.to_string(),
                duration_secs: (samples.len() / 2) as f64 / self.sample_rate as f64,
                source_sample_rate: self.sample_rate,
                source_channels: 2,
            },
            samples,
            sample_rate: self.sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    #[test]
    fn test_render_length_and_range() {
        let samples = RainSynth::new(8000).render(2.0);
        assert_eq!(samples.len(), 2 * 16000);
        assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
    }

    #[test]
    fn test_rain_is_audible_but_not_loud() {
        let samples = RainSynth::new(8000).render(2.0);
        let level = rms(&samples);
        assert!(level > 0.01, "too quiet: {}", level);
        assert!(level < 0.5, "too loud: {}", level);
    }

    #[test]
    fn test_channels_differ() {
        let samples = RainSynth::new(8000).render(1.0);
        let differs = samples.chunks_exact(2).filter(|f| f[0] != f[1]).count();
        assert!(differs > samples.len() / 4);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            RainSynth::new(8000).render(0.5),
            RainSynth::new(8000).render(0.5)
        );
    }

    #[test]
    fn test_loop_point_continues_the_stream() {
        let sr = 8000;
        let frames = 2 * sr as usize;
        let seam = (SEAM_SECS * sr as f32) as usize;
        let looped = RainSynth::new(sr).render(2.0);

        let mut raw = RainSynth::new(sr);
        let stream: Vec<[f32; 2]> = (0..frames + seam)
            .map(|_| [raw.sample(0), raw.sample(1)])
            .collect();

        // The last frame is untouched and frame 0 is what followed it
        assert_eq!(looped[frames * 2 - 2..], stream[frames - 1]);
        assert_eq!(looped[..2], stream[frames]);
        // Past the crossfade the head is the raw stream again
        assert_eq!(looped[seam * 2..seam * 2 + 2], stream[seam]);
    }

    #[test]
    fn test_track_metadata() {
        let track = RainSynth::new(8000).track();
        assert_eq!(track.sample_rate, 8000);
        assert_eq!(track.metadata.title, SYNTH_TITLE);
        assert!((track.metadata.duration_secs - LOOP_SECS as f64).abs() < 1e-3);
        assert_eq!(track.samples.len() % 2, 0);
    }
}
