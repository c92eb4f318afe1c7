//! Output thread - opens the cpal stream and runs the command loop

use crate::engine::{AudioCommand, AudioEvent, EngineState, OutputStatus};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

/// Errors opening the audio output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("No audio output device found")]
    NoDevice,
    #[error("Failed to get audio config: {0}")]
    Config(String),
    #[error("Failed to create audio stream: {0}")]
    Stream(String),
    #[error("Failed to start audio: {0}")]
    Play(String),
}

/// Interval between UI state updates (~10fps is plenty for a clock)
const STATE_UPDATE_INTERVAL: Duration = Duration::from_millis(100);

/// Open the default output device and serve engine commands until
/// shutdown. Device failures are reported as `AudioEvent::Error` and leave
/// the engine silent.
pub fn run_output_thread(
    cmd_rx: Receiver<AudioCommand>,
    evt_tx: Sender<AudioEvent>,
    status: Arc<OutputStatus>,
    shutdown: Arc<AtomicBool>,
) {
    let engine_state = Arc::new(Mutex::new(EngineState::new(48000, status.clone())));

    // The stream must live on this thread for as long as we serve commands
    let _stream = match open_stream(engine_state.clone()) {
        Ok((stream, sample_rate, channels)) => {
            info!(sample_rate, channels, "audio output ready");
            engine_state.lock().player = crate::player::AmbientPlayer::new(sample_rate);
            let _ = evt_tx.send(AudioEvent::DeviceReady {
                sample_rate,
                channels,
            });
            Some(stream)
        }
        Err(e) => {
            warn!("audio output unavailable: {}", e);
            status.mark_device_failed();
            let _ = evt_tx.send(AudioEvent::Error(e.to_string()));
            None
        }
    };

    let mut last_state_update = Instant::now();

    // Command processing loop
    while !shutdown.load(Ordering::Relaxed) {
        match cmd_rx.recv_timeout(Duration::from_millis(10)) {
            Ok(AudioCommand::Shutdown) => break,
            Ok(cmd) => {
                if let Some(event) = engine_state.lock().handle_command(cmd) {
                    let _ = evt_tx.try_send(event);
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(event) = engine_state.lock().take_end_event() {
            let _ = evt_tx.try_send(event);
        }

        // Send state updates periodically
        if last_state_update.elapsed() >= STATE_UPDATE_INTERVAL {
            let _ = evt_tx.try_send(engine_state.lock().get_state());
            last_state_update = Instant::now();
        }
    }

    info!("audio thread exiting");
}

fn open_stream(
    engine_state: Arc<Mutex<EngineState>>,
) -> Result<(cpal::Stream, u32, u16), OutputError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(OutputError::NoDevice)?;

    let config = device
        .default_output_config()
        .map_err(|e| OutputError::Config(e.to_string()))?;

    let sample_rate = config.sample_rate().0;
    let channels = config.channels();
    let channel_count = channels as usize;

    // Stereo scratch buffer for non-stereo devices, grown outside the
    // steady state only
    let mut stereo_buffer = vec![0.0f32; 16384];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                // try_lock: never block the real-time thread, output
                // silence on contention
                let Some(mut state) = engine_state.try_lock() else {
                    data.fill(0.0);
                    return;
                };

                if channel_count == 2 {
                    state.process(data);
                    return;
                }

                let frames = data.len() / channel_count.max(1);
                if stereo_buffer.len() < frames * 2 {
                    stereo_buffer.resize(frames * 2, 0.0);
                }
                let stereo = &mut stereo_buffer[..frames * 2];
                state.process(stereo);

                for (frame, lr) in data.chunks_mut(channel_count).zip(stereo.chunks(2)) {
                    if channel_count == 1 {
                        frame[0] = (lr[0] + lr[1]) * 0.5;
                    } else {
                        frame.fill(0.0);
                        frame[0] = lr[0];
                        frame[1] = lr[1];
                    }
                }
            },
            |err| {
                error!("audio stream error: {}", err);
            },
            None,
        )
        .map_err(|e| OutputError::Stream(e.to_string()))?;

    stream
        .play()
        .map_err(|e| OutputError::Play(e.to_string()))?;

    Ok((stream, sample_rate, channels))
}
