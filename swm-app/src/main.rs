//! SWM - Study With Me
//!
//! Terminal focus timer with a rainy backdrop and ambient rain audio.

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::Span,
    widgets::{Block, Borders},
    Terminal,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use swm_audio::{run_output_thread, AudioCommand, AudioEngine, AudioEvent, OutputStatus};
use swm_input::{Command, InputHandler, Mode};
use swm_library::{Config, LoadError, TrackLoader};
use swm_session::{ThreadTicker, TimerController, TimerState, TICK_PERIOD};
use swm_tui::{
    App, ControlsWidget, HelpWidget, PanelWidget, RainWidget, StatusBarWidget,
    TerminalFullscreen, CONTROLS_HEIGHT, CONTROLS_WIDTH,
};

/// Frame rate for UI updates
const FPS: u64 = 30;
/// Widest the central panel gets
const PANEL_MAX_WIDTH: u16 = 60;

fn main() -> anyhow::Result<()> {
    init_logging();
    let config = Config::load();
    info!(
        minutes = config.study_minutes,
        volume = config.volume,
        muted = config.start_muted,
        track = %config.track.display(),
        "starting swm"
    );

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Create audio channels
    let (cmd_tx, cmd_rx, evt_tx, evt_rx) = AudioEngine::create_channels();
    let status = Arc::new(OutputStatus::new());

    // Shutdown flag
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_audio = shutdown.clone();
    let status_audio = status.clone();

    // Spawn audio thread
    let audio_handle = thread::Builder::new()
        .name("swm-audio".into())
        .spawn(move || run_output_thread(cmd_rx, evt_tx, status_audio, shutdown_audio))?;

    // Create engine handle for main thread
    let engine = AudioEngine::new(cmd_tx, evt_rx, status);

    // Run main event loop
    let result = run_app(&mut terminal, engine, &config, shutdown.clone());

    // Cleanup
    shutdown.store(true, Ordering::SeqCst);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Wait for audio thread
    let _ = audio_handle.join();
    info!("swm stopped");

    result
}

/// Log to `<data_dir>/swm/swm.log`. stdout belongs to the TUI, so if the
/// file cannot be opened there is no logging at all.
fn init_logging() {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swm");
    if fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("swm.log"))
    else {
        return;
    };

    let filter = EnvFilter::try_from_env("SWM_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: AudioEngine,
    config: &Config,
    shutdown: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let (ticker, tick_rx) = ThreadTicker::new(TICK_PERIOD);
    let mut controller = TimerController::new(
        TimerState::new(config.study_minutes, config.volume, config.start_muted),
        Box::new(engine.remote()),
        Box::new(TerminalFullscreen::new(config.fullscreen_escape)),
        Box::new(ticker),
    );
    let timer_rx = controller.subscribe();

    let mut app = App::new(controller.state().clone());
    let mut input_handler = InputHandler::new();

    if let Some(name) = &config.theme {
        if !app.state.set_theme(name) {
            warn!(theme = %name, "unknown theme in config");
        }
    }
    app.state
        .set_message("SWM - Study With Me | Enter to start, e to edit minutes, ? for help");

    // Why the configured track was replaced by generated rain
    let (fallback_tx, fallback_rx) = bounded::<LoadError>(1);

    let frame_duration = Duration::from_millis(1000 / FPS);
    let mut last_frame = Instant::now();

    loop {
        // Check for shutdown
        if shutdown.load(Ordering::Relaxed) || app.should_quit {
            break;
        }

        // Countdown ticks
        while let Ok(token) = tick_rx.try_recv() {
            controller.on_tick(token);
        }

        // Process audio events
        while let Ok(event) = engine.event_rx.try_recv() {
            match &event {
                AudioEvent::DeviceReady { sample_rate, .. } => {
                    spawn_track_loader(
                        config.track.clone(),
                        *sample_rate,
                        config.native_loop,
                        engine.command_tx.clone(),
                        fallback_tx.clone(),
                    );
                }
                AudioEvent::TrackLoaded { name, duration } => {
                    info!(name = ?name, duration, "ambient track ready");
                    controller.on_audio_ready();
                }
                AudioEvent::TrackEnded => controller.on_track_ended(),
                _ => {}
            }
            app.state.handle_audio_event(&event);
        }

        while let Ok(e) = fallback_rx.try_recv() {
            app.state
                .set_warning(format!("{} - playing generated rain", e));
        }

        // Timer state for this frame
        while let Ok(event) = timer_rx.try_recv() {
            app.state.handle_timer_event(event);
        }

        // Increment frame counter for animations
        app.state.advance_frame();

        // Render
        terminal.draw(|frame| {
            render_ui(frame, &app);
        })?;

        // Handle input
        let timeout = frame_duration.saturating_sub(last_frame.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if let Some(cmd) = input_handler.handle_key(key) {
                        handle_command(&mut app, &mut controller, &mut input_handler, cmd);
                    }
                    app.state.set_mode(input_handler.mode());
                }
                Event::Resize(width, height) => {
                    debug!(width, height, "terminal resized");
                    controller.reconcile_fullscreen();
                }
                _ => {}
            }
        }

        // Maintain frame rate
        let elapsed = last_frame.elapsed();
        if elapsed < frame_duration {
            thread::sleep(frame_duration - elapsed);
        }
        last_frame = Instant::now();
    }

    // Give the window back the way we found it
    if controller.state().is_fullscreen {
        controller.toggle_fullscreen();
    }
    engine.shutdown();

    Ok(())
}

/// Decode the ambient track at the device rate off the UI thread and hand
/// it to the engine. A file that cannot be decoded is replaced by generated
/// rain and the reason is reported on `fallbacks`.
fn spawn_track_loader(
    path: PathBuf,
    sample_rate: u32,
    native_loop: bool,
    command_tx: Sender<AudioCommand>,
    fallbacks: Sender<LoadError>,
) {
    let spawned = thread::Builder::new()
        .name("swm-loader".into())
        .spawn(move || {
            let ambient = TrackLoader::with_sample_rate(sample_rate).load_ambient(&path);
            let track = ambient.track;
            info!(
                title = %track.metadata.title,
                duration = track.metadata.duration_secs,
                source_rate = track.metadata.source_sample_rate,
                "ambient track ready to load"
            );
            if let Some(e) = ambient.fallback {
                let _ = fallbacks.try_send(e);
            }
            let _ = command_tx.send(AudioCommand::SetLooping(native_loop));
            let _ = command_tx.send(AudioCommand::Load(
                Arc::new(track.samples),
                track.sample_rate,
                Some(track.metadata.title),
            ));
        });

    if let Err(e) = spawned {
        warn!("could not start track loader: {}", e);
    }
}

fn handle_command(
    app: &mut App,
    controller: &mut TimerController,
    input: &mut InputHandler,
    cmd: Command,
) {
    debug!(command = cmd.label(), "command");
    match cmd {
        // Session
        Command::Start => {
            if controller.state().is_running {
                app.state.set_message("Session already started - r to reset");
            } else {
                controller.start();
            }
        }
        Command::TogglePause => controller.toggle_pause(),
        Command::Reset => controller.reset(),

        // Duration field
        Command::EditDuration => {
            if controller.state().is_running {
                input.reset_mode();
                app.state
                    .set_warning("Reset (r) before changing the duration");
            } else {
                app.state.clear_message();
            }
        }
        Command::DurationChar(c) => controller.push_duration_char(c),
        Command::DurationBackspace => controller.pop_duration_char(),
        Command::DurationClear => controller.set_duration_text(""),

        // Ambient audio
        Command::ToggleMute => controller.toggle_mute(),
        Command::AdjustVolume(delta) => controller.adjust_volume(delta),
        Command::SetVolume(volume) => controller.set_volume(volume),

        // Screen
        Command::ToggleFullscreen => controller.toggle_fullscreen(),
        Command::CycleTheme => app.state.cycle_theme(),
        Command::HelpScrollUp => app.state.help_scroll_up(),
        Command::HelpScrollDown => app.state.help_scroll_down(),
        // Mode is synced from the input handler after every key
        Command::ToggleHelp | Command::EnterNormalMode => {}

        Command::Quit => app.quit(),
        Command::Cancel => app.state.clear_message(),
    }
}

fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let state = &app.state;
    let theme = &state.theme;
    let timer = &state.timer;

    // Fullscreen is edge-to-edge; windowed gets a frame and a status bar
    let (scene, status) = if timer.is_fullscreen {
        (area, None)
    } else {
        let [scene, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        (scene, Some(status))
    };

    frame.render_widget(RainWidget::new(state.frame_count, theme).fps(FPS), scene);

    let inner = if timer.is_fullscreen {
        scene
    } else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border())
            .title(Span::styled(" Study With Me ", theme.title()));
        let inner = block.inner(scene);
        frame.render_widget(block, scene);
        inner
    };

    // Controls overlay, top right
    let controls = Rect::new(
        inner.x + inner.width.saturating_sub(CONTROLS_WIDTH + 1),
        inner.y,
        CONTROLS_WIDTH.min(inner.width),
        CONTROLS_HEIGHT.min(inner.height),
    );
    frame.render_widget(
        ControlsWidget::new(timer, theme).audio(state.audio_status),
        controls,
    );

    // Central panel
    let panel = PanelWidget::new(timer, theme).editing(state.mode == Mode::Duration);
    let panel_area = centered_rect(inner.width.min(PANEL_MAX_WIDTH), panel.height(), inner);
    frame.render_widget(panel, panel_area);

    if let Some(status) = status {
        frame.render_widget(
            StatusBarWidget::new(state.mode, timer.phase(), theme)
                .message(state.message.as_deref(), state.message_type)
                .track(state.track_name.as_deref(), state.playback),
            status,
        );
    }

    // Help overlay
    if state.show_help {
        let help_area = centered_rect(HelpWidget::WIDTH + 4, area.height.saturating_sub(2), area);
        frame.render_widget(HelpWidget::new(theme).scroll(state.help_scroll), help_area);
    }
}

/// Create a centered rectangle
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
