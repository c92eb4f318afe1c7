//! Timer controller - owns the session state and exposes intents
//!
//! All mutation happens through the methods below, on one thread. Observers
//! get a `TimerEvent::StateChanged` snapshot after every change so the screen
//! can redraw.

use crate::duration::{minutes_to_secs, DurationInput};
use crate::events::{Subscribers, TimerEvent};
use crate::host::{AmbientAudio, FullscreenHost};
use crate::state::{SessionPhase, TimerState};
use crate::ticker::{TickSource, TickToken};
use crossbeam_channel::Receiver;
use tracing::{debug, info, warn};

/// State-owning controller for the study timer
pub struct TimerController {
    state: TimerState,
    duration: DurationInput,
    audio: Box<dyn AmbientAudio>,
    fullscreen: Box<dyn FullscreenHost>,
    ticker: Box<dyn TickSource>,
    /// Generation counter for tick armings
    generation: u64,
    /// Token of the current arming, if the ticker is armed
    armed: Option<TickToken>,
    /// SessionFinished already sent for the current session
    finished_reported: bool,
    subscribers: Subscribers,
}

impl TimerController {
    /// Create a controller and push the initial volume/mute state to the
    /// audio output.
    pub fn new(
        initial: TimerState,
        audio: Box<dyn AmbientAudio>,
        fullscreen: Box<dyn FullscreenHost>,
        ticker: Box<dyn TickSource>,
    ) -> Self {
        let duration = DurationInput::new(initial.duration_text.clone());
        let mut controller = Self {
            state: initial,
            duration,
            audio,
            fullscreen,
            ticker,
            generation: 0,
            armed: None,
            finished_reported: false,
            subscribers: Subscribers::new(),
        };
        controller.push_volume();
        controller.apply_mute();
        controller
    }

    /// Read-only snapshot
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// Register an observer
    pub fn subscribe(&mut self) -> Receiver<TimerEvent> {
        self.subscribers.subscribe()
    }

    // --- Duration field ---

    /// Replace the duration field text. Ignored once a session is running.
    pub fn set_duration_text(&mut self, text: &str) {
        if self.state.is_running {
            return;
        }
        self.duration.set(text);
        self.sync_duration();
    }

    /// Type a character into the duration field
    pub fn push_duration_char(&mut self, c: char) {
        if self.state.is_running || !self.duration.push(c) {
            return;
        }
        self.sync_duration();
    }

    /// Delete the last character of the duration field
    pub fn pop_duration_char(&mut self) {
        if self.state.is_running || self.duration.pop().is_none() {
            return;
        }
        self.sync_duration();
    }

    fn sync_duration(&mut self) {
        self.state.duration_text = self.duration.text().to_string();
        self.state.study_minutes = self.duration.minutes();
        self.preview_duration();
        self.changed();
    }

    /// While Idle the countdown mirrors the duration field
    fn preview_duration(&mut self) {
        self.state.remaining_secs = minutes_to_secs(self.state.study_minutes);
    }

    // --- Countdown ---

    /// Start a session from Idle
    pub fn start(&mut self) {
        if self.state.is_running {
            debug!("start ignored: session already started");
            return;
        }

        self.state.remaining_secs = minutes_to_secs(self.state.study_minutes);
        self.state.is_running = true;
        self.state.is_paused = false;
        self.state.show_title = false;
        self.finished_reported = false;

        info!(
            minutes = self.state.study_minutes,
            seconds = self.state.remaining_secs,
            "session started"
        );
        self.subscribers.emit(TimerEvent::SessionStarted {
            seconds: self.state.remaining_secs,
        });

        if self.state.remaining_secs > 0 {
            self.arm_ticker();
        }
        if !self.state.is_muted {
            self.try_play();
        }
        self.changed();
        self.report_finished();
    }

    /// Suspend ticking. No effect unless running.
    pub fn pause(&mut self) {
        if !self.state.is_running || self.state.is_paused {
            return;
        }
        self.state.is_paused = true;
        self.disarm_ticker();
        debug!(remaining = self.state.remaining_secs, "paused");
        self.changed();
    }

    /// Continue a paused session
    pub fn resume(&mut self) {
        if !self.state.is_paused {
            return;
        }
        self.state.is_paused = false;
        if self.state.remaining_secs > 0 {
            self.arm_ticker();
        }
        debug!(remaining = self.state.remaining_secs, "resumed");
        self.changed();
    }

    /// The single pause/resume control
    pub fn toggle_pause(&mut self) {
        if self.state.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Abandon the current session and return to Idle
    pub fn reset(&mut self) {
        if !self.state.is_running {
            return;
        }
        self.disarm_ticker();
        self.state.is_running = false;
        self.state.is_paused = false;
        info!(remaining = self.state.remaining_secs, "session reset");
        self.preview_duration();
        self.changed();
    }

    /// Handle a tick delivered by the tick source. Returns true if the
    /// countdown moved.
    pub fn on_tick(&mut self, token: TickToken) -> bool {
        if self.armed != Some(token) {
            return false;
        }
        if !self.state.is_ticking() {
            self.disarm_ticker();
            return false;
        }

        self.state.remaining_secs -= 1;
        if self.state.remaining_secs == 0 {
            self.disarm_ticker();
        }
        self.changed();
        self.report_finished();
        true
    }

    fn report_finished(&mut self) {
        if self.state.phase() == SessionPhase::Finished && !self.finished_reported {
            self.finished_reported = true;
            info!("session finished");
            self.subscribers.emit(TimerEvent::SessionFinished);
        }
    }

    fn arm_ticker(&mut self) {
        self.generation += 1;
        let token = TickToken(self.generation);
        self.ticker.arm(token);
        self.armed = Some(token);
    }

    fn disarm_ticker(&mut self) {
        if self.armed.take().is_some() {
            self.ticker.disarm();
        }
    }

    // --- Audio ---

    /// Flip mute. Volume is left alone.
    pub fn toggle_mute(&mut self) {
        self.state.is_muted = !self.state.is_muted;
        self.apply_mute();
        self.changed();
    }

    /// Slider semantics: 0 mutes, any positive value unmutes
    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        self.state.volume = volume;
        self.push_volume();

        if volume == 0 {
            if !self.state.is_muted {
                self.state.is_muted = true;
                self.apply_mute();
            }
        } else if self.state.is_muted {
            self.state.is_muted = false;
            self.apply_mute();
        }
        self.changed();
    }

    /// Step the slider by `delta` percent
    pub fn adjust_volume(&mut self, delta: i16) {
        let volume = (self.state.volume as i16 + delta).clamp(0, 100) as u8;
        self.set_volume(volume);
    }

    /// The ambient track finished; loop it by hand unless muted
    pub fn on_track_ended(&mut self) {
        if self.state.is_muted {
            return;
        }
        self.audio.rewind();
        self.try_play();
    }

    /// The ambient track became available; start it if unmuted
    pub fn on_audio_ready(&mut self) {
        if !self.state.is_muted {
            self.try_play();
        }
    }

    fn push_volume(&mut self) {
        self.audio.set_volume(self.state.volume as f32 / 100.0);
    }

    fn apply_mute(&mut self) {
        if self.state.is_muted {
            self.audio.pause();
        } else {
            self.try_play();
        }
    }

    /// Playback failures are logged and otherwise ignored
    fn try_play(&mut self) {
        if let Err(e) = self.audio.play() {
            warn!("audio play failed: {}", e);
        }
    }

    // --- Fullscreen ---

    /// Request fullscreen if the host is windowed, exit otherwise. The flag
    /// is updated without waiting for the host.
    pub fn toggle_fullscreen(&mut self) {
        if !self.fullscreen.is_active() {
            if let Err(e) = self.fullscreen.request() {
                warn!("fullscreen request failed: {}", e);
            }
            self.state.is_fullscreen = true;
        } else {
            if let Err(e) = self.fullscreen.exit() {
                warn!("fullscreen exit failed: {}", e);
            }
            self.state.is_fullscreen = false;
        }
        self.changed();
    }

    /// Re-read the host state and fix a stale flag. Returns true if the
    /// flag changed.
    pub fn reconcile_fullscreen(&mut self) -> bool {
        let actual = self.fullscreen.is_active();
        if actual == self.state.is_fullscreen {
            return false;
        }
        debug!(actual, "fullscreen flag reconciled");
        self.state.is_fullscreen = actual;
        self.changed();
        true
    }

    fn changed(&mut self) {
        self.subscribers
            .emit(TimerEvent::StateChanged(self.state.clone()));
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        self.disarm_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FullscreenError, PlaybackError};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    struct AudioLog {
        playing: bool,
        plays: usize,
        pauses: usize,
        rewinds: usize,
        gain: f32,
        fail_play: bool,
    }

    struct FakeAudio(Rc<RefCell<AudioLog>>);

    impl AmbientAudio for FakeAudio {
        fn play(&mut self) -> Result<(), PlaybackError> {
            let mut log = self.0.borrow_mut();
            log.plays += 1;
            if log.fail_play {
                return Err(PlaybackError::NotLoaded);
            }
            log.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            let mut log = self.0.borrow_mut();
            log.pauses += 1;
            log.playing = false;
        }

        fn set_volume(&mut self, gain: f32) {
            self.0.borrow_mut().gain = gain;
        }

        fn rewind(&mut self) {
            self.0.borrow_mut().rewinds += 1;
        }
    }

    #[derive(Debug, Default)]
    struct ScreenLog {
        active: bool,
        requests: usize,
        exits: usize,
        /// Simulates a host that applies requests later
        deferred: bool,
    }

    struct FakeScreen(Rc<RefCell<ScreenLog>>);

    impl FullscreenHost for FakeScreen {
        fn is_active(&self) -> bool {
            self.0.borrow().active
        }

        fn request(&mut self) -> Result<(), FullscreenError> {
            let mut log = self.0.borrow_mut();
            log.requests += 1;
            if !log.deferred {
                log.active = true;
            }
            Ok(())
        }

        fn exit(&mut self) -> Result<(), FullscreenError> {
            let mut log = self.0.borrow_mut();
            log.exits += 1;
            if !log.deferred {
                log.active = false;
            }
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct TickLog {
        armed: Option<TickToken>,
        arms: usize,
        disarms: usize,
    }

    struct FakeTicker(Rc<RefCell<TickLog>>);

    impl TickSource for FakeTicker {
        fn arm(&mut self, token: TickToken) {
            let mut log = self.0.borrow_mut();
            log.armed = Some(token);
            log.arms += 1;
        }

        fn disarm(&mut self) {
            let mut log = self.0.borrow_mut();
            log.armed = None;
            log.disarms += 1;
        }
    }

    struct Harness {
        ctl: TimerController,
        audio: Rc<RefCell<AudioLog>>,
        screen: Rc<RefCell<ScreenLog>>,
        ticks: Rc<RefCell<TickLog>>,
    }

    impl Harness {
        fn new(state: TimerState) -> Self {
            let audio = Rc::new(RefCell::new(AudioLog::default()));
            let screen = Rc::new(RefCell::new(ScreenLog::default()));
            let ticks = Rc::new(RefCell::new(TickLog::default()));
            let ctl = TimerController::new(
                state,
                Box::new(FakeAudio(audio.clone())),
                Box::new(FakeScreen(screen.clone())),
                Box::new(FakeTicker(ticks.clone())),
            );
            Self {
                ctl,
                audio,
                screen,
                ticks,
            }
        }

        fn with_minutes(minutes: &str) -> Self {
            let mut h = Self::new(TimerState::default());
            h.ctl.set_duration_text(minutes);
            h
        }

        /// Deliver one tick with the currently armed token
        fn tick(&mut self) -> bool {
            let token = self.ticks.borrow().armed;
            match token {
                Some(token) => self.ctl.on_tick(token),
                None => false,
            }
        }
    }

    #[test]
    fn test_start_sets_remaining_from_minutes() {
        for minutes in [1i64, 2, 25, 90, 600] {
            let mut h = Harness::with_minutes(&minutes.to_string());
            h.ctl.start();
            assert_eq!(h.ctl.state().remaining_secs, (minutes * 60) as u64);
            assert!(h.ctl.state().is_running);
            assert!(!h.ctl.state().show_title);
            assert_eq!(h.ctl.phase(), SessionPhase::Running);
            assert!(h.ticks.borrow().armed.is_some());
        }
    }

    #[test]
    fn test_one_minute_session_counts_to_zero() {
        let mut h = Harness::with_minutes("1");
        h.ctl.start();
        assert_eq!(h.ctl.state().remaining_secs, 60);

        for expected in (0..60).rev() {
            assert!(h.tick());
            assert_eq!(h.ctl.state().remaining_secs, expected);
        }

        // Ticker disarmed at zero, no further decrements
        assert!(h.ticks.borrow().armed.is_none());
        assert!(!h.tick());
        assert_eq!(h.ctl.state().remaining_secs, 0);
        assert_eq!(h.ctl.phase(), SessionPhase::Finished);
    }

    #[test]
    fn test_pause_resume_preserves_remaining() {
        let mut h = Harness::with_minutes("1");
        h.ctl.start();
        for _ in 0..15 {
            h.tick();
        }
        assert_eq!(h.ctl.state().remaining_secs, 45);

        let stale = h.ticks.borrow().armed.unwrap();
        h.ctl.pause();
        assert_eq!(h.ctl.phase(), SessionPhase::Paused);
        assert!(h.ticks.borrow().armed.is_none());

        // A tick already in flight when pausing is ignored
        assert!(!h.ctl.on_tick(stale));
        assert_eq!(h.ctl.state().remaining_secs, 45);

        h.ctl.resume();
        assert_eq!(h.ctl.state().remaining_secs, 45);
        assert_eq!(h.ctl.phase(), SessionPhase::Running);

        // Old arming stays stale after resume
        assert!(!h.ctl.on_tick(stale));
        assert!(h.tick());
        assert_eq!(h.ctl.state().remaining_secs, 44);
    }

    #[test]
    fn test_pause_and_resume_ignored_when_idle() {
        let mut h = Harness::new(TimerState::default());
        h.ctl.pause();
        assert!(!h.ctl.state().is_paused);
        h.ctl.resume();
        h.ctl.toggle_pause();
        assert_eq!(h.ctl.phase(), SessionPhase::Idle);
        assert_eq!(h.ticks.borrow().arms, 0);
    }

    #[test]
    fn test_toggle_pause_flips() {
        let mut h = Harness::with_minutes("5");
        h.ctl.start();
        h.ctl.toggle_pause();
        assert!(h.ctl.state().is_paused);
        h.ctl.toggle_pause();
        assert!(!h.ctl.state().is_paused);
        assert!(h.ctl.state().is_running);
    }

    #[test]
    fn test_start_only_from_idle() {
        let mut h = Harness::with_minutes("2");
        h.ctl.start();
        h.tick();
        h.ctl.set_duration_text("10");
        h.ctl.start();
        assert_eq!(h.ctl.state().remaining_secs, 119);
        assert_eq!(h.ctl.state().study_minutes, 2);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut h = Harness::with_minutes("2");
        h.ctl.start();
        h.tick();
        h.ctl.reset();

        assert_eq!(h.ctl.phase(), SessionPhase::Idle);
        assert!(h.ticks.borrow().armed.is_none());
        // Title stays hidden after the first start
        assert!(!h.ctl.state().show_title);

        h.ctl.set_duration_text("3");
        h.ctl.start();
        assert_eq!(h.ctl.state().remaining_secs, 180);
    }

    #[test]
    fn test_idle_countdown_follows_duration_field() {
        let mut h = Harness::with_minutes("30");
        h.ctl.start();
        for _ in 0..5 {
            h.tick();
        }
        assert_eq!(h.ctl.state().clock(), "29:55");

        h.ctl.reset();
        assert_eq!(h.ctl.state().remaining_secs, 1800);

        h.ctl.set_duration_text("45");
        assert_eq!(h.ctl.state().remaining_secs, 2700);
        assert_eq!(h.ctl.state().clock(), "45:00");

        h.ctl.pop_duration_char();
        assert_eq!(h.ctl.state().clock(), "04:00");

        h.ctl.set_duration_text("soon");
        assert_eq!(h.ctl.state().remaining_secs, 0);
    }

    #[test]
    fn test_invalid_duration_accepted() {
        let mut h = Harness::with_minutes("abc");
        assert_eq!(h.ctl.state().study_minutes, 0);
        assert_eq!(h.ctl.state().duration_text, "abc");

        h.ctl.start();
        assert_eq!(h.ctl.state().remaining_secs, 0);
        assert_eq!(h.ctl.phase(), SessionPhase::Finished);
        assert!(h.ticks.borrow().armed.is_none());

        let mut h = Harness::with_minutes("-5");
        assert_eq!(h.ctl.state().study_minutes, -5);
        h.ctl.start();
        assert_eq!(h.ctl.state().remaining_secs, 0);
    }

    #[test]
    fn test_duration_editing() {
        let mut h = Harness::with_minutes("");
        h.ctl.push_duration_char('4');
        h.ctl.push_duration_char('5');
        assert_eq!(h.ctl.state().study_minutes, 45);
        h.ctl.pop_duration_char();
        assert_eq!(h.ctl.state().study_minutes, 4);
        assert_eq!(h.ctl.state().duration_text, "4");
    }

    #[test]
    fn test_session_finished_emitted_once() {
        let mut h = Harness::with_minutes("1");
        let events = h.ctl.subscribe();
        h.ctl.start();
        for _ in 0..60 {
            h.tick();
        }
        h.ctl.pause();
        h.ctl.resume();

        let finished = events
            .try_iter()
            .filter(|e| *e == TimerEvent::SessionFinished)
            .count();
        assert_eq!(finished, 1);
    }

    #[test]
    fn test_state_changed_events_carry_snapshot() {
        let mut h = Harness::with_minutes("1");
        let events = h.ctl.subscribe();
        h.ctl.start();
        h.tick();

        let last = events
            .try_iter()
            .filter_map(|e| match e {
                TimerEvent::StateChanged(state) => Some(state),
                _ => None,
            })
            .last()
            .unwrap();
        assert_eq!(last.remaining_secs, 59);
    }

    #[test]
    fn test_volume_zero_mutes() {
        let mut h = Harness::new(TimerState::new(30, 50, false));
        assert!(h.audio.borrow().playing);

        h.ctl.set_volume(0);
        assert!(h.ctl.state().is_muted);
        assert!(!h.audio.borrow().playing);

        h.ctl.set_volume(30);
        assert!(!h.ctl.state().is_muted);
        assert_eq!(h.ctl.state().volume, 30);
        assert!(h.audio.borrow().playing);
        assert!((h.audio.borrow().gain - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_volume_above_zero_unmutes() {
        let mut h = Harness::new(TimerState::default());
        assert!(h.ctl.state().is_muted);
        h.ctl.set_volume(80);
        assert!(!h.ctl.state().is_muted);

        // Already unmuted stays unmuted
        h.ctl.set_volume(10);
        assert!(!h.ctl.state().is_muted);
    }

    #[test]
    fn test_volume_clamped_to_slider_range() {
        let mut h = Harness::new(TimerState::default());
        h.ctl.set_volume(200);
        assert_eq!(h.ctl.state().volume, 100);

        h.ctl.adjust_volume(-150);
        assert_eq!(h.ctl.state().volume, 0);
        assert!(h.ctl.state().is_muted);

        h.ctl.adjust_volume(5);
        assert_eq!(h.ctl.state().volume, 5);
        assert!(!h.ctl.state().is_muted);
    }

    #[test]
    fn test_toggle_mute_keeps_volume() {
        let mut h = Harness::new(TimerState::default());
        h.ctl.set_volume(70);
        for _ in 0..4 {
            h.ctl.toggle_mute();
            assert_eq!(h.ctl.state().volume, 70);
        }
    }

    #[test]
    fn test_mute_pauses_without_rewind() {
        let mut h = Harness::new(TimerState::new(30, 50, false));
        h.ctl.toggle_mute();
        assert!(h.ctl.state().is_muted);
        assert!(!h.audio.borrow().playing);
        assert_eq!(h.audio.borrow().rewinds, 0);

        h.ctl.toggle_mute();
        assert!(h.audio.borrow().playing);
    }

    #[test]
    fn test_play_failure_is_swallowed() {
        let mut h = Harness::new(TimerState::default());
        h.audio.borrow_mut().fail_play = true;

        h.ctl.toggle_mute();
        assert!(!h.ctl.state().is_muted);
        assert!(!h.audio.borrow().playing);
        assert_eq!(h.audio.borrow().plays, 1);

        // A later toggle succeeds once the output recovers
        h.audio.borrow_mut().fail_play = false;
        h.ctl.toggle_mute();
        h.ctl.toggle_mute();
        assert!(h.audio.borrow().playing);
    }

    #[test]
    fn test_start_plays_when_unmuted() {
        let mut h = Harness::new(TimerState::new(1, 50, false));
        let plays = h.audio.borrow().plays;
        h.ctl.start();
        assert_eq!(h.audio.borrow().plays, plays + 1);

        let mut h = Harness::new(TimerState::new(1, 50, true));
        h.ctl.start();
        assert_eq!(h.audio.borrow().plays, 0);
    }

    #[test]
    fn test_track_end_loops_unless_muted() {
        let mut h = Harness::new(TimerState::new(30, 50, false));
        h.ctl.on_track_ended();
        assert_eq!(h.audio.borrow().rewinds, 1);
        assert!(h.audio.borrow().playing);

        h.ctl.toggle_mute();
        h.ctl.on_track_ended();
        assert_eq!(h.audio.borrow().rewinds, 1);
        assert!(!h.audio.borrow().playing);
    }

    #[test]
    fn test_audio_ready_respects_mute() {
        let mut h = Harness::new(TimerState::default());
        h.ctl.on_audio_ready();
        assert_eq!(h.audio.borrow().plays, 0);

        h.ctl.toggle_mute();
        let plays = h.audio.borrow().plays;
        h.ctl.on_audio_ready();
        assert_eq!(h.audio.borrow().plays, plays + 1);
    }

    #[test]
    fn test_fullscreen_toggle() {
        let mut h = Harness::new(TimerState::default());
        h.ctl.toggle_fullscreen();
        assert!(h.ctl.state().is_fullscreen);
        assert_eq!(h.screen.borrow().requests, 1);

        h.ctl.toggle_fullscreen();
        assert!(!h.ctl.state().is_fullscreen);
        assert_eq!(h.screen.borrow().exits, 1);
    }

    #[test]
    fn test_fullscreen_flag_is_optimistic_until_reconciled() {
        let mut h = Harness::new(TimerState::default());
        h.screen.borrow_mut().deferred = true;

        h.ctl.toggle_fullscreen();
        assert!(h.ctl.state().is_fullscreen);
        assert!(!h.screen.borrow().active);

        assert!(h.ctl.reconcile_fullscreen());
        assert!(!h.ctl.state().is_fullscreen);
        assert!(!h.ctl.reconcile_fullscreen());
    }

    #[test]
    fn test_fullscreen_toggle_follows_host_state() {
        let mut h = Harness::new(TimerState::default());
        // Host went fullscreen on its own
        h.screen.borrow_mut().active = true;
        h.ctl.toggle_fullscreen();
        assert_eq!(h.screen.borrow().exits, 1);
        assert!(!h.ctl.state().is_fullscreen);
    }

    #[test]
    fn test_drop_disarms_ticker() {
        let h = Harness::with_minutes("1");
        let ticks = h.ticks.clone();
        let mut ctl = h.ctl;
        ctl.start();
        drop(ctl);
        assert!(ticks.borrow().armed.is_none());
    }
}
