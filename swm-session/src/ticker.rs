//! Cancellable periodic tick task
//!
//! The countdown never runs on the tick thread. The thread only posts
//! `TickToken`s into a channel; the UI thread drains it and hands each
//! token to the controller, which drops tokens from an old arming.

use crossbeam_channel::{bounded, select, tick, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Countdown resolution
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one arming of the tick task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickToken(pub u64);

/// Something that can deliver periodic ticks
pub trait TickSource {
    /// Start delivering `token` every period, replacing any previous arming
    fn arm(&mut self, token: TickToken);
    /// Stop delivering ticks
    fn disarm(&mut self);
}

/// Tick source backed by a helper thread
pub struct ThreadTicker {
    period: Duration,
    tick_tx: Sender<TickToken>,
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadTicker {
    /// Create a ticker and the receiver its ticks arrive on
    pub fn new(period: Duration) -> (Self, Receiver<TickToken>) {
        let (tick_tx, tick_rx) = unbounded();
        let ticker = Self {
            period,
            tick_tx,
            cancel_tx: None,
            handle: None,
        };
        (ticker, tick_rx)
    }
}

impl TickSource for ThreadTicker {
    fn arm(&mut self, token: TickToken) {
        self.disarm();

        let (cancel_tx, cancel_rx) = bounded::<()>(1);
        let tick_tx = self.tick_tx.clone();
        let period = self.period;

        let spawned = thread::Builder::new()
            .name("swm-ticker".into())
            .spawn(move || {
                let ticks = tick(period);
                loop {
                    select! {
                        // Fires on explicit cancel or when the sender is dropped
                        recv(cancel_rx) -> _ => break,
                        recv(ticks) -> _ => {
                            if tick_tx.send(token).is_err() {
                                break;
                            }
                        }
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                debug!(token = token.0, "tick armed");
                self.cancel_tx = Some(cancel_tx);
                self.handle = Some(handle);
            }
            Err(e) => warn!("failed to spawn tick thread: {}", e),
        }
    }

    fn disarm(&mut self) {
        // Dropping the sender wakes the thread even if the buffer is full
        self.cancel_tx = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            debug!("tick disarmed");
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}
