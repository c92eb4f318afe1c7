//! Change notifications from the controller

use crate::state::TimerState;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Events sent to observers of a `TimerController`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// Any visible state changed; carries the new snapshot
    StateChanged(TimerState),
    /// A session started with this many seconds on the clock
    SessionStarted { seconds: u64 },
    /// The countdown reached zero (sent once per session)
    SessionFinished,
}

/// Fan-out list of event channels. Disconnected observers are dropped on
/// the next emit.
#[derive(Debug, Default)]
pub struct Subscribers {
    senders: Vec<Sender<TimerEvent>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer
    pub fn subscribe(&mut self) -> Receiver<TimerEvent> {
        let (tx, rx) = unbounded();
        self.senders.push(tx);
        rx
    }

    /// Deliver an event to every live observer
    pub fn emit(&mut self, event: TimerEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}
