//! Cancellable debounce timer.
//!
//! Arming the timer supersedes every previously armed ticket. A superseded
//! ticket wakes immediately and reports that it must not fire.

use std::time::Duration;

use tokio::sync::watch;

/// Generation-counting debounce timer.
#[derive(Debug)]
pub struct DebounceTimer {
    generation: watch::Sender<u64>,
}

impl Default for DebounceTimer {
    fn default() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }
}

impl DebounceTimer {
    /// Arm a new ticket, cancelling any ticket armed before it.
    pub fn arm(&self) -> DebounceTicket {
        let mut armed = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            armed = *generation;
        });
        DebounceTicket {
            generation: armed,
            watcher: self.generation.subscribe(),
        }
    }

    /// Cancel the outstanding ticket without arming a replacement.
    pub fn cancel(&self) {
        self.generation.send_modify(|generation| *generation += 1);
    }
}

/// Handle for one armed debounce window.
#[derive(Debug)]
pub struct DebounceTicket {
    generation: u64,
    watcher: watch::Receiver<u64>,
}

impl DebounceTicket {
    /// Whether no newer ticket has been armed and no cancel has happened.
    pub fn is_current(&self) -> bool {
        *self.watcher.borrow() == self.generation
    }

    /// Wait out `delay`; returns `true` only if the ticket survived it.
    pub async fn expire(&mut self, delay: Duration) -> bool {
        let watcher = &mut self.watcher;
        let survived = tokio::select! {
            () = tokio::time::sleep(delay) => true,
            _ = watcher.changed() => false,
        };
        survived && self.is_current()
    }
}
