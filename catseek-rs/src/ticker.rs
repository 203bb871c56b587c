//! Repeating timer with explicit cancellation.
//!
//! [`spawn_ticker`] schedules a callback on a fixed interval and returns a
//! [`TickerHandle`]. Cancelling the handle (or dropping it) guarantees no
//! callback runs after the cancellation is observed.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// What the ticker should do after a callback returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Schedule the next tick
    Continue,
    /// Do not reschedule; the ticker finishes
    Stop,
}

/// Handle to a running ticker
pub struct TickerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl TickerHandle {
    /// Cancel the ticker. Safe to call repeatedly or after it has finished.
    pub fn cancel(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Whether `cancel` has been called
    pub fn is_cancelled(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Whether the ticker task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the ticker to exit and return how many callbacks ran
    pub async fn finished(self) -> u64 {
        let TickerHandle { stop_tx, task } = self;
        let ticks = match task.await {
            Ok(ticks) => ticks,
            Err(e) => {
                warn!("Ticker task failed: {}", e);
                0
            }
        };
        drop(stop_tx);
        ticks
    }
}

/// Run `on_tick` immediately and then every `period` until cancelled or
/// until the callback returns [`TickControl::Stop`].
///
/// The callback receives the number of completed ticks so far.
pub fn spawn_ticker<F>(period: Duration, mut on_tick: F) -> TickerHandle
where
    F: FnMut(u64) -> TickControl + Send + 'static,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let period = period.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks: u64 = 0;

        loop {
            tokio::select! {
                biased;
                changed = stop_rx.changed() => {
                    // Err means every handle is gone
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                    continue;
                }
                _ = interval.tick() => {}
            }

            if *stop_rx.borrow() {
                break;
            }

            match on_tick(ticks) {
                TickControl::Continue => ticks += 1,
                TickControl::Stop => break,
            }
        }

        debug!("Ticker exited after {} tick(s)", ticks);
        ticks
    });

    TickerHandle { stop_tx, task }
}
