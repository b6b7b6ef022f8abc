use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    observer::{ReminderEvent, ReminderObserver},
    reminder::ReminderHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Running,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownState {
    pub remaining_seconds: u64,
    pub phase: CountdownPhase,
}

impl CountdownState {
    pub fn is_terminal(&self) -> bool {
        self.phase != CountdownPhase::Running
    }
}

/// Per-second decrement loop for one reminder.
///
/// The loop sleeps one tick interval, decrements, publishes the new state on
/// its watch channel and notifies the observer. Cancellation is checked at
/// every tick boundary; a cancelled timer never decrements again. Drift
/// against the wall clock is not corrected.
pub struct CountdownTimer {
    handle: ReminderHandle,
    remaining_seconds: u64,
    tick_interval: Duration,
    state: watch::Sender<CountdownState>,
    cancellation_token: CancellationToken,
}

impl CountdownTimer {
    pub fn new(
        handle: ReminderHandle,
        remaining_seconds: u64,
        tick_interval: Duration,
        cancellation_token: CancellationToken,
    ) -> (Self, watch::Receiver<CountdownState>) {
        let (state, state_rx) = watch::channel(CountdownState {
            remaining_seconds,
            phase: CountdownPhase::Running,
        });

        let timer = Self {
            handle,
            remaining_seconds,
            tick_interval,
            state,
            cancellation_token,
        };

        (timer, state_rx)
    }

    pub async fn run(mut self, observer: &dyn ReminderObserver) -> CountdownPhase {
        let handle = self.handle;
        log::info!(
            "[COUNTDOWN] Starting with {} second(s) left. ReminderId {}",
            self.remaining_seconds,
            handle
        );

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    self.publish(CountdownPhase::Cancelled);
                    log::info!(
                        "[COUNTDOWN] Cancelled with {} second(s) left. ReminderId {}",
                        self.remaining_seconds,
                        handle
                    );
                    observer.notify(handle, ReminderEvent::Cancelled).await;
                    return CountdownPhase::Cancelled;
                }
                _ = tokio::time::sleep(self.tick_interval) => {}
            }

            // Saturating so a timer started at zero still completes.
            self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
            self.publish(CountdownPhase::Running);
            log::debug!("[TICK] {} second(s) left. ReminderId {}", self.remaining_seconds, handle);
            observer
                .notify(
                    handle,
                    ReminderEvent::Tick {
                        remaining_seconds: self.remaining_seconds,
                    },
                )
                .await;

            if self.remaining_seconds == 0 {
                self.publish(CountdownPhase::Completed);
                log::info!("[COUNTDOWN] Completed. ReminderId {}", handle);
                observer.notify(handle, ReminderEvent::Completed).await;
                return CountdownPhase::Completed;
            }
        }
    }

    fn publish(&self, phase: CountdownPhase) {
        self.state.send_replace(CountdownState {
            remaining_seconds: self.remaining_seconds,
            phase,
        });
    }
}
