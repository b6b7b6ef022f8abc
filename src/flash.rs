use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    observer::{ReminderEvent, ReminderObserver},
    reminder::{Colour, ReminderHandle, ReminderSpec},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashOptions {
    pub on_interval: Duration,
    pub off_interval: Duration,
    pub baseline: Colour,
}

impl Default for FlashOptions {
    fn default() -> Self {
        Self {
            on_interval: Duration::from_millis(500),
            off_interval: Duration::from_millis(500),
            baseline: Colour::BASELINE,
        }
    }
}

/// Completion signal: `blink_count` highlight/baseline cycles.
pub struct Flasher {
    handle: ReminderHandle,
    blink_count: u32,
    highlight: Colour,
    options: FlashOptions,
    flashing: watch::Sender<bool>,
    cancellation_token: CancellationToken,
}

impl Flasher {
    pub fn new(
        handle: ReminderHandle,
        spec: &ReminderSpec,
        options: FlashOptions,
        cancellation_token: CancellationToken,
    ) -> (Self, watch::Receiver<bool>) {
        let (flashing, flashing_rx) = watch::channel(false);
        let flasher = Self {
            handle,
            blink_count: spec.blink_count,
            highlight: spec.colour.highlight_over(options.baseline),
            options,
            flashing,
            cancellation_token,
        };

        (flasher, flashing_rx)
    }

    /// Runs every cycle unless cancelled. An abort while highlighted still
    /// restores the baseline before returning.
    pub async fn run(self, observer: &dyn ReminderObserver) {
        if self.cancellation_token.is_cancelled() {
            return;
        }

        self.flashing.send_replace(true);
        log::info!("[FLASH] Blinking {} time(s). ReminderId {}", self.blink_count, self.handle);

        for _ in 0..self.blink_count {
            self.toggle(observer, true).await;
            let on_finished = self.wait(self.options.on_interval).await;
            self.toggle(observer, false).await;

            if !on_finished || !self.wait(self.options.off_interval).await {
                log::info!("[FLASH] Aborted. ReminderId {}", self.handle);
                break;
            }
        }

        self.flashing.send_replace(false);
    }

    async fn toggle(&self, observer: &dyn ReminderObserver, highlighted: bool) {
        let colour = if highlighted {
            self.highlight
        } else {
            self.options.baseline
        };

        log::debug!(
            "[FLASH] highlighted = {highlighted}, colour = {colour}. ReminderId {}",
            self.handle
        );
        observer
            .notify(self.handle, ReminderEvent::FlashToggle { highlighted, colour })
            .await;
    }

    /// `false` when cancelled before `duration` elapsed.
    async fn wait(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancellation_token.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}
