use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::reminder::{Colour, ReminderHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderEvent {
    Tick { remaining_seconds: u64 },
    Completed,
    FlashToggle { highlighted: bool, colour: Colour },
    Cancelled,
}

/// Receives lifecycle events from reminder tasks. Implementations are called
/// from the runtime's worker threads and must not block.
#[async_trait]
pub trait ReminderObserver: Send + Sync + 'static {
    async fn notify(&self, handle: ReminderHandle, event: ReminderEvent);
}

pub type ReminderEventReceiver = mpsc::UnboundedReceiver<(ReminderHandle, ReminderEvent)>;

/// Forwards events to whoever owns the receiving end, typically a UI loop.
#[derive(Clone)]
pub struct ChannelObserver(mpsc::UnboundedSender<(ReminderHandle, ReminderEvent)>);

impl ChannelObserver {
    pub fn channel() -> (Self, ReminderEventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

#[async_trait]
impl ReminderObserver for ChannelObserver {
    async fn notify(&self, handle: ReminderHandle, event: ReminderEvent) {
        if self.0.send((handle, event)).is_err() {
            log::debug!(
                "Event receiver is gone, dropping event. [reminder = {handle}, event = {event:?}]"
            );
        }
    }
}
