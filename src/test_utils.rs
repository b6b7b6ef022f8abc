use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{
    observer::{ReminderEvent, ReminderObserver},
    reminder::ReminderHandle,
};

type ReceivedEvents = Arc<Mutex<Vec<(ReminderHandle, ReminderEvent)>>>;

#[derive(Clone, Default)]
pub struct RecordingObserver {
    received_events: ReceivedEvents,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<(ReminderHandle, ReminderEvent)> {
        self.received_events.lock().unwrap().clone()
    }

    pub fn events_for(&self, handle: ReminderHandle) -> Vec<ReminderEvent> {
        self.received_events
            .lock()
            .unwrap()
            .iter()
            .filter(|(h, _)| *h == handle)
            .map(|(_, event)| *event)
            .collect()
    }

    pub fn ticks_for(&self, handle: ReminderHandle) -> Vec<u64> {
        self.events_for(handle)
            .into_iter()
            .filter_map(|event| match event {
                ReminderEvent::Tick { remaining_seconds } => Some(remaining_seconds),
                _ => None,
            })
            .collect()
    }

    pub fn toggles_for(&self, handle: ReminderHandle) -> Vec<bool> {
        self.events_for(handle)
            .into_iter()
            .filter_map(|event| match event {
                ReminderEvent::FlashToggle { highlighted, .. } => Some(highlighted),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ReminderObserver for RecordingObserver {
    async fn notify(&self, handle: ReminderHandle, event: ReminderEvent) {
        self.received_events.lock().unwrap().push((handle, event));
    }
}
