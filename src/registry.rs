use std::{
    collections::{HashMap, hash_map::Entry},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    sync::{RwLock, watch},
    task::{self, JoinHandle},
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::{Clock, LocalClock},
    countdown::{CountdownPhase, CountdownState, CountdownTimer},
    flash::{FlashOptions, Flasher},
    observer::ReminderObserver,
    reminder::{
        Colour, DEFAULT_BLINK_COUNT, InvalidScheduleError, ReminderHandle, ReminderRequest,
        ReminderSpec,
    },
};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    InvalidSchedule(#[from] InvalidScheduleError),

    #[error("No such reminder {0}")]
    UnknownReminder(ReminderHandle),

    #[error("Reminder {0} is still running, cancel it first")]
    StillRunning(ReminderHandle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub tick_interval: Duration,
    pub default_blink_count: u32,
    pub flash: FlashOptions,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            default_blink_count: DEFAULT_BLINK_COUNT,
            flash: FlashOptions::default(),
        }
    }
}

/// Read-only view of one reminder for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSnapshot {
    pub handle: ReminderHandle,
    pub spec: ReminderSpec,
    pub state: CountdownState,
    pub flashing: bool,
}

/// Commands the presentation layer issues against the reminder engine.
#[async_trait]
pub trait ReminderPanel: Send + Sync {
    async fn submit_remind_in(
        &self,
        hours: u32,
        minutes: u32,
        seconds: u32,
        notes: Option<String>,
        blink_count: Option<u32>,
    ) -> Result<ReminderHandle, InvalidScheduleError>;

    async fn submit_remind_at(
        &self,
        hour: u32,
        minute: u32,
        notes: Option<String>,
        blink_count: Option<u32>,
    ) -> Result<ReminderHandle, InvalidScheduleError>;

    async fn cancel(&self, handle: ReminderHandle) -> Result<(), RegistryError>;

    async fn dismiss(&self, handle: ReminderHandle) -> Result<(), RegistryError>;

    async fn list(&self) -> Vec<ReminderSnapshot>;
}

struct ReminderEntry {
    spec: ReminderSpec,
    state: watch::Receiver<CountdownState>,
    flashing: watch::Receiver<bool>,
    countdown_token: CancellationToken,
    flash_token: CancellationToken,
    task: JoinHandle<()>,
}

impl ReminderEntry {
    fn snapshot(&self, handle: ReminderHandle) -> ReminderSnapshot {
        ReminderSnapshot {
            handle,
            spec: self.spec.clone(),
            state: *self.state.borrow(),
            flashing: *self.flashing.borrow(),
        }
    }

    fn abort(&self) {
        self.countdown_token.cancel();
        self.flash_token.cancel();
    }
}

/// Owns every live reminder. Each one runs as an independent task; the only
/// thing they share is the observer.
pub struct ReminderRegistry {
    entries: RwLock<HashMap<ReminderHandle, ReminderEntry>>,
    next_id: AtomicU64,
    observer: Arc<dyn ReminderObserver>,
    clock: Arc<dyn Clock>,
    settings: RegistrySettings,
    shutdown: CancellationToken,
}

impl ReminderRegistry {
    pub fn new(observer: Arc<dyn ReminderObserver>, settings: RegistrySettings) -> Self {
        Self::with_clock(observer, settings, Arc::new(LocalClock))
    }

    pub fn with_clock(
        observer: Arc<dyn ReminderObserver>,
        settings: RegistrySettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            observer,
            clock,
            settings,
            shutdown: CancellationToken::new(),
        }
    }

    /// Validates the request and starts its countdown. Returns as soon as the
    /// reminder task is spawned.
    pub async fn create(
        &self,
        request: ReminderRequest,
    ) -> Result<ReminderHandle, InvalidScheduleError> {
        let now = self.clock.now();
        let spec = ReminderSpec::from_request(
            request,
            now,
            self.settings.default_blink_count,
            Colour::random(),
        )
        .inspect_err(|error| log::warn!("Rejected reminder submission: {error}"))?;

        let remaining_seconds = match u64::try_from(spec.countdown_seconds()) {
            Ok(seconds) if seconds > 0 => seconds,
            _ => {
                log::warn!(
                    "Rejected reminder submission, countdown is under a second. [fire_at = {}]",
                    spec.fire_at
                );
                return Err(InvalidScheduleError::CountdownTooShort);
            }
        };

        // Spawn and insert under one guard.
        let mut entries = self.entries.write().await;
        let handle = ReminderHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let countdown_token = self.shutdown.child_token();
        let flash_token = self.shutdown.child_token();

        let (timer, state) = CountdownTimer::new(
            handle,
            remaining_seconds,
            self.settings.tick_interval,
            countdown_token.clone(),
        );
        let (flasher, flashing) = Flasher::new(
            handle,
            &spec,
            self.settings.flash.clone(),
            flash_token.clone(),
        );

        let observer = Arc::clone(&self.observer);
        let task = task::spawn(run_reminder(timer, flasher, observer));

        log::info!(
            "Created reminder {handle}. [kind = {:?}, fire_at = {}, blink_count = {}]",
            spec.kind(),
            spec.fire_at,
            spec.blink_count
        );

        entries.insert(
            handle,
            ReminderEntry {
                spec,
                state,
                flashing,
                countdown_token,
                flash_token,
                task,
            },
        );

        Ok(handle)
    }

    /// Signals the countdown to stop. A no-op for reminders that already
    /// completed or were cancelled.
    pub async fn cancel(&self, handle: ReminderHandle) -> Result<(), RegistryError> {
        let entries = self.entries.read().await;
        let entry = entries
            .get(&handle)
            .ok_or(RegistryError::UnknownReminder(handle))?;

        if !entry.countdown_token.is_cancelled() {
            log::info!("Cancelling reminder {handle}");
            entry.countdown_token.cancel();
        }

        Ok(())
    }

    /// Detaches a completed or cancelled reminder, stopping its flash if one
    /// is still going.
    pub async fn remove(&self, handle: ReminderHandle) -> Result<(), RegistryError> {
        let mut entries = self.entries.write().await;
        let Entry::Occupied(occupied) = entries.entry(handle) else {
            return Err(RegistryError::UnknownReminder(handle));
        };

        if !occupied.get().state.borrow().is_terminal() {
            return Err(RegistryError::StillRunning(handle));
        }

        let entry = occupied.remove();
        entry.abort();
        log::info!("Removed reminder {handle}");

        Ok(())
    }

    /// Cancel and remove in one step, whatever the reminder's phase.
    pub async fn dismiss(&self, handle: ReminderHandle) -> Result<(), RegistryError> {
        let entry = self
            .entries
            .write()
            .await
            .remove(&handle)
            .ok_or(RegistryError::UnknownReminder(handle))?;

        entry.abort();
        log::info!("Dismissed reminder {handle}");

        Ok(())
    }

    pub async fn get(&self, handle: ReminderHandle) -> Option<ReminderSnapshot> {
        self.entries
            .read()
            .await
            .get(&handle)
            .map(|entry| entry.snapshot(handle))
    }

    /// Newest first.
    pub async fn list(&self) -> Vec<ReminderSnapshot> {
        let entries = self.entries.read().await;
        let mut snapshots: Vec<_> = entries
            .iter()
            .map(|(handle, entry)| entry.snapshot(*handle))
            .collect();
        snapshots.sort_by(|a, b| b.handle.cmp(&a.handle));
        snapshots
    }

    pub async fn is_flashing(&self, handle: ReminderHandle) -> Result<bool, RegistryError> {
        self.entries
            .read()
            .await
            .get(&handle)
            .map(|entry| *entry.flashing.borrow())
            .ok_or(RegistryError::UnknownReminder(handle))
    }

    /// Advisory: whether any reminder is blinking right now.
    pub async fn any_flashing(&self) -> bool {
        self.entries
            .read()
            .await
            .values()
            .any(|entry| *entry.flashing.borrow())
    }

    /// Aborts every reminder and waits up to `timeout` for each task to wind
    /// down.
    pub async fn shutdown(&self, timeout: Duration) {
        let entries: Vec<_> = self.entries.write().await.drain().collect();
        log::info!("Shutting down {} reminder(s)", entries.len());

        for (_, entry) in &entries {
            entry.abort();
        }

        for (handle, entry) in entries {
            match time::timeout(timeout, entry.task).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => log::error!("Reminder {handle} task failed: {error}"),
                Err(_) => log::warn!("Reminder {handle} did not stop within {timeout:?}"),
            }
        }
    }
}

impl Drop for ReminderRegistry {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[async_trait]
impl ReminderPanel for ReminderRegistry {
    async fn submit_remind_in(
        &self,
        hours: u32,
        minutes: u32,
        seconds: u32,
        notes: Option<String>,
        blink_count: Option<u32>,
    ) -> Result<ReminderHandle, InvalidScheduleError> {
        let request = ReminderRequest::remind_in(hours, minutes, seconds)
            .with_notes(notes)
            .with_blink_count(blink_count);
        self.create(request).await
    }

    async fn submit_remind_at(
        &self,
        hour: u32,
        minute: u32,
        notes: Option<String>,
        blink_count: Option<u32>,
    ) -> Result<ReminderHandle, InvalidScheduleError> {
        let request = ReminderRequest::remind_at(hour, minute)
            .with_notes(notes)
            .with_blink_count(blink_count);
        self.create(request).await
    }

    async fn cancel(&self, handle: ReminderHandle) -> Result<(), RegistryError> {
        ReminderRegistry::cancel(self, handle).await
    }

    async fn dismiss(&self, handle: ReminderHandle) -> Result<(), RegistryError> {
        ReminderRegistry::dismiss(self, handle).await
    }

    async fn list(&self) -> Vec<ReminderSnapshot> {
        ReminderRegistry::list(self).await
    }
}

async fn run_reminder(
    timer: CountdownTimer,
    flasher: Flasher,
    observer: Arc<dyn ReminderObserver>,
) {
    if timer.run(observer.as_ref()).await == CountdownPhase::Completed {
        flasher.run(observer.as_ref()).await;
    }
}
