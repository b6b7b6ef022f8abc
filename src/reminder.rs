pub mod colour;

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use thiserror::Error;

pub use colour::Colour;

pub const DEFAULT_BLINK_COUNT: u32 = 5;
pub const NO_NOTES_PLACEHOLDER: &str = "No notes submitted";

const CARD_TIME_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// Opaque reference to one reminder inside a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderHandle(u64);

impl ReminderHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ReminderHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidScheduleError {
    #[error("Reminder time must be later than current time (fire_at = {fire_at}, now = {now})")]
    NotInFuture {
        fire_at: NaiveDateTime,
        now: NaiveDateTime,
    },

    #[error("{hour:02}:{minute:02} is not a valid time of day")]
    InvalidTimeOfDay { hour: u32, minute: u32 },

    #[error("Reminder time is out of range")]
    OutOfRange,

    #[error("Need countdown number to be 1 or above")]
    CountdownTooShort,

    #[error("Blink count must be 1 or above")]
    InvalidBlinkCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    RemindIn,
    RemindAt,
}

/// Kind-specific part of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleInput {
    RemindIn { hours: u32, minutes: u32, seconds: u32 },
    RemindAt { hour: u32, minute: u32 },
}

impl ScheduleInput {
    pub fn kind(&self) -> ReminderKind {
        match self {
            ScheduleInput::RemindIn { .. } => ReminderKind::RemindIn,
            ScheduleInput::RemindAt { .. } => ReminderKind::RemindAt,
        }
    }

    /// Derives the fire time relative to `now`. A `RemindAt` target always
    /// lands on the same calendar day as `now`; there is no rollover.
    pub fn fire_at(&self, now: NaiveDateTime) -> Result<NaiveDateTime, InvalidScheduleError> {
        let fire_at = match *self {
            ScheduleInput::RemindIn {
                hours,
                minutes,
                seconds,
            } => {
                let total = i64::from(hours) * 3600 + i64::from(minutes) * 60 + i64::from(seconds);
                let delta = TimeDelta::try_seconds(total).ok_or(InvalidScheduleError::OutOfRange)?;
                now.checked_add_signed(delta)
                    .ok_or(InvalidScheduleError::OutOfRange)?
            }
            ScheduleInput::RemindAt { hour, minute } => {
                let time = NaiveTime::from_hms_opt(hour, minute, 0)
                    .ok_or(InvalidScheduleError::InvalidTimeOfDay { hour, minute })?;
                now.date().and_time(time)
            }
        };

        if fire_at <= now {
            return Err(InvalidScheduleError::NotInFuture { fire_at, now });
        }

        Ok(fire_at)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub schedule: ScheduleInput,
    pub notes: Option<String>,
    pub blink_count: Option<u32>,
}

impl ReminderRequest {
    pub fn remind_in(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self::new(ScheduleInput::RemindIn {
            hours,
            minutes,
            seconds,
        })
    }

    pub fn remind_at(hour: u32, minute: u32) -> Self {
        Self::new(ScheduleInput::RemindAt { hour, minute })
    }

    fn new(schedule: ScheduleInput) -> Self {
        Self {
            schedule,
            notes: None,
            blink_count: None,
        }
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes;
        self
    }

    pub fn with_blink_count(mut self, blink_count: Option<u32>) -> Self {
        self.blink_count = blink_count;
        self
    }
}

/// Immutable description of a scheduled reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSpec {
    pub created_at: NaiveDateTime,
    pub fire_at: NaiveDateTime,
    pub notes: String,
    pub blink_count: u32,
    pub schedule: ScheduleInput,
    pub colour: Colour,
}

impl ReminderSpec {
    /// Validates `request` against `now` and builds the spec. Sub-second
    /// precision of `now` is kept so the countdown truncates like the card
    /// always did.
    pub fn from_request(
        request: ReminderRequest,
        now: NaiveDateTime,
        default_blink_count: u32,
        colour: Colour,
    ) -> Result<Self, InvalidScheduleError> {
        let blink_count = match request.blink_count {
            Some(0) => return Err(InvalidScheduleError::InvalidBlinkCount),
            Some(count) => count,
            None => default_blink_count,
        };
        if blink_count == 0 {
            return Err(InvalidScheduleError::InvalidBlinkCount);
        }

        let fire_at = request.schedule.fire_at(now)?;

        let notes = request
            .notes
            .filter(|notes| !notes.trim().is_empty())
            .unwrap_or_else(|| NO_NOTES_PLACEHOLDER.to_owned());

        Ok(Self {
            created_at: now,
            fire_at,
            notes,
            blink_count,
            schedule: request.schedule,
            colour,
        })
    }

    pub fn kind(&self) -> ReminderKind {
        self.schedule.kind()
    }

    /// Whole seconds between submission and fire time, truncated.
    pub fn countdown_seconds(&self) -> i64 {
        (self.fire_at - self.created_at).num_seconds()
    }

    /// Card title, e.g. `Submitted on: Oct 16 2026 09:15:02 to be reminded in 5 minute(s)`.
    pub fn summary(&self) -> String {
        let mut summary = format!("Submitted on: {}", self.created_at.format(CARD_TIME_FORMAT));

        match self.schedule {
            ScheduleInput::RemindIn {
                hours,
                minutes,
                seconds,
            } => {
                summary.push_str(" to be reminded in");
                if hours > 0 {
                    summary.push_str(&format!(" {hours} hour(s)"));
                }
                if minutes > 0 {
                    summary.push_str(&format!(" {minutes} minute(s)"));
                }
                if seconds > 0 {
                    summary.push_str(&format!(" {seconds} second(s)"));
                }
            }
            ScheduleInput::RemindAt { .. } => summary.push_str(" to be reminded at:"),
        }

        summary
    }

    pub fn fire_at_text(&self) -> String {
        self.fire_at.format(CARD_TIME_FORMAT).to_string()
    }
}
