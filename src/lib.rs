pub mod appsettings;
pub mod clock;
pub mod countdown;
pub mod flash;
pub mod observer;
pub mod registry;
pub mod reminder;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, LocalClock};
pub use countdown::{CountdownPhase, CountdownState};
pub use observer::{ChannelObserver, ReminderEvent, ReminderObserver};
pub use registry::{
    RegistryError, RegistrySettings, ReminderPanel, ReminderRegistry, ReminderSnapshot,
};
pub use reminder::{
    Colour, InvalidScheduleError, ReminderHandle, ReminderKind, ReminderRequest, ReminderSpec,
};
