use clap::Parser;

use countdown_panel::{
    CountdownPhase, ReminderEvent, ReminderHandle, ReminderPanel, ReminderSnapshot,
};

/// One line typed into the panel.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(multicall = true)]
pub enum ConsoleCommand {
    /// Remind me in HOURS MINUTES SECONDS
    In {
        hours: u32,
        minutes: u32,
        seconds: u32,
        /// How many times it should blink, defaults to 5
        #[arg(short, long)]
        blinks: Option<u32>,
        /// Notes associated with this reminder
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        notes: Vec<String>,
    },
    /// Remind me at HOUR MINUTE today
    At {
        hour: u32,
        minute: u32,
        #[arg(short, long)]
        blinks: Option<u32>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        notes: Vec<String>,
    },
    /// Stop a countdown, keep its card
    Cancel { id: u64 },
    /// Stop a countdown or flash and remove its card
    Dismiss { id: u64 },
    /// Show all cards, newest first
    List,
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, clap::Error> {
    let args: Vec<&str> = line.split_whitespace().collect();
    if args.is_empty() {
        return Ok(None);
    }

    ConsoleCommand::try_parse_from(args).map(Some)
}

fn join_notes(notes: Vec<String>) -> Option<String> {
    if notes.is_empty() {
        None
    } else {
        Some(notes.join(" "))
    }
}

/// Runs one command and returns what to print. Quit is left to the caller.
pub async fn execute(panel: &dyn ReminderPanel, command: ConsoleCommand) -> String {
    match command {
        ConsoleCommand::In {
            hours,
            minutes,
            seconds,
            blinks,
            notes,
        } => match panel
            .submit_remind_in(hours, minutes, seconds, join_notes(notes), blinks)
            .await
        {
            Ok(handle) => format!("Added reminder {handle}"),
            Err(error) => format!("Could not add reminder: {error}"),
        },
        ConsoleCommand::At {
            hour,
            minute,
            blinks,
            notes,
        } => match panel
            .submit_remind_at(hour, minute, join_notes(notes), blinks)
            .await
        {
            Ok(handle) => format!("Added reminder {handle}"),
            Err(error) => format!("Could not add reminder: {error}"),
        },
        ConsoleCommand::Cancel { id } => match panel.cancel(ReminderHandle::new(id)).await {
            Ok(()) => format!("Cancelled reminder {id}"),
            Err(error) => error.to_string(),
        },
        ConsoleCommand::Dismiss { id } => match panel.dismiss(ReminderHandle::new(id)).await {
            Ok(()) => format!("Dismissed reminder {id}"),
            Err(error) => error.to_string(),
        },
        ConsoleCommand::List => {
            let snapshots = panel.list().await;
            if snapshots.is_empty() {
                "No reminders".to_owned()
            } else {
                snapshots
                    .iter()
                    .map(render_snapshot)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        }
        ConsoleCommand::Quit => String::new(),
    }
}

pub fn render_event(handle: ReminderHandle, event: &ReminderEvent) -> String {
    match event {
        ReminderEvent::Tick { remaining_seconds } => {
            format!("[{handle}] {}", format_remaining(*remaining_seconds))
        }
        ReminderEvent::Completed => format!("[{handle}] DONE!"),
        ReminderEvent::FlashToggle { highlighted, colour } => {
            let marker = if *highlighted { "*" } else { " " };
            format!("[{handle}] {marker} {}", colour.to_hex_rgba())
        }
        ReminderEvent::Cancelled => format!("[{handle}] cancelled"),
    }
}

pub fn render_snapshot(snapshot: &ReminderSnapshot) -> String {
    let status = match snapshot.state.phase {
        CountdownPhase::Running => format_remaining(snapshot.state.remaining_seconds),
        CountdownPhase::Completed if snapshot.flashing => "completed, flashing".to_owned(),
        CountdownPhase::Completed => "completed".to_owned(),
        CountdownPhase::Cancelled => "cancelled".to_owned(),
    };

    format!(
        "[{}] {} ({})\n    Time To Remind: {}\n    Notes: {}\n    {}",
        snapshot.handle,
        snapshot.spec.summary(),
        snapshot.spec.colour,
        snapshot.spec.fire_at_text(),
        snapshot.spec.notes,
        status
    )
}

fn format_remaining(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
