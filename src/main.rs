mod console;

use std::{sync::Arc, time::Duration};

use countdown_panel::{ChannelObserver, ReminderRegistry, appsettings::AppSettings};
use tokio::io::{AsyncBufReadExt, BufReader};

use console::ConsoleCommand;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::new()?.registry_settings()?;
    log::info!("Starting reminder panel. [settings = {settings:?}]");

    let (observer, mut events) = ChannelObserver::channel();
    let registry = ReminderRegistry::new(Arc::new(observer), settings);

    let printer = tokio::spawn(async move {
        while let Some((handle, event)) = events.recv().await {
            println!("{}", console::render_event(handle, &event));
        }
    });

    println!("Commands: in H M S [-b N] [notes], at H M [-b N] [notes], cancel ID, dismiss ID, list, quit");

    let input = read_commands(&registry).await;

    registry.shutdown(SHUTDOWN_TIMEOUT).await;
    drop(registry);
    printer.await?;

    input
}

async fn read_commands(registry: &ReminderRegistry) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match console::parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => println!("{}", console::execute(registry, command).await),
            Err(error) => error.print()?,
        }
    }

    Ok(())
}
