use std::time::Duration;

use anyhow::{Context, ensure};
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::{
    flash::FlashOptions,
    reminder::Colour,
    registry::RegistrySettings,
};

#[derive(Deserialize, Debug, Clone)]
pub struct CountdownSettings {
    pub tick_interval_ms: u64,
    pub default_blink_count: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct FlashSettings {
    pub on_interval_ms: u64,
    pub off_interval_ms: u64,
    pub baseline_colour: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    pub countdown: CountdownSettings,
    pub flash: FlashSettings,
}

impl AppSettings {
    /// Defaults, then `appsettings.*`, then `appsettings.local.*`, then
    /// `APP_`-prefixed environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name("appsettings.local").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::build(builder)
    }

    pub(crate) fn build(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .set_default("countdown.tick_interval_ms", 1000_i64)?
            .set_default("countdown.default_blink_count", 5_i64)?
            .set_default("flash.on_interval_ms", 500_i64)?
            .set_default("flash.off_interval_ms", 500_i64)?
            .set_default("flash.baseline_colour", "0x323232ff")?
            .build()?
            .try_deserialize()
    }

    pub fn registry_settings(&self) -> anyhow::Result<RegistrySettings> {
        ensure!(
            self.countdown.tick_interval_ms > 0,
            "countdown.tick_interval_ms must be above zero"
        );
        ensure!(
            self.countdown.default_blink_count > 0,
            "countdown.default_blink_count must be above zero"
        );

        let baseline = self
            .flash
            .baseline_colour
            .parse::<Colour>()
            .context("flash.baseline_colour is not a valid colour")?;

        Ok(RegistrySettings {
            tick_interval: Duration::from_millis(self.countdown.tick_interval_ms),
            default_blink_count: self.countdown.default_blink_count,
            flash: FlashOptions {
                on_interval: Duration::from_millis(self.flash.on_interval_ms),
                off_interval: Duration::from_millis(self.flash.off_interval_ms),
                baseline,
            },
        })
    }
}
