use anyhow::{Context, Result};
use std::sync::Arc;

use crate::cli::commands::Command;
use crate::config::LoaderConfig;
use crate::external::{reboot_system, CommandExecutor, ProcessCommandExecutor, REBOOT_BANNER};
use crate::hardware::{platform_gpio, Color, ConsoleDisplay, Display, Gpio};

pub struct RebootCommand {
    config: Arc<LoaderConfig>,
    executor: Arc<dyn CommandExecutor>,
}

impl RebootCommand {
    pub fn new(config: Arc<LoaderConfig>) -> Self {
        Self {
            config,
            executor: Arc::new(ProcessCommandExecutor),
        }
    }
}

impl Command for RebootCommand {
    async fn execute(&self) -> Result<()> {
        let mut display = ConsoleDisplay::new(self.config.display.columns, self.config.display.rows);
        display.show_text(REBOOT_BANNER, Color::Blue, true)?;

        // Make sure the relay is low before the host goes away
        let mut gpio = platform_gpio();
        gpio.configure(&self.config.pins)?;
        gpio.release();

        reboot_system(self.executor.as_ref())
            .await
            .context("Failed to reboot")?;
        Ok(())
    }
}
