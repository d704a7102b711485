use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::cli::commands::{http_api, Command};
use crate::config::LoaderConfig;
use crate::controller::{Station, Supervisor};
use crate::hardware::{platform_gpio, ConsoleDisplay, StdinScanner};
use crate::shutdown::interrupt_signal;

/// The controller itself: cycles until interrupted or stdin closes
pub struct RunCommand {
    config: Arc<LoaderConfig>,
}

impl RunCommand {
    pub fn new(config: Arc<LoaderConfig>) -> Self {
        Self { config }
    }
}

impl Command for RunCommand {
    async fn execute(&self) -> Result<()> {
        let config = Arc::clone(&self.config);
        let station = Station::new(
            Arc::clone(&config),
            ConsoleDisplay::new(config.display.columns, config.display.rows),
            platform_gpio(),
            Box::new(StdinScanner::new(config.station.debug)),
            http_api(&config)?,
        );

        let report = Supervisor::new(station).run(interrupt_signal()).await;
        info!(
            cycles = report.cycles,
            restarts = report.restarts,
            reason = %report.reason,
            "Loader controller stopped"
        );
        Ok(())
    }
}
