use anyhow::Result;
use std::sync::Arc;

use crate::cli::commands::Command;
use crate::config::LoaderConfig;

pub struct PrintConfigCommand {
    config: Arc<LoaderConfig>,
}

impl PrintConfigCommand {
    pub fn new(config: Arc<LoaderConfig>) -> Self {
        Self { config }
    }
}

impl Command for PrintConfigCommand {
    async fn execute(&self) -> Result<()> {
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}
