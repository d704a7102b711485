use anyhow::Result;
use std::sync::Arc;

use crate::api::ManufacturingApi;
use crate::cli::commands::{http_api, Command};
use crate::cli::LookupTarget;
use crate::config::LoaderConfig;

/// One API call from the command line, for checking a label or the network
pub struct LookupCommand {
    config: Arc<LoaderConfig>,
    target: LookupTarget,
}

impl LookupCommand {
    pub fn new(config: Arc<LoaderConfig>, target: LookupTarget) -> Self {
        Self { config, target }
    }

    pub async fn lookup(&self, api: &dyn ManufacturingApi) -> Result<String> {
        let report = match &self.target {
            LookupTarget::WorkOrder { id } => {
                let info = api.work_order(id).await?;
                format!("work order {id}: press {} rmat {}", info.press, info.raw_material)
            }
            LookupTarget::Serial { id } => {
                let info = api.serial(id).await?;
                format!("serial {id}: item number {}", info.item_number)
            }
            LookupTarget::Monitor { id } => {
                let current = api.current_work_order(id).await?;
                let verdict = if &current == id { "still loaded" } else { "changed" };
                format!("work order {id}: press reports {current} ({verdict})")
            }
        };
        Ok(report)
    }
}

impl Command for LookupCommand {
    async fn execute(&self) -> Result<()> {
        let api = http_api(&self.config)?;
        println!("{}", self.lookup(api.as_ref()).await?);
        Ok(())
    }
}
