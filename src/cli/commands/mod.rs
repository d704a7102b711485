use anyhow::Result;
use std::sync::Arc;

use crate::api::HttpManufacturingApi;
use crate::config::LoaderConfig;

pub mod lookup;
pub mod print_config;
pub mod reboot;
pub mod run;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

pub(crate) fn http_api(config: &LoaderConfig) -> Result<Arc<HttpManufacturingApi>> {
    Ok(Arc::new(HttpManufacturingApi::from_config(&config.api)?))
}
