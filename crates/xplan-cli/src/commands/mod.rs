use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use xplan_ui_common::{UiService, UiServiceBuilder};

use xplan_cli::Cli;

pub mod db;
pub mod import;
pub mod metrics;
pub mod results;
pub mod scenarios;

/// Runtime plus service for commands that talk to the backend.
pub struct Session {
    runtime: Runtime,
    service: UiService,
}

impl Session {
    /// Load configuration (honouring `--config` and `--api-url`) and start the runtime.
    pub fn open(cli: &Cli) -> Result<Self> {
        let runtime = Runtime::new().context("starting tokio runtime")?;

        let mut builder = UiServiceBuilder::new();
        if let Some(path) = &cli.config {
            builder = builder.config_path(path);
        }
        if let Some(url) = &cli.api_url {
            builder = builder.api_url(url);
        }
        let service = builder.build().context("loading configuration")?;

        Ok(Self { runtime, service })
    }

    pub fn service(&self) -> &UiService {
        &self.service
    }

    /// Run an async operation on the runtime, blocking until completion.
    pub fn block_on<F, T>(&self, future: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        self.runtime.block_on(future)
    }
}
