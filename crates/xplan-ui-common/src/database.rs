//! Backend datastore connection lifecycle.
//!
//! Thin async wrapper over the blocking client. Settings are validated locally
//! before any request; failures keep the raw server or transport message.

use tokio::task::spawn_blocking;
use tracing::{info, warn};
use xplan_io::api::{DatabaseConfig, DatabaseOperationResult, DatabaseStatus};
use xplan_io::ApiClient;

use crate::error::{Error, Result};

/// Async access to the `/databaseconfig` endpoints.
#[derive(Clone)]
pub struct DatabaseService {
    client: ApiClient,
}

impl DatabaseService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Try the settings without applying them.
    pub async fn test(&self, config: DatabaseConfig) -> Result<DatabaseOperationResult> {
        config.validate()?;
        let client = self.client.clone();
        let result = spawn_blocking(move || client.test_database(&config)).await?;
        log_outcome("test", &result);
        Ok(result?)
    }

    /// Apply the settings on the backend.
    pub async fn configure(&self, config: DatabaseConfig) -> Result<DatabaseOperationResult> {
        config.validate()?;
        let client = self.client.clone();
        let result = spawn_blocking(move || client.configure_database(&config)).await?;
        log_outcome("configure", &result);
        Ok(result?)
    }

    /// Settings currently in use (password omitted by the backend).
    pub async fn current(&self) -> Result<Option<DatabaseConfig>> {
        let client = self.client.clone();
        Ok(spawn_blocking(move || client.current_database()).await??)
    }

    pub async fn status(&self) -> Result<DatabaseStatus> {
        let client = self.client.clone();
        Ok(spawn_blocking(move || client.database_status()).await??)
    }

    pub async fn disconnect(&self) -> Result<DatabaseOperationResult> {
        let client = self.client.clone();
        let result = spawn_blocking(move || client.disconnect_database()).await?;
        log_outcome("disconnect", &result);
        Ok(result?)
    }
}

fn log_outcome(
    action: &str,
    result: &std::result::Result<DatabaseOperationResult, xplan_io::ApiError>,
) {
    match result {
        Ok(reply) if reply.success => info!("database {} succeeded: {}", action, reply.message),
        Ok(reply) => warn!("database {} rejected: {}", action, reply.message),
        Err(e) => warn!("database {} failed: {}", action, e),
    }
}

/// Message shown for a failed database action: the raw error text.
pub fn failure_message(err: &Error) -> String {
    err.to_string()
}
