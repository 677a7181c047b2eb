//! Backend datastore connection settings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u32 = 30;

/// Connection settings sent to `/databaseconfig/{test|configure}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub server_name: String,
    pub database_name: String,
    pub use_windows_authentication: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub trust_server_certificate: bool,
    #[serde(default = "default_timeout")]
    pub connection_timeout: u32,
}

fn default_timeout() -> u32 {
    DEFAULT_CONNECTION_TIMEOUT_SECS
}

impl DatabaseConfig {
    /// Integrated (Windows) authentication.
    pub fn windows(server_name: impl Into<String>, database_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            database_name: database_name.into(),
            use_windows_authentication: true,
            username: None,
            password: None,
            trust_server_certificate: false,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT_SECS,
        }
    }

    /// SQL login authentication.
    pub fn sql(
        server_name: impl Into<String>,
        database_name: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            use_windows_authentication: false,
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::windows(server_name, database_name)
        }
    }

    pub fn with_trust_server_certificate(mut self, trust: bool) -> Self {
        self.trust_server_certificate = trust;
        self
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.connection_timeout = seconds;
        self
    }

    /// Local checks run before any request is sent.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.server_name.trim().is_empty() {
            return Err(ApiError::Validation("server name is required".into()));
        }
        if self.database_name.trim().is_empty() {
            return Err(ApiError::Validation("database name is required".into()));
        }
        if !self.use_windows_authentication
            && self.username.as_deref().map_or(true, |u| u.trim().is_empty())
        {
            return Err(ApiError::Validation(
                "a user name is required for SQL authentication".into(),
            ));
        }
        if self.connection_timeout == 0 {
            return Err(ApiError::Validation(
                "connection timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("server_name", &self.server_name)
            .field("database_name", &self.database_name)
            .field("use_windows_authentication", &self.use_windows_authentication)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("trust_server_certificate", &self.trust_server_certificate)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

/// Reply of `/databaseconfig/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatus {
    pub is_connected: bool,
    #[serde(default)]
    pub server_name: Option<String>,
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply of test/configure/disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseOperationResult {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
