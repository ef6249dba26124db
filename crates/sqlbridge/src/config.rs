//! Client configuration.

use serde::{Deserialize, Serialize};
use sqlbridge_core::{Error, OpenParams, Result};

/// Connection configuration for a [`Client`](crate::Client).
///
/// The configuration is read once, when the first connection attempt
/// starts; replacing it afterwards never affects an attempt that is
/// already in flight or settled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Database name to connect to
    pub database: String,
    /// Username for authentication
    pub username: Option<String>,
    /// Password for authentication
    pub password: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the given database, with no credentials.
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            username: None,
            password: None,
        }
    }

    /// Set the username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Build the parameter set forwarded to the driver.
    ///
    /// Credentials that are unset or empty are omitted entirely; the
    /// driver never sees an empty-string username or password. Fails with
    /// a configuration error when the database name is missing.
    #[allow(clippy::result_large_err)]
    pub fn open_params(&self) -> Result<OpenParams> {
        if self.database.is_empty() {
            return Err(Error::config("database name is required"));
        }

        Ok(OpenParams {
            database: self.database.clone(),
            username: self.username.clone().filter(|s| !s.is_empty()),
            password: self.password.clone().filter(|s| !s.is_empty()),
        })
    }
}
