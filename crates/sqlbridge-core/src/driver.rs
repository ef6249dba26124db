//! External driver traits.
//!
//! This module defines the seam between the client facade and the driver
//! that owns the wire protocol:
//!
//! - [`Driver`] - opens connections from a set of [`OpenParams`]
//! - [`DriverConnection`] - prepares statements against an open connection
//! - [`DriverStatement`] - executes a prepared statement into a [`Cursor`]
//!
//! All operations take a `Cx` context and return asupersync `Outcome`s.
//! The facade never reaches below this seam; authentication handshakes,
//! statement compilation, and result decoding are driver concerns.

use crate::cursor::Cursor;
use crate::error::Error;
use asupersync::{Cx, Outcome};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Parameters for opening a connection.
///
/// `username` and `password` are forwarded to the driver only when present;
/// an unset credential is absent from the serialized form entirely, never
/// an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenParams {
    /// Database name to connect to
    pub database: String,
    /// Username for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for authentication
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl OpenParams {
    /// Create parameters for the given database, with no credentials.
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
}

/// Options controlling statement preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrepareOptions {
    /// Release the statement's server-side resources automatically once
    /// execution completes, with no separate cleanup call.
    pub auto_release: bool,
}

impl PrepareOptions {
    /// Create options with defaults (no auto-release).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable auto-release.
    pub fn auto_release(mut self, enabled: bool) -> Self {
        self.auto_release = enabled;
        self
    }
}

/// A database driver capable of opening connections.
///
/// Implementations must be `Send + Sync`; a single driver handle may serve
/// connection attempts from multiple clients.
pub trait Driver: Send + Sync {
    /// The connection type produced by this driver.
    type Conn: DriverConnection;

    /// Open a connection. One attempt per call; retry policy, if any,
    /// belongs to the layer above.
    fn open(
        &self,
        cx: &Cx,
        params: &OpenParams,
    ) -> impl Future<Output = Outcome<Self::Conn, Error>> + Send;
}

/// An open driver connection.
///
/// The handle owns its resources and is shared read-mostly by all query
/// callers. Concurrent `prepare`/`exec` calls on one connection are not
/// serialized by this crate; a driver that cannot support concurrent use
/// of one connection must document that as a caller-facing constraint.
pub trait DriverConnection: Send + Sync + 'static {
    /// The prepared-statement type produced by this connection.
    type Stmt: DriverStatement;

    /// Compile a statement against this connection.
    fn prepare(
        &self,
        cx: &Cx,
        sql: &str,
        options: &PrepareOptions,
    ) -> impl Future<Output = Outcome<Self::Stmt, Error>> + Send;
}

/// A prepared statement, ready to execute.
///
/// Execution consumes the statement; with auto-release enabled the driver
/// frees its server-side resources once the cursor is produced.
pub trait DriverStatement: Send {
    /// Execute and produce a cursor over the results.
    fn exec(self, cx: &Cx) -> impl Future<Output = Outcome<Cursor, Error>> + Send;
}
