//! Connection establishment.
//!
//! Bridges a single connection-opening call against the external driver
//! into one deferred outcome. One driver invocation per call, no retry;
//! a failure is terminal for that invocation.

use sqlbridge_core::error::{ConnectionError, ConnectionErrorKind};
use sqlbridge_core::{Cx, Driver, Error, OpenParams, Outcome};
use std::sync::Arc;

/// Turns a connect request into a completed connection or a failure.
pub struct Establisher<D> {
    driver: Arc<D>,
}

impl<D: Driver> Establisher<D> {
    /// Wrap a driver handle.
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }

    /// Get the underlying driver handle.
    pub fn driver(&self) -> &Arc<D> {
        &self.driver
    }

    /// Open a connection with the given parameters.
    ///
    /// Failures surface in the connection taxonomy: a driver error from
    /// another category is wrapped rather than passed through.
    pub async fn establish(&self, cx: &Cx, params: &OpenParams) -> Outcome<D::Conn, Error> {
        tracing::debug!(database = %params.database, "opening database connection");

        match self.driver.open(cx, params).await {
            Outcome::Ok(conn) => {
                tracing::debug!(database = %params.database, "connection established");
                Outcome::Ok(conn)
            }
            Outcome::Err(error) => {
                tracing::warn!(
                    database = %params.database,
                    error = %error,
                    "connection attempt failed"
                );
                Outcome::Err(into_connection_error(error))
            }
            Outcome::Cancelled(reason) => Outcome::Cancelled(reason),
            Outcome::Panicked(payload) => Outcome::Panicked(payload),
        }
    }
}

impl<D> std::fmt::Debug for Establisher<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Establisher").finish_non_exhaustive()
    }
}

fn into_connection_error(error: Error) -> Error {
    match error {
        Error::Connection(_) => error,
        other => Error::Connection(ConnectionError {
            kind: ConnectionErrorKind::Driver,
            message: format!("driver failed to open connection: {other}"),
            source: Some(Arc::new(other)),
        }),
    }
}
