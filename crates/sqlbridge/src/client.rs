//! Database client facade.
//!
//! A [`Client`] presents one logical connection to its callers. The first
//! `connect()` starts the single establishment attempt and every later
//! call - concurrent or subsequent - observes that attempt's outcome. A
//! settled outcome is never re-attempted: success hands out the shared
//! connection handle, failure re-delivers the same error.
//!
//! `query()` composes connection acquisition with statement preparation
//! and execution into one deferred operation.

use crate::config::ClientConfig;
use crate::establish::Establisher;
use crate::events::{ClientObserver, ObserverId, Observers};
use asupersync::sync::Mutex;
use sqlbridge_core::error::ConnectionErrorKind;
use sqlbridge_core::{Cursor, Cx, Driver, DriverConnection, DriverStatement, Error, Outcome, PrepareOptions};
use std::sync::{Arc, PoisonError};

/// The memoized connection outcome.
///
/// `Idle` until the first `connect()` takes the cell's lock; settles
/// exactly once and stays settled for the client's lifetime.
enum ConnectCell<C> {
    Idle,
    Settled(Result<Arc<C>, Error>),
}

/// Client for a single logical database connection.
///
/// The client owns its configuration and at most one connection-outcome
/// cell over its lifetime: there is no invalidation, reconnect, or pooling
/// path. Statement-level failures surface to the caller that triggered
/// them and leave the shared connection untouched.
pub struct Client<D: Driver> {
    establisher: Establisher<D>,
    config: std::sync::Mutex<ClientConfig>,
    cell: Mutex<ConnectCell<D::Conn>>,
    observers: Observers<D::Conn>,
}

impl<D: Driver> Client<D> {
    /// Create a client over the given driver, with an empty configuration.
    ///
    /// Call [`configure`](Client::configure) before connecting.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, ClientConfig::default())
    }

    /// Create a client over the given driver with a configuration.
    pub fn with_config(driver: D, config: ClientConfig) -> Self {
        Self {
            establisher: Establisher::new(Arc::new(driver)),
            config: std::sync::Mutex::new(config),
            cell: Mutex::new(ConnectCell::Idle),
            observers: Observers::new(),
        }
    }

    /// Replace the stored configuration.
    ///
    /// Configuration is read once, when the first connection attempt
    /// starts. Reconfiguring after that point only affects attempts that
    /// have not started - and in this single-connection model none ever
    /// will, so a memoized outcome is never affected.
    pub fn configure(&self, config: ClientConfig) {
        let mut stored = self.config.lock().unwrap_or_else(PoisonError::into_inner);
        *stored = config;
    }

    /// Get a copy of the stored configuration.
    pub fn config(&self) -> ClientConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe an observer to connection lifecycle events.
    ///
    /// Valid before or after the events fire; an observer subscribed
    /// after settlement simply never sees the already-delivered event.
    pub fn subscribe(&self, observer: Arc<dyn ClientObserver<D::Conn>>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    /// Remove a previously subscribed observer.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Open the connection, or return the memoized outcome.
    ///
    /// The first call starts the single establishment attempt; callers
    /// that arrive while it is in flight wait on the same attempt, and
    /// callers after settlement get the settled outcome back with no
    /// further driver invocation. On success the `connected` notification
    /// fires exactly once, with the shared handle; on failure the `error`
    /// notification fires exactly once and the same error is returned to
    /// every caller.
    pub async fn connect(&self, cx: &Cx) -> Outcome<Arc<D::Conn>, Error> {
        // The cell lock is held across the establishment await: whoever
        // takes it in the Idle state performs the one driver call, and
        // everyone queued behind observes the settled result.
        let mut cell = match self.cell.lock(cx).await {
            Ok(guard) => guard,
            Err(_) => return Outcome::Err(state_lock_error()),
        };

        if let ConnectCell::Settled(outcome) = &*cell {
            tracing::trace!("returning memoized connection outcome");
            return match outcome {
                Ok(conn) => Outcome::Ok(Arc::clone(conn)),
                Err(error) => Outcome::Err(error.clone()),
            };
        }

        // Configuration is read exactly once, here.
        let params = {
            let config = self.config.lock().unwrap_or_else(PoisonError::into_inner);
            config.open_params()
        };

        let attempt = match params {
            Ok(params) => self.establisher.establish(cx, &params).await,
            Err(error) => Outcome::Err(error),
        };

        // Observers are notified before the lock is released, so the
        // single emission precedes every waiter observing the outcome.
        match attempt {
            Outcome::Ok(conn) => {
                let conn = Arc::new(conn);
                *cell = ConnectCell::Settled(Ok(Arc::clone(&conn)));
                self.observers.notify_connected(&conn);
                Outcome::Ok(conn)
            }
            Outcome::Err(error) => {
                *cell = ConnectCell::Settled(Err(error.clone()));
                self.observers.notify_error(&error);
                Outcome::Err(error)
            }
            // Cancellation is not part of this client's model; an aborted
            // attempt is not a settled outcome and is not memoized.
            Outcome::Cancelled(reason) => Outcome::Cancelled(reason),
            Outcome::Panicked(payload) => Outcome::Panicked(payload),
        }
    }

    /// Run a SQL statement end-to-end and return a cursor over its results.
    ///
    /// Acquires the shared connection via [`connect`](Client::connect),
    /// prepares the statement with auto-release (its server-side
    /// resources are freed once execution completes), executes it, and
    /// hands the cursor to the caller. The result fails with whichever
    /// error occurred first: connection, prepare, or execution.
    ///
    /// A connection failure surfacing here still triggers the client's
    /// `error` notification - once, through the embedded `connect()`.
    /// Prepare and execution failures are delivered only to this caller:
    /// they emit no notification, are not memoized, and do not invalidate
    /// the shared connection.
    pub async fn query(&self, cx: &Cx, sql: &str) -> Outcome<Cursor, Error> {
        let conn = match self.connect(cx).await {
            Outcome::Ok(conn) => conn,
            Outcome::Err(error) => return Outcome::Err(error),
            Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
            Outcome::Panicked(payload) => return Outcome::Panicked(payload),
        };

        tracing::trace!(sql = %sql, "preparing one-shot statement");
        let options = PrepareOptions::new().auto_release(true);
        let stmt = match conn.prepare(cx, sql, &options).await {
            Outcome::Ok(stmt) => stmt,
            Outcome::Err(error) => return Outcome::Err(error),
            Outcome::Cancelled(reason) => return Outcome::Cancelled(reason),
            Outcome::Panicked(payload) => return Outcome::Panicked(payload),
        };

        stmt.exec(cx).await
    }
}

impl<D: Driver> std::fmt::Debug for Client<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config())
            .finish_non_exhaustive()
    }
}

fn state_lock_error() -> Error {
    Error::connection(
        ConnectionErrorKind::Connect,
        "failed to acquire client state lock",
    )
}
