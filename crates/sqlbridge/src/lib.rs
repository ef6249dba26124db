//! sqlbridge - a single-connection SQL client facade.
//!
//! The facade coordinates the connection lifecycle and the one-shot query
//! pipeline over an external driver:
//!
//! - [`Client`] memoizes a single connection-establishment outcome and
//!   exposes `connect()` and `query()`
//! - [`Establisher`] bridges one driver `open` call into a deferred result
//! - [`ClientObserver`] receives the once-per-client lifecycle events
//!
//! The wire protocol, authentication handshake, statement compilation,
//! and cursor internals belong to the driver behind the
//! [`Driver`] trait seam; this crate never reaches below it.
//!
//! # Example
//!
//! ```ignore
//! use sqlbridge::{Client, ClientConfig};
//!
//! async fn run(cx: &Cx, driver: impl Driver) {
//!     let client = Client::with_config(
//!         driver,
//!         ClientConfig::new("stores").username("ifxuser").password("secret"),
//!     );
//!
//!     // connect() is implicit; the first query establishes the connection.
//!     let mut cursor = client.query(cx, "SELECT 1 AS one").await.unwrap();
//!     while let Some(row) = cursor.next_row() {
//!         println!("{:?}", row.get_named::<i64>("one"));
//!     }
//! }
//! ```

// Re-export the core surface
pub use sqlbridge_core::{
    ColumnInfo, Cursor, Cx, Driver, DriverConnection, DriverStatement, Error, FromValue,
    OpenParams, Outcome, PrepareOptions, Result, Row, Value, error,
};

pub mod client;
pub mod config;
pub mod establish;
pub mod events;

pub use client::Client;
pub use config::ClientConfig;
pub use establish::Establisher;
pub use events::{ClientObserver, ObserverId};
