//! Core types and traits for sqlbridge.
//!
//! This crate provides the foundational abstractions shared by the client
//! facade and driver implementations:
//!
//! - `Driver` traits describing the external-driver seam
//! - `Error` taxonomy for connection, statement, and execution failures
//! - `Row`/`Value`/`Cursor` result representation
//! - `Cx`/`Outcome` re-exports from asupersync

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod cursor;
pub mod driver;
pub mod error;
pub mod row;
pub mod value;

pub use cursor::Cursor;
pub use driver::{Driver, DriverConnection, DriverStatement, OpenParams, PrepareOptions};
pub use error::{Error, Result};
pub use row::{ColumnInfo, FromValue, Row};
pub use value::Value;
