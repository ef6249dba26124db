//! Error types for sqlbridge operations.

use std::fmt;
use std::sync::Arc;

/// Shared error source.
///
/// Sources are reference-counted rather than boxed so a settled connection
/// failure can be handed out to every later caller as the same value.
pub type SharedSource = Arc<dyn std::error::Error + Send + Sync>;

/// The primary error type for all sqlbridge operations.
#[derive(Debug, Clone)]
pub enum Error {
    /// Invalid or missing client configuration
    Config(ConfigError),
    /// Driver-level failure to establish a connection
    Connection(ConnectionError),
    /// Failure to prepare a SQL statement
    Statement(StatementError),
    /// Failure during statement execution
    Execution(ExecutionError),
    /// Typed access to a result value failed
    Type(TypeError),
}

#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub source: Option<SharedSource>,
}

#[derive(Debug, Clone)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<SharedSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to establish connection
    Connect,
    /// Authentication failed
    Authentication,
    /// Connection refused
    Refused,
    /// DNS resolution failed
    DnsResolution,
    /// Target database does not exist or is not accessible
    InvalidDatabase,
    /// Driver reported a failure outside the connection taxonomy
    Driver,
}

#[derive(Debug, Clone)]
pub struct StatementError {
    pub kind: StatementErrorKind,
    /// The statement text that failed, if available
    pub sql: Option<String>,
    pub message: String,
    pub source: Option<SharedSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementErrorKind {
    /// Syntax error in the statement text
    Syntax,
    /// Permission denied for the statement
    Permission,
    /// Other prepare-time failure
    Prepare,
}

#[derive(Debug, Clone)]
pub struct ExecutionError {
    pub kind: ExecutionErrorKind,
    pub message: String,
    pub source: Option<SharedSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionErrorKind {
    /// The statement failed while executing
    Execute,
    /// The driver failed while producing the results cursor
    Cursor,
}

#[derive(Debug, Clone)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(ConfigError {
            message: message.into(),
            source: None,
        })
    }

    /// Create a connection error.
    pub fn connection(kind: ConnectionErrorKind, message: impl Into<String>) -> Self {
        Error::Connection(ConnectionError {
            kind,
            message: message.into(),
            source: None,
        })
    }

    /// Create a statement error.
    pub fn statement(kind: StatementErrorKind, message: impl Into<String>) -> Self {
        Error::Statement(StatementError {
            kind,
            sql: None,
            message: message.into(),
            source: None,
        })
    }

    /// Create an execution error.
    pub fn execution(kind: ExecutionErrorKind, message: impl Into<String>) -> Self {
        Error::Execution(ExecutionError {
            kind,
            message: message.into(),
            source: None,
        })
    }

    /// Is this a connection-establishment failure?
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Is this a per-statement failure (prepare or execute)?
    ///
    /// Statement-level failures never invalidate an established connection.
    pub fn is_statement_error(&self) -> bool {
        matches!(self, Error::Statement(_) | Error::Execution(_))
    }

    /// Get the SQL that caused this error, if available.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Error::Statement(s) => s.sql.as_deref(),
            _ => None,
        }
    }
}

impl StatementError {
    /// Attach the statement text that failed.
    pub fn with_sql(mut self, sql: impl Into<String>) -> Self {
        self.sql = Some(sql.into());
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e.message),
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Statement(e) => {
                if let Some(sql) = &e.sql {
                    write!(f, "Statement error in {:?}: {}", sql, e.message)
                } else {
                    write!(f, "Statement error: {}", e.message)
                }
            }
            Error::Execution(e) => write!(f, "Execution error: {}", e.message),
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Connection(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Statement(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Execution(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            Error::Type(_) => None,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for StatementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(col) = &self.column {
            write!(
                f,
                "expected {} for column '{}', found {}",
                self.expected, col, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<ConnectionError> for Error {
    fn from(err: ConnectionError) -> Self {
        Error::Connection(err)
    }
}

impl From<StatementError> for Error {
    fn from(err: StatementError) -> Self {
        Error::Statement(err)
    }
}

impl From<ExecutionError> for Error {
    fn from(err: ExecutionError) -> Self {
        Error::Execution(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

/// Result type alias for sqlbridge operations.
pub type Result<T> = std::result::Result<T, Error>;
