//! Database session abstraction.
//!
//! The interpreter consumes databases through the [`Session`] trait: an
//! opaque, stateful connection that can stream rows from a query or execute
//! statements without output. Backends live in submodules behind cargo
//! features and are reached through the [`open`] driver registry; hosts with
//! their own engine can implement [`Session`] directly and attach it to the
//! interpreter.
//!
//! Rows carry typed values. A backend that fails to convert one cell
//! reports a [`CellError`] for that cell only — the formatter recovers it as
//! `NULL` and the rest of the result set is unaffected.

use chrono::NaiveDateTime;

use crate::{Result, SquillError};

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PostgresSession;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSession;

/// One typed cell value as reported by a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Double(f64),
    Int(i32),
    BigInt(i64),
    UnsignedBigInt(u64),
    DateTime(NaiveDateTime),
    /// Blob, XML, and anything else with no text rendering. Not an error.
    Unsupported,
}

/// A per-cell conversion failure reported by the backend driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CellError(pub String);

pub type CellResult = std::result::Result<SqlValue, CellError>;

/// One named cell of one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: CellResult,
}

impl Field {
    pub fn new(name: impl Into<String>, value: SqlValue) -> Self {
        Self { name: name.into(), value: Ok(value) }
    }

    /// A cell the driver could not convert.
    pub fn broken(name: impl Into<String>, why: impl Into<String>) -> Self {
        Self { name: name.into(), value: Err(CellError(why.into())) }
    }
}

/// Row callback: invoked once per row, in result order, single pass.
///
/// A cursor object would borrow the backend statement which borrows the
/// connection, so the row stream is expressed as a visitor instead; the
/// stream stays lazy and is never rewound.
pub type RowVisitor<'a> = dyn FnMut(&[Field]) -> Result<()> + 'a;

/// An open, stateful connection to a backing SQL database.
///
/// At most one session is live per interpreter; `%LOAD` replaces it.
pub trait Session {
    /// Run a query, streaming each row into `on_row`.
    fn query(&mut self, sql: &str, on_row: &mut RowVisitor<'_>) -> Result<()>;

    /// Execute a statement (or batch) that produces no rows.
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// The driver name this session was opened with.
    fn driver(&self) -> &str;
}

/// Open a session by driver name, matched case-insensitively.
pub fn open(driver: &str, conn: &str) -> Result<Box<dyn Session>> {
    match driver.to_ascii_lowercase().as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" | "sqlite3" => Ok(Box::new(SqliteSession::open(conn)?)),
        #[cfg(feature = "postgres")]
        "postgres" | "postgresql" => Ok(Box::new(PostgresSession::open(conn)?)),
        other => Err(SquillError::UnknownDriver(other.to_string())),
    }
}
