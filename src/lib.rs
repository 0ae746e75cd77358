/*!
squill — a notebook-style SQL interpreter core.

A cell of text arrives from the host (a notebook frontend, a REPL, a test
harness); squill classifies it as either a `%`-magic command or raw SQL,
executes it against the currently loaded database session, and renders the
result in three synchronized representations: a plain-text table, an HTML
table, and a columnar [`Frame`] suitable for charting.

# Magic commands

```text
%LOAD <driver> <connection-arg>...
%PLOT <directive>... <> <sql-token>...
%VEGA_LITE SET <spec-name>
{ ...json spec... }
%VEGA_LITE <spec-name-or-file-path>
[sql query]
```

Anything not starting with `%` is forwarded to the session as SQL: leading
`SELECT`/`DESC`/`DESCRIBE`/`SHOW` keywords render a table, everything else
executes without output.

# Example

```rust,ignore
use squill::{CollectingPublisher, Interpreter};

let mut interp = Interpreter::new();
let mut publisher = CollectingPublisher::new();
interp.execute("%LOAD sqlite3 dbname=test.db", &mut publisher);
interp.execute("SELECT * FROM t", &mut publisher);
```

The host environment delivers one cell at a time and owns the transport;
replies are plain data ([`ExecuteReply`]) and rendered bodies travel through
the [`Publisher`] side-channel keyed by mimetype.
*/

use thiserror::Error;

pub mod complete;
pub mod format;
pub mod frame;
pub mod interpreter;
pub mod magic;
pub mod reader;
pub mod reply;
pub mod specs;
pub mod token;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use frame::Frame;
pub use interpreter::Interpreter;
pub use reply::{CollectingPublisher, ExecuteReply, MimeBundle, Publisher};

/// Crate version, re-exported for hosts that report it.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Request-level failures.
///
/// Each variant becomes one error reply plus one published error event.
/// Per-cell coercion failures are deliberately absent: the formatter
/// recovers them locally and renders `NULL` (see [`format::cell_text`]).
#[derive(Debug, Error)]
pub enum SquillError {
    /// Malformed magic line: wrong arity, missing separator.
    #[error("invalid input: {0}")]
    Parse(String),

    /// A `%`-line whose command matches no known magic.
    #[error("command is not valid: %{0}")]
    UnknownCommand(String),

    /// SQL (or a SQL-running magic) arrived with no open session.
    #[error("database was not loaded")]
    SessionNotLoaded,

    /// `%LOAD` named a driver with no registered backend.
    #[error("unknown driver: {0}")]
    UnknownDriver(String),

    /// `%VEGA_LITE <name>` resolved neither a stored spec nor a file.
    #[error("no spec or spec file named '{0}'")]
    SpecNotFound(String),

    /// `%VEGA_LITE SET` with a blank body.
    #[error("spec is empty")]
    EmptySpec,

    /// A spec body or spec file that is not a JSON object.
    #[error("invalid spec json: {0}")]
    SpecJson(String),

    /// A chart was requested over a result set with no columns.
    #[error("empty result from sql, can't render")]
    EmptyChartResult,

    /// The chart renderer rejected its input.
    #[error("{0}")]
    Chart(String),

    /// Driver-reported failure during open, query, or execute.
    /// The driver's message is passed through verbatim.
    #[error("{0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, SquillError>;
