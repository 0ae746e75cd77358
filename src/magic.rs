//! Cell classification.
//!
//! One cell of input becomes exactly one [`Command`] (or none, for a blank
//! cell). Classification is pure: it inspects text and produces a value,
//! leaving session and spec-registry mutation to the interpreter.

use crate::token::{self, tokenize};
use crate::{Result, SquillError};

/// The chart magic: `%PLOT <directive>... <> <sql>...`.
pub const CHART_MAGIC: &str = "PLOT";
/// The spec magic: `%VEGA_LITE SET <name>` / `%VEGA_LITE <name-or-path>`.
pub const SPEC_MAGIC: &str = "VEGA_LITE";
/// The session magic: `%LOAD <driver> <connection-arg>...`.
pub const LOAD_MAGIC: &str = "LOAD";

/// Leading keywords that make a raw SQL cell render a table.
const TABULAR_KEYWORDS: [&str; 4] = ["SELECT", "DESC", "DESCRIBE", "SHOW"];

/// Everything a cell can ask the interpreter to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new session, replacing any previously open one.
    Load { driver: String, conn: String },
    /// Run SQL, then hand the resulting frame to the chart renderer.
    Plot { directives: Vec<String>, sql: String },
    /// Register a named chart spec.
    SpecSet { name: String, json_text: String },
    /// Render a stored or file-loaded spec, optionally merging in SQL data.
    SpecRender { name_or_path: String, sql: Option<String> },
    /// A non-magic cell, forwarded to the session verbatim.
    Sql { text: String, kind: SqlKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlKind {
    /// Renders a table (`SELECT`, `DESC`, `DESCRIBE`, `SHOW`).
    Tabular,
    /// Executes without output (DDL, DML, pragmas, ...).
    NonTabular,
}

/// Classify a cell. Returns `None` for blank input.
///
/// Magic names are matched case-insensitively against the first token, chart
/// magic first, then the spec magic, then `LOAD`; any other `%`-line is an
/// [`SquillError::UnknownCommand`].
pub fn classify(code: &str) -> Result<Option<Command>> {
    let (first_line, body) = token::first_line_and_rest(code);
    let tokens = tokenize(&first_line);
    let Some(head) = tokens.first() else {
        return Ok(None);
    };

    if !token::is_magic(&tokens) {
        let kind = if TABULAR_KEYWORDS
            .iter()
            .any(|kw| token::starts_with_keyword(&tokens, kw))
        {
            SqlKind::Tabular
        } else {
            SqlKind::NonTabular
        };
        return Ok(Some(Command::Sql { text: code.to_string(), kind }));
    }

    let magic = &head[1..];

    if magic.eq_ignore_ascii_case(CHART_MAGIC) {
        // chart directives and SQL may spill over multiple lines
        let mut all = tokenize(code);
        all.remove(0);
        let Some(split) = all.iter().position(|t| t == "<>") else {
            return Err(SquillError::Parse(format!(
                "missing '<>' separator: {first_line}"
            )));
        };
        let sql = all[split + 1..].join(" ");
        all.truncate(split);
        return Ok(Some(Command::Plot { directives: all, sql }));
    }

    if magic.eq_ignore_ascii_case(SPEC_MAGIC) {
        if tokens.len() < 2 {
            return Err(SquillError::Parse(format!("invalid input: {first_line}")));
        }
        if tokens[1].eq_ignore_ascii_case("SET") {
            if tokens.len() < 3 {
                return Err(SquillError::Parse(format!("invalid input: {first_line}")));
            }
            let json_text = body.trim();
            if json_text.is_empty() {
                return Err(SquillError::EmptySpec);
            }
            return Ok(Some(Command::SpecSet {
                name: tokens[2].clone(),
                json_text: json_text.to_string(),
            }));
        }
        let sql = body.trim();
        return Ok(Some(Command::SpecRender {
            name_or_path: tokens[1].clone(),
            sql: (!sql.is_empty()).then(|| sql.to_string()),
        }));
    }

    if magic.eq_ignore_ascii_case(LOAD_MAGIC) {
        if tokens.len() < 2 {
            return Err(SquillError::Parse(format!("invalid input: {first_line}")));
        }
        return Ok(Some(Command::Load {
            driver: tokens[1].to_lowercase(),
            conn: tokens[2..].join(" "),
        }));
    }

    Err(SquillError::UnknownCommand(magic.to_string()))
}
