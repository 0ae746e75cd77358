//! SQLite session backend.
//!
//! Accepts `dbname=<path>` connection strings (the shape the `%LOAD` magic
//! historically used) as well as bare paths; an empty path or `:memory:`
//! opens an in-memory database.

use rusqlite::types::ValueRef;
use rusqlite::Connection;

use super::{CellError, CellResult, Field, RowVisitor, Session, SqlValue};
use crate::{Result, SquillError};

pub struct SqliteSession {
    conn: Connection,
}

impl SqliteSession {
    pub fn open(conn_args: &str) -> Result<Self> {
        let path = database_path(conn_args);
        let conn = if path.is_empty() || path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .map_err(db_err)?;
        Ok(Self { conn })
    }
}

impl Session for SqliteSession {
    fn query(&mut self, sql: &str, on_row: &mut RowVisitor<'_>) -> Result<()> {
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();
        let mut rows = stmt.query([]).map_err(db_err)?;
        while let Some(row) = rows.next().map_err(db_err)? {
            let fields: Vec<_> = names
                .iter()
                .enumerate()
                .map(|(i, name)| Field {
                    name: name.clone(),
                    value: read_cell(row, i),
                })
                .collect();
            on_row(&fields)?;
        }
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql).map_err(db_err)
    }

    fn driver(&self) -> &str {
        "sqlite3"
    }
}

fn read_cell(row: &rusqlite::Row<'_>, idx: usize) -> CellResult {
    match row.get_ref(idx) {
        Ok(ValueRef::Null) => Ok(SqlValue::Null),
        Ok(ValueRef::Integer(v)) => Ok(SqlValue::BigInt(v)),
        Ok(ValueRef::Real(v)) => Ok(SqlValue::Double(v)),
        Ok(ValueRef::Text(bytes)) => match std::str::from_utf8(bytes) {
            Ok(text) => Ok(SqlValue::Text(text.to_string())),
            Err(err) => Err(CellError(err.to_string())),
        },
        Ok(ValueRef::Blob(_)) => Ok(SqlValue::Unsupported),
        Err(err) => Err(CellError(err.to_string())),
    }
}

fn database_path(conn_args: &str) -> &str {
    for part in conn_args.split_whitespace() {
        if let Some(path) = part.strip_prefix("dbname=") {
            return path;
        }
    }
    conn_args.trim()
}

fn db_err(err: rusqlite::Error) -> SquillError {
    SquillError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(session: &mut SqliteSession, sql: &str) -> Vec<Vec<(String, SqlValue)>> {
        let mut rows = Vec::new();
        let mut on_row = |fields: &[Field]| -> crate::Result<()> {
            rows.push(
                fields
                    .iter()
                    .map(|f| (f.name.clone(), f.value.clone().expect("cell error")))
                    .collect(),
            );
            Ok(())
        };
        session.query(sql, &mut on_row).expect("query failed");
        rows
    }

    #[test]
    fn dbname_connection_string_is_parsed() {
        assert_eq!(database_path("dbname=test.db"), "test.db");
        assert_eq!(database_path("dbname=test.db mode=ro"), "test.db");
        assert_eq!(database_path(":memory:"), ":memory:");
        assert_eq!(database_path("plain.db"), "plain.db");
    }

    #[test]
    fn streams_typed_rows() {
        let mut session = SqliteSession::open(":memory:").unwrap();
        session
            .execute("CREATE TABLE t (n INTEGER, x REAL, s TEXT); INSERT INTO t VALUES (1, 2.5, 'hi');")
            .unwrap();
        let rows = collect(&mut session, "SELECT n, x, s FROM t");
        assert_eq!(
            rows,
            vec![vec![
                ("n".to_string(), SqlValue::BigInt(1)),
                ("x".to_string(), SqlValue::Double(2.5)),
                ("s".to_string(), SqlValue::Text("hi".to_string())),
            ]]
        );
    }

    #[test]
    fn nulls_and_blobs_have_their_own_values() {
        let mut session = SqliteSession::open(":memory:").unwrap();
        session
            .execute("CREATE TABLE t (a, b); INSERT INTO t VALUES (NULL, x'00ff');")
            .unwrap();
        let rows = collect(&mut session, "SELECT a, b FROM t");
        assert_eq!(rows[0][0].1, SqlValue::Null);
        assert_eq!(rows[0][1].1, SqlValue::Unsupported);
    }

    #[test]
    fn bad_sql_is_a_database_error() {
        let mut session = SqliteSession::open(":memory:").unwrap();
        let mut on_row = |_: &[Field]| -> crate::Result<()> { Ok(()) };
        assert!(matches!(
            session.query("SELECT * FROM missing", &mut on_row),
            Err(SquillError::Database(_))
        ));
    }
}
