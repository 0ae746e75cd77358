//! PostgreSQL session backend.
//!
//! Connection strings are passed straight through to the driver
//! (`host=... user=... dbname=...`). The synchronous client materializes
//! each result set before the rows are visited.

use chrono::{DateTime, Utc};
use postgres::types::Type;
use postgres::{Client, NoTls};

use super::{CellError, CellResult, Field, RowVisitor, Session, SqlValue};
use crate::{Result, SquillError};

pub struct PostgresSession {
    client: Client,
}

impl PostgresSession {
    pub fn open(conn_args: &str) -> Result<Self> {
        let client = Client::connect(conn_args, NoTls).map_err(db_err)?;
        Ok(Self { client })
    }
}

impl Session for PostgresSession {
    fn query(&mut self, sql: &str, on_row: &mut RowVisitor<'_>) -> Result<()> {
        let rows = self.client.query(sql, &[]).map_err(db_err)?;
        for row in &rows {
            let fields: Vec<_> = row
                .columns()
                .iter()
                .enumerate()
                .map(|(i, column)| Field {
                    name: column.name().to_string(),
                    value: read_cell(row, i),
                })
                .collect();
            on_row(&fields)?;
        }
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<()> {
        self.client.batch_execute(sql).map_err(db_err)
    }

    fn driver(&self) -> &str {
        "postgresql"
    }
}

fn read_cell(row: &postgres::Row, idx: usize) -> CellResult {
    let ty = row.columns()[idx].type_();

    // try_get failures (overflow, unexpected wire format) are per-cell
    // conversion errors, recovered by the formatter as NULL
    if *ty == Type::INT2 {
        typed(row.try_get::<_, Option<i16>>(idx), |v| SqlValue::Int(v.into()))
    } else if *ty == Type::INT4 {
        typed(row.try_get::<_, Option<i32>>(idx), SqlValue::Int)
    } else if *ty == Type::INT8 {
        typed(row.try_get::<_, Option<i64>>(idx), SqlValue::BigInt)
    } else if *ty == Type::FLOAT4 {
        typed(row.try_get::<_, Option<f32>>(idx), |v| SqlValue::Double(v.into()))
    } else if *ty == Type::FLOAT8 {
        typed(row.try_get::<_, Option<f64>>(idx), SqlValue::Double)
    } else if *ty == Type::TEXT || *ty == Type::VARCHAR || *ty == Type::BPCHAR || *ty == Type::NAME
    {
        typed(row.try_get::<_, Option<String>>(idx), SqlValue::Text)
    } else if *ty == Type::BOOL {
        typed(row.try_get::<_, Option<bool>>(idx), |v| {
            SqlValue::Text(v.to_string())
        })
    } else if *ty == Type::TIMESTAMP {
        typed(row.try_get::<_, Option<chrono::NaiveDateTime>>(idx), SqlValue::DateTime)
    } else if *ty == Type::TIMESTAMPTZ {
        typed(row.try_get::<_, Option<DateTime<Utc>>>(idx), |v| {
            SqlValue::DateTime(v.naive_utc())
        })
    } else if *ty == Type::DATE {
        typed(row.try_get::<_, Option<chrono::NaiveDate>>(idx), |v| {
            match v.and_hms_opt(0, 0, 0) {
                Some(at_midnight) => SqlValue::DateTime(at_midnight),
                None => SqlValue::Null,
            }
        })
    } else {
        Ok(SqlValue::Unsupported)
    }
}

fn typed<T>(
    fetched: std::result::Result<Option<T>, postgres::Error>,
    into_value: impl FnOnce(T) -> SqlValue,
) -> CellResult {
    match fetched {
        Ok(Some(v)) => Ok(into_value(v)),
        Ok(None) => Ok(SqlValue::Null),
        Err(err) => Err(CellError(err.to_string())),
    }
}

fn db_err(err: postgres::Error) -> SquillError {
    SquillError::Database(err.to_string())
}
