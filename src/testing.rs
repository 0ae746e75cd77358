//! Canned in-memory session for exercising the formatter and dispatcher
//! without a database.

use crate::reader::{Field, RowVisitor, Session, SqlValue};
use crate::{Result, SquillError};

pub(crate) fn field(name: &str, value: SqlValue) -> Field {
    Field::new(name, value)
}

pub(crate) struct StaticSession {
    rows: Vec<Vec<Field>>,
    pub executed: Vec<String>,
    fail_with: Option<String>,
}

impl StaticSession {
    pub fn new(rows: Vec<Vec<Field>>) -> Self {
        Self { rows, executed: Vec::new(), fail_with: None }
    }

    /// A session whose every operation fails with a driver error.
    pub fn failing(message: &str) -> Self {
        Self { rows: Vec::new(), executed: Vec::new(), fail_with: Some(message.to_string()) }
    }
}

impl Session for StaticSession {
    fn query(&mut self, _sql: &str, on_row: &mut RowVisitor<'_>) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(SquillError::Database(message.clone()));
        }
        for row in &self.rows {
            on_row(row)?;
        }
        Ok(())
    }

    fn execute(&mut self, sql: &str) -> Result<()> {
        if let Some(message) = &self.fail_with {
            return Err(SquillError::Database(message.clone()));
        }
        self.executed.push(sql.to_string());
        Ok(())
    }

    fn driver(&self) -> &str {
        "static"
    }
}
