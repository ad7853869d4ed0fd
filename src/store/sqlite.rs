//! SQLite-backed table store
//!
//! One `rusqlite::Connection` serves both the ingestion phase and the later
//! query/publish phase (single writer, single reader at a time). Each
//! appended chunk runs inside its own transaction; there is no rollback
//! spanning chunks, so an aborted load leaves the chunks that already
//! committed.

use crate::error::{PipelineError, Result};
use crate::store::{Cell, TableStore};
use polars::prelude::*;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::debug;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Column names of `table`, or None if the table does not exist yet.
    fn table_columns(&self, table: &str) -> Result<Option<Vec<String>>> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get::<_, i64>(0),
            )
            .map(|n| n > 0)?;
        if !exists {
            return Ok(None);
        }

        let sql = format!("PRAGMA table_info({})", quote_ident(table));
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Some(names))
    }

    fn create_table(&self, table: &str, columns: &[String]) -> Result<()> {
        let cols = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("CREATE TABLE {} ({})", quote_ident(table), cols);
        debug!("Creating table: {}", sql);
        self.conn.execute(&sql, [])?;
        Ok(())
    }
}

impl TableStore for SqliteStore {
    fn bulk_append(&mut self, table: &str, columns: &[String], rows: &[Vec<Cell>]) -> Result<()> {
        match self.table_columns(table)? {
            Some(existing) => {
                if existing != columns {
                    return Err(PipelineError::SchemaMismatch {
                        table: table.to_string(),
                        expected: existing,
                        found: columns.to_vec(),
                    });
                }
            }
            None => self.create_table(table, columns)?,
        }

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(table),
            placeholders
        );

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter().map(cell_to_sql)))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn execute_query(&self, sql: &str) -> Result<DataFrame> {
        let mut stmt = self.conn.prepare(sql)?;
        let names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

        let mut columns: Vec<Vec<SqlValue>> = vec![Vec::new(); names.len()];
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            for (i, out) in columns.iter_mut().enumerate() {
                out.push(row.get_ref(i)?.into());
            }
        }

        let series = names
            .iter()
            .zip(columns)
            .map(|(name, values)| column_to_series(name, values))
            .collect::<Vec<_>>();
        Ok(DataFrame::new(series)?)
    }

    fn replace_table(&mut self, table: &str, df: &DataFrame) -> Result<()> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let tx = self.conn.transaction()?;
        tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)), [])?;

        let cols = columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        tx.execute(&format!("CREATE TABLE {} ({})", quote_ident(table), cols), [])?;

        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(table),
            placeholders
        );
        {
            let mut stmt = tx.prepare(&sql)?;
            let serieses = df.get_columns();
            for idx in 0..df.height() {
                let mut row = Vec::with_capacity(serieses.len());
                for s in serieses {
                    row.push(any_value_to_sql(s, idx)?);
                }
                stmt.execute(params_from_iter(row))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Quote a SQL identifier; table names come straight from file stems.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn cell_to_sql(cell: &Cell) -> SqlValue {
    match cell {
        Cell::Null => SqlValue::Null,
        Cell::Bool(b) => SqlValue::Integer(*b as i64),
        Cell::Int(i) => SqlValue::Integer(*i),
        Cell::Float(f) => SqlValue::Real(*f),
        Cell::Text(s) => SqlValue::Text(s.clone()),
    }
}

/// Build a Series from one result-set column, picking the narrowest dtype
/// that fits the observed SQLite values. A column holding only NULLs becomes
/// a null Float64 series so the enricher's zero-fill applies to it.
fn column_to_series(name: &str, values: Vec<SqlValue>) -> Series {
    let mut has_int = false;
    let mut has_real = false;
    let mut has_text = false;
    for v in &values {
        match v {
            SqlValue::Integer(_) => has_int = true,
            SqlValue::Real(_) => has_real = true,
            SqlValue::Text(_) | SqlValue::Blob(_) => has_text = true,
            SqlValue::Null => {}
        }
    }

    if has_text {
        let out: Vec<Option<String>> = values
            .into_iter()
            .map(|v| match v {
                SqlValue::Null => None,
                SqlValue::Integer(i) => Some(i.to_string()),
                SqlValue::Real(r) => Some(r.to_string()),
                SqlValue::Text(s) => Some(s),
                SqlValue::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
            })
            .collect();
        Series::new(name, out)
    } else if has_real {
        let out: Vec<Option<f64>> = values
            .into_iter()
            .map(|v| match v {
                SqlValue::Integer(i) => Some(i as f64),
                SqlValue::Real(r) => Some(r),
                _ => None,
            })
            .collect();
        Series::new(name, out)
    } else if has_int {
        let out: Vec<Option<i64>> = values
            .into_iter()
            .map(|v| match v {
                SqlValue::Integer(i) => Some(i),
                _ => None,
            })
            .collect();
        Series::new(name, out)
    } else {
        let out: Vec<Option<f64>> = values.into_iter().map(|_| None).collect();
        Series::new(name, out)
    }
}

fn any_value_to_sql(series: &Series, idx: usize) -> Result<SqlValue> {
    let av = series
        .get(idx)
        .map_err(|e| PipelineError::Polars(e.to_string()))?;
    if matches!(av, AnyValue::Null) {
        return Ok(SqlValue::Null);
    }

    let value = match series.dtype() {
        dt if dt.is_integer() => av
            .try_extract::<i64>()
            .map(SqlValue::Integer)
            .unwrap_or(SqlValue::Null),
        DataType::Float32 | DataType::Float64 => av
            .try_extract::<f64>()
            .map(SqlValue::Real)
            .unwrap_or(SqlValue::Null),
        DataType::Boolean => match av {
            AnyValue::Boolean(b) => SqlValue::Integer(b as i64),
            _ => SqlValue::Null,
        },
        DataType::String => match av {
            AnyValue::String(s) => SqlValue::Text(s.to_string()),
            AnyValue::StringOwned(s) => SqlValue::Text(s.to_string()),
            other => SqlValue::Text(other.to_string()),
        },
        _ => SqlValue::Text(av.to_string()),
    };
    Ok(value)
}
