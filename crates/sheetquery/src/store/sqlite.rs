//! SQLite-backed relational store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params, params_from_iter, Connection, ToSql, Transaction};
use tracing::debug;

use crate::config::StoreConfig;
use crate::error::{Result, SheetQueryError};
use crate::schema::{CellValue, CleanedColumn, DATETIME_FORMAT};

use super::backend::{quote_identifier, RelationalStore, ResultSet};

/// SQLite relational store.
///
/// One connection guarded by a mutex; writes to a single table happen inside
/// one transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    config: StoreConfig,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| SheetQueryError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            SheetQueryError::Config(format!(
                "Failed to open database '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
            config: StoreConfig::File(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SheetQueryError::Config(format!("Failed to open in-memory database: {}", e))
        })?;

        Ok(Self {
            conn: Mutex::new(conn),
            config: StoreConfig::InMemory,
        })
    }

    /// Open the store described by `config`.
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        match config {
            StoreConfig::File(path) => Self::open(path),
            StoreConfig::InMemory => Self::open_in_memory(),
        }
    }

    /// Where this store lives.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn lock(&self, table: &str) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| SheetQueryError::storage(table, "database connection lock poisoned"))
    }
}

fn create_table(tx: &Transaction<'_>, name: &str, columns: &[CleanedColumn]) -> Result<()> {
    let table = quote_identifier(name)?;
    let defs = columns
        .iter()
        .map(|c| Ok(format!("{} {}", quote_identifier(&c.name)?, c.kind.as_sql_type())))
        .collect::<Result<Vec<_>>>()?;

    tx.execute(&format!("CREATE TABLE {} ({})", table, defs.join(", ")), [])
        .map_err(|e| SheetQueryError::storage(name, e))?;
    Ok(())
}

fn insert_rows(
    tx: &Transaction<'_>,
    name: &str,
    columns: &[CleanedColumn],
    rows: &[Vec<CellValue>],
) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let table = quote_identifier(name)?;
    let names = columns
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect::<Result<Vec<_>>>()?;
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        names.join(", "),
        placeholders.join(", ")
    );

    let mut stmt = tx
        .prepare(&sql)
        .map_err(|e| SheetQueryError::storage(name, e))?;
    for row in rows {
        if row.len() != columns.len() {
            return Err(SheetQueryError::storage(
                name,
                format!("row has {} values, expected {}", row.len(), columns.len()),
            ));
        }
        stmt.execute(params_from_iter(row.iter()))
            .map_err(|e| SheetQueryError::storage(name, e))?;
    }
    Ok(())
}

fn table_exists_in(conn: &Connection, name: &str) -> Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        params![name],
        |row| row.get::<_, i64>(0),
    )
    .map(|count| count > 0)
    .map_err(|e| SheetQueryError::storage(name, e))
}

impl RelationalStore for SqliteStore {
    fn replace_table(
        &self,
        name: &str,
        columns: &[CleanedColumn],
        rows: &[Vec<CellValue>],
    ) -> Result<()> {
        let table = quote_identifier(name)?;
        let mut conn = self.lock(name)?;
        let tx = conn
            .transaction()
            .map_err(|e| SheetQueryError::storage(name, e))?;

        tx.execute(&format!("DROP TABLE IF EXISTS {}", table), [])
            .map_err(|e| SheetQueryError::storage(name, e))?;
        create_table(&tx, name, columns)?;
        insert_rows(&tx, name, columns, rows)?;

        tx.commit().map_err(|e| SheetQueryError::storage(name, e))?;
        debug!(table = name, rows = rows.len(), "replaced table");
        Ok(())
    }

    fn append_rows(
        &self,
        name: &str,
        columns: &[CleanedColumn],
        rows: &[Vec<CellValue>],
    ) -> Result<()> {
        let mut conn = self.lock(name)?;
        let tx = conn
            .transaction()
            .map_err(|e| SheetQueryError::storage(name, e))?;

        if !table_exists_in(&tx, name)? {
            create_table(&tx, name, columns)?;
        }
        insert_rows(&tx, name, columns, rows)?;

        tx.commit().map_err(|e| SheetQueryError::storage(name, e))?;
        debug!(table = name, rows = rows.len(), "appended rows");
        Ok(())
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let conn = self.lock(name)?;
        table_exists_in(&conn, name)
    }

    fn query(&self, sql: &str) -> Result<ResultSet> {
        let conn = self.lock("<query>")?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SheetQueryError::QueryExecution(e.to_string()))?;

        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(value_from_sql))
                    .collect::<rusqlite::Result<Vec<CellValue>>>()
            })
            .map_err(|e| SheetQueryError::QueryExecution(e.to_string()))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| SheetQueryError::QueryExecution(e.to_string()))?;

        Ok(ResultSet::new(columns, rows))
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            CellValue::Null => ToSqlOutput::Owned(Value::Null),
            CellValue::Integer(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            CellValue::Real(v) => ToSqlOutput::Owned(Value::Real(*v)),
            CellValue::DateTime(v) => {
                ToSqlOutput::Owned(Value::Text(v.format(DATETIME_FORMAT).to_string()))
            }
            CellValue::Text(v) => ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes())),
        })
    }
}

fn value_from_sql(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::Integer(v) => CellValue::Integer(v),
        ValueRef::Real(v) => CellValue::Real(v),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            CellValue::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}
