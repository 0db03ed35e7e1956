// src/db/mod.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Connection, Row, SqliteConnection, TypeInfo, ValueRef};
use thiserror::Error;
use tokio::time::timeout;

use crate::models::{Cell, Row as CellRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store {path} unavailable: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("store {path} did not answer within {after:?}")]
    Timeout { path: String, after: Duration },

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// One SQLite file. Holds only where and how to connect; every `fetch` opens
/// its own connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    timeout: Duration,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self { path: path.into(), timeout }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn options(&self) -> SqliteConnectOptions {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .create_if_missing(false)
            // outlasts the request deadline so a locked file reports Timeout
            .busy_timeout(self.timeout * 2)
    }

    async fn open(&self) -> Result<SqliteConnection, StoreError> {
        match timeout(self.timeout, SqliteConnection::connect_with(&self.options())).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(source)) => Err(StoreError::Unavailable { path: self.display(), source }),
            Err(_) => Err(StoreError::Timeout { path: self.display(), after: self.timeout }),
        }
    }

    /// Run `sql` with `param` bound to `?1` (when given) and return every row
    /// in store order.
    pub async fn fetch(&self, sql: &str, param: Option<i64>) -> Result<Vec<CellRow>, StoreError> {
        let mut conn = self.open().await?;
        let outcome = timeout(self.timeout, run(&mut conn, sql, param)).await;

        // released on success, failure and timeout alike
        if let Err(e) = conn.close().await {
            tracing::warn!(path = %self.display(), error = %e, "closing store connection failed");
        }

        match outcome {
            Ok(rows) => rows,
            Err(_) => Err(StoreError::Timeout { path: self.display(), after: self.timeout }),
        }
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

async fn run(conn: &mut SqliteConnection, sql: &str, param: Option<i64>) -> Result<Vec<CellRow>, StoreError> {
    let mut query = sqlx::query(sql);
    if let Some(p) = param {
        query = query.bind(p);
    }
    let rows = query.fetch_all(&mut *conn).await.map_err(StoreError::Query)?;
    rows.iter().map(decode_row).collect::<Result<_, _>>().map_err(StoreError::Query)
}

fn decode_row(row: &SqliteRow) -> Result<CellRow, sqlx::Error> {
    (0..row.len()).map(|i| decode_cell(row, i)).collect()
}

// Decodes by the value's own storage class, not the declared column type.
fn decode_cell(row: &SqliteRow, i: usize) -> Result<Cell, sqlx::Error> {
    let raw = row.try_get_raw(i)?;
    if raw.is_null() {
        return Ok(Cell::Null);
    }
    let kind = raw.type_info().name().to_ascii_uppercase();
    let cell = match kind.as_str() {
        "INTEGER" | "BOOLEAN" => Cell::Integer(row.try_get(i)?),
        "REAL" | "NUMERIC" => Cell::Real(row.try_get(i)?),
        "BLOB" => Cell::Blob(row.try_get(i)?),
        _ => Cell::Text(row.try_get(i)?),
    };
    Ok(cell)
}

/// The three files the views read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// BinEnt, BinFeat, EntFeat
    Tree,
    /// NPSData2
    Events,
    /// generic `data` table
    Raw,
}

#[derive(Debug, Clone)]
pub struct Stores {
    pub tree: Store,
    pub events: Store,
    pub raw: Store,
}

impl Stores {
    pub fn get(&self, kind: StoreKind) -> &Store {
        match kind {
            StoreKind::Tree => &self.tree,
            StoreKind::Events => &self.events,
            StoreKind::Raw => &self.raw,
        }
    }

    /// Warn about store files that are not there yet. Requests against them
    /// will fail with 503 until they appear.
    pub fn check_files(&self) {
        for store in [&self.tree, &self.events, &self.raw] {
            if !store.path().is_file() {
                tracing::warn!(path = %store.display(), "store file not found");
            }
        }
    }
}
