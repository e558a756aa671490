//! Scoped, read-only access to the SQLite dataset.
//!
//! There is no pool: every operation opens its own connection on a blocking
//! worker thread and the connection is dropped when the closure returns,
//! whether it succeeded, failed, or panicked.

use crate::error::ServerError;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Handle to the dataset file.
///
/// Cheap to clone; holds only the path resolved at startup.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: Arc<PathBuf>,
}

impl Dataset {
    /// Create a handle for the dataset at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
        }
    }

    /// Path of the dataset file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-only connection.
    ///
    /// Fails if the file does not exist; SQLite never creates it in this mode.
    pub fn open(&self) -> Result<Connection, rusqlite::Error> {
        debug!("Opening dataset connection: {}", self.path.display());
        Connection::open_with_flags(
            self.path.as_path(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    /// Run `f` with a fresh connection on the blocking thread pool.
    ///
    /// Failing to open the file surfaces as `ServerError::Execution`; a
    /// panicking or cancelled worker surfaces as `ServerError::Unexpected`.
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&Connection) -> Result<T, ServerError> + Send + 'static,
        T: Send + 'static,
    {
        let dataset = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = dataset.open()?;
            f(&conn)
        })
        .await?
    }

    /// Check that the file opens and its catalog can be read.
    ///
    /// Used once at startup; the server must not serve without a readable dataset.
    pub async fn verify(&self) -> Result<usize, ServerError> {
        let path = self.path().display().to_string();
        let tables = self
            .with_connection(|conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                    [],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await
            .map_err(|e| {
                ServerError::setup_with_source(format!("dataset {} is not readable", path), e)
            })?;

        info!("Dataset {} is readable ({} tables)", path, tables);
        Ok(usize::try_from(tables).unwrap_or(0))
    }
}
