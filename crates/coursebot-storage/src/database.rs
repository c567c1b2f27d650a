// SPDX-FileCopyrightText: 2026 Coursebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread; the [`Database`] struct IS the single writer. Query modules
//! accept `&Database` and call through `connection().call()`. Do NOT
//! create additional Connection instances for writes.

use std::path::Path;

use coursebot_core::CoursebotError;
use tracing::debug;

use crate::migrations;

/// Handle to the single SQLite connection, shared by all query modules.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run
    /// all pending migrations.
    pub async fn open(path: &str) -> Result<Self, CoursebotError> {
        Self::open_with_wal(path, true).await
    }

    /// Open with an explicit WAL-mode choice (from `storage.wal_mode`).
    pub async fn open_with_wal(path: &str, wal_mode: bool) -> Result<Self, CoursebotError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| CoursebotError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;

        conn.call(move |conn| {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;",
            )?;
            migrations::run_migrations(conn)
                .map_err(|e| tokio_rusqlite::Error::Other(Box::new(e)))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so all committed data lands in the main file.
    pub async fn close(&self) -> Result<(), CoursebotError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
///
/// Domain errors tunneled through the writer thread via `Error::Other`
/// (e.g. `DuplicatePayment`) are unwrapped back to their original variant.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> CoursebotError {
    if let tokio_rusqlite::Error::Other(inner) = e {
        return match inner.downcast::<CoursebotError>() {
            Ok(domain) => *domain,
            Err(other) => CoursebotError::Storage { source: other },
        };
    }
    CoursebotError::Storage {
        source: Box::new(e),
    }
}
