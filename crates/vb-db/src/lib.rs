//! # vb-db
//!
//! libSQL persistence for venuebook: reservations and their service bundles,
//! the append-only audit log, master-data lookups, and reporting aggregates.
//!
//! On top of the store sit three layers:
//! - [`service::BookingService`]: validated reservation lifecycle operations
//!   plus the fire-and-forget confirmation notice.
//! - [`recorder::AuditRecorder`]: best-effort audit capture that never fails
//!   the mutation it describes.
//! - [`desk::BookingDesk`]: the call site that runs a mutation and then
//!   records exactly one audit entry for it.

pub mod desk;
pub mod error;
pub mod helpers;
mod migrations;
pub mod notify;
pub mod recorder;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::{Builder, TransactionBehavior};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Central database handle for all venuebook state.
///
/// Every statement runs on one connection, so a transaction opened there is
/// visible to anything else issued on it. `gate` keeps the two apart: writers
/// hold it exclusively until their transaction ends, and repo reads hold it
/// shared. A reservation being amended, cancelled, or having its bundle
/// replaced is effectively locked, and no read sees a half-applied write.
pub struct VenueDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    gate: RwLock<()>,
}

impl VenueDb {
    /// Open a local database at the given path, or `":memory:"` for tests.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let venue_db = Self {
            db,
            conn,
            gate: RwLock::new(()),
        };
        venue_db.run_migrations().await?;
        tracing::debug!(path, "database opened");
        Ok(venue_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    ///
    /// Statements issued here bypass the gate. Seeding and schema checks
    /// use it; repo methods go through [`Self::read_gate`] or
    /// [`Self::begin_write`].
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Acquire the write gate and open an immediate transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction cannot be started.
    pub async fn begin_write(&self) -> Result<WriteTx<'_>, DatabaseError> {
        let gate = self.gate.write().await;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        Ok(WriteTx { _gate: gate, tx })
    }

    /// Hold the gate shared for the duration of a read. Never take it while
    /// a [`WriteTx`] is open on the same task; read through the transaction.
    pub(crate) async fn read_gate(&self) -> RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    /// Hold the gate exclusively for a write that needs no transaction.
    pub(crate) async fn write_gate(&self) -> RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }
}

/// An open write transaction holding the write gate.
///
/// Dereferences to the transaction's connection so repo helpers that take
/// `&libsql::Connection` run inside it.
pub struct WriteTx<'a> {
    _gate: RwLockWriteGuard<'a, ()>,
    tx: libsql::Transaction,
}

impl WriteTx<'_> {
    /// Commit on `Ok`, roll back on `Err`, and pass the result through.
    ///
    /// # Errors
    ///
    /// Returns the body's error, or the commit error if commit fails.
    pub async fn finish<T>(self, result: Result<T, DatabaseError>) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                self.tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl std::ops::Deref for WriteTx<'_> {
    type Target = libsql::Connection;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}
