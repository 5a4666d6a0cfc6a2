//! # engram-storage
//!
//! The persistence store: one embedded SQLite file in WAL mode, opened
//! once per process. A single write connection serializes writers; a small
//! read pool serves concurrent readers. All multi-statement writes run in
//! one transaction so aggregates can never drift from record counts.

pub mod engine;
pub mod export;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;
pub use pool::ConnectionPool;

use engram_core::errors::{EngramError, StorageError};

/// Wrap a low-level SQLite message into the storage error kind.
pub(crate) fn to_storage_err(message: impl Into<String>) -> EngramError {
    EngramError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}
