//! Repository Module
//!
//! CRUD and aggregation queries against SurrealDB, one repository per
//! aggregate. Repositories never swallow storage errors; they surface
//! [`RepoError`] to the caller.

pub mod counter;
pub mod invoice;
pub mod order;
pub mod review;
pub mod tailor;

// Re-exports
pub use counter::CounterRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;
pub use review::ReviewRepository;
pub use tailor::{NewTailor, TailorRepository};

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

use crate::utils::FieldErrors;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Validation failed")]
    FieldValidation(FieldErrors),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as a generic database error string;
        // map them to Duplicate so callers can return 409s.
        if msg.contains("already contains") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse an id that may arrive either as `"table:key"` or as a bare key.
pub fn parse_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let record: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid id format: {id}")))?;
        if record.table() != table {
            return Err(RepoError::NotFound(format!(
                "Invalid id for {table}: {id}"
            )));
        }
        Ok(record)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}
