//! Counter Repository
//!
//! Keyed monotonic sequences. The increment is one `UPSERT` statement, which
//! SurrealDB executes atomically: concurrent callers never observe the same
//! value. This is the only cross-request synchronization point in the system.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::Counter;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct CounterRepository {
    base: BaseRepository,
}

impl CounterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically increment and fetch the sequence for `key`, creating it at
    /// 1 when absent. Values are never reused; a consumed value that goes
    /// unused (e.g. a failed invoice write) is an accepted gap.
    pub async fn next(&self, key: &str) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("UPSERT type::thing('counter', $key) SET value = (value ?? 0) + 1 RETURN AFTER")
            .bind(("key", key.to_string()))
            .await?;
        let counters: Vec<Counter> = result.take(0)?;
        counters
            .into_iter()
            .next()
            .map(|c| c.value)
            .ok_or_else(|| RepoError::Database(format!("Counter '{key}' returned no row")))
    }
}
