//! Review entity

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// One review per (tailor, customer) pair, enforced by a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub tailor: RecordId,
    /// Opaque external customer identity
    pub customer: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
    pub updated_at: i64,
}
