//! Tailor (shop) entity

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

use super::serde_helpers;

/// Tailor shop account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tailor {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub shop_name: String,
    pub owner_name: String,
    pub email: String,
    /// Argon2 hash, never exposed through the API
    pub password_hash: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Arithmetic mean of review ratings, 0.0 when unreviewed
    #[serde(default)]
    pub rating: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public view of a tailor account (no credentials).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailorProfile {
    pub id: String,
    pub shop_name: String,
    pub owner_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub rating: f64,
    pub created_at: i64,
}

impl From<Tailor> for TailorProfile {
    fn from(t: Tailor) -> Self {
        Self {
            id: t.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            shop_name: t.shop_name,
            owner_name: t.owner_name,
            email: t.email,
            phone: t.phone,
            address: t.address,
            rating: t.rating,
            created_at: t.created_at,
        }
    }
}
