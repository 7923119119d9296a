//! Review payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create-review request body. One review per (tailor, customer) pair.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCreate {
    #[validate(length(min = 1))]
    pub tailor_id: String,
    #[validate(length(min = 1))]
    pub customer_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 1000))]
    pub comment: String,
}

/// Update-review request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}
