//! Customer rollup types

use serde::{Deserialize, Serialize};

/// One customer as seen by a tailor: all orders grouped by the
/// (name, email, phone) triple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerSummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub orders: i64,
    pub total_spent: f64,
    /// Millisecond timestamp of the first order in the group.
    pub first_visit: i64,
    /// Millisecond timestamp of the most recent order in the group.
    pub last_visit: i64,
}
